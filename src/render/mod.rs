//! 渲染接口
//!
//! 渲染器实现 [`DocumentRenderer`]，由默认的 `render_doc` 按段落类型分派到各个
//! `write_*` 方法。强调在这里才解析：每段文本先交给
//! [`parse_emphasis`](crate::parser::parse_emphasis)，再把片段交给渲染器。

pub mod html;
pub mod console;

use std::fmt::{self, Write};

use crate::error::Result;
use crate::models::{Conf, Document, ElementType, Paragraph, Scene, TitleValues};
use crate::parser::{parse_emphasis, Span};
use crate::utils::FountainConstants;

pub use console::ConsoleDocumentRenderer;
pub use html::HtmlDocumentRenderer;

pub trait DocumentRenderer {
    fn conf(&self) -> &Conf;

    /// 把一个样式片段转换成目标格式
    fn format_span(&self, span: &Span) -> String;

    fn write_header(&mut self, _doc: &Document, _out: &mut dyn Write) -> fmt::Result {
        Ok(())
    }

    fn write_footer(&mut self, _doc: &Document, _out: &mut dyn Write) -> fmt::Result {
        Ok(())
    }

    /// `values` 中已补齐 title / credit / author
    fn write_title_page(&mut self, values: &TitleValues, out: &mut dyn Write) -> fmt::Result;

    fn write_scene_heading(&mut self, spans: &[Span], number: Option<&str>, out: &mut dyn Write) -> fmt::Result;

    fn write_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_centered_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_character(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_dialog(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_parenthetical(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_transition(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_lyrics(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_page_break(&mut self, out: &mut dyn Write) -> fmt::Result;

    fn write_section(&mut self, depth: usize, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    fn write_synopsis(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result;

    /// 解析强调并逐段格式化
    fn render_text(&self, text: &str) -> String {
        parse_emphasis(text)
            .iter()
            .map(|span| self.format_span(span))
            .collect()
    }

    fn render_doc(&mut self, doc: &Document, out: &mut dyn Write) -> fmt::Result {
        self.write_header(doc, out)?;
        self.render_title_page(&doc.title_values, out)?;
        for scene in &doc.scenes {
            self.render_scene(scene, out)?;
        }
        self.write_footer(doc, out)
    }

    /// 没有标题页信息且未强制打印时跳过；否则补齐缺省值
    fn render_title_page(&mut self, values: &TitleValues, out: &mut dyn Write) -> fmt::Result {
        if values.is_empty() && !self.conf().print_title_page {
            return Ok(());
        }
        let mut values = values.clone();
        for (key, default) in FountainConstants::title_page_defaults() {
            if !values.contains_key(key) {
                values.insert(key, default);
            }
        }
        self.write_title_page(&values, out)
    }

    fn render_scene(&mut self, scene: &Scene, out: &mut dyn Write) -> fmt::Result {
        if let Some(header) = &scene.header {
            let number = if self.conf().print_scene_numbers {
                scene.number.as_deref()
            } else {
                None
            };
            self.write_scene_heading(&parse_emphasis(header), number, out)?;
        }
        for paragraph in &scene.paragraphs {
            self.render_paragraph(paragraph, out)?;
        }
        Ok(())
    }

    fn render_paragraph(&mut self, paragraph: &Paragraph, out: &mut dyn Write) -> fmt::Result {
        let spans = parse_emphasis(paragraph.text());
        match paragraph.kind() {
            ElementType::Action => self.write_action(&spans, out),
            ElementType::CenteredAction => self.write_centered_action(&spans, out),
            ElementType::Character => self.write_character(&spans, out),
            ElementType::Dialog => self.write_dialog(&spans, out),
            ElementType::Parenthetical => self.write_parenthetical(&spans, out),
            ElementType::Transition => self.write_transition(&spans, out),
            ElementType::Lyrics => self.write_lyrics(&spans, out),
            ElementType::PageBreak => self.write_page_break(out),
            ElementType::Section if self.conf().print_sections => {
                self.write_section(paragraph.depth().unwrap_or(1), &spans, out)
            }
            ElementType::Synopsis if self.conf().print_synopsis => self.write_synopsis(&spans, out),
            ElementType::Section | ElementType::Synopsis => Ok(()),
        }
    }
}

/// 渲染到字符串
pub fn render_to_string<R: DocumentRenderer + ?Sized>(renderer: &mut R, doc: &Document) -> Result<String> {
    let mut out = String::new();
    renderer.render_doc(doc, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 记录每次分派的渲染器
    struct RecordingRenderer {
        conf: Conf,
    }

    impl RecordingRenderer {
        fn line(&self, out: &mut dyn Write, tag: &str, spans: &[Span]) -> fmt::Result {
            let text: String = spans.iter().map(|s| self.format_span(s)).collect();
            writeln!(out, "{}: {}", tag, text)
        }
    }

    impl DocumentRenderer for RecordingRenderer {
        fn conf(&self) -> &Conf {
            &self.conf
        }

        fn format_span(&self, span: &Span) -> String {
            let mut text = span.text.clone();
            if span.style.underline {
                text = format!("U:{}:U", text);
            }
            if span.style.italic {
                text = format!("I:{}:I", text);
            }
            if span.style.bold {
                text = format!("B:{}:B", text);
            }
            text
        }

        fn write_title_page(&mut self, values: &TitleValues, out: &mut dyn Write) -> fmt::Result {
            for (k, v) in values.iter() {
                writeln!(out, "TITLE {}: {}", k, self.render_text(v))?;
            }
            Ok(())
        }

        fn write_scene_heading(&mut self, spans: &[Span], number: Option<&str>, out: &mut dyn Write) -> fmt::Result {
            self.line(out, "SCENE", spans)?;
            if let Some(number) = number {
                writeln!(out, "NUMBER: {}", number)?;
            }
            Ok(())
        }

        fn write_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "ACTION", spans)
        }

        fn write_centered_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "CENTERED", spans)
        }

        fn write_character(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "CHARACTER", spans)
        }

        fn write_dialog(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "DIALOG", spans)
        }

        fn write_parenthetical(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "PARENTHETICAL", spans)
        }

        fn write_transition(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "TRANSITION", spans)
        }

        fn write_lyrics(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "LYRICS", spans)
        }

        fn write_page_break(&mut self, out: &mut dyn Write) -> fmt::Result {
            writeln!(out, "PAGEBREAK")
        }

        fn write_section(&mut self, depth: usize, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, &format!("SECTION{}", depth), spans)
        }

        fn write_synopsis(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
            self.line(out, "SYNOPSIS", spans)
        }
    }

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        let scene = doc.add_scene(Some("INT. HOUSE - DAY".to_string()));
        scene.number = Some("4".to_string());
        scene.add_section(2, "Act *Two*").unwrap();
        scene.add_synopsis("Things happen");
        scene.add_action("He **runs**.");
        scene.add_page_break();
        doc
    }

    #[test]
    fn dispatches_per_element_type() {
        let mut renderer = RecordingRenderer { conf: Conf::default() };
        let out = render_to_string(&mut renderer, &sample_doc()).unwrap();
        assert_eq!(
            out,
            "SCENE: INT. HOUSE - DAY\nSECTION2: Act I:Two:I\nSYNOPSIS: Things happen\nACTION: He B:runs:B.\nPAGEBREAK\n"
        );
    }

    #[test]
    fn title_page_is_skipped_unless_forced() {
        let doc = Document::new();
        let mut renderer = RecordingRenderer { conf: Conf::default() };
        assert_eq!(render_to_string(&mut renderer, &doc).unwrap(), "");

        renderer.conf.print_title_page = true;
        assert_eq!(
            render_to_string(&mut renderer, &doc).unwrap(),
            "TITLE title: Untitled Screenplay\nTITLE credit: Written by\nTITLE author: Unknown\n"
        );
    }

    #[test]
    fn title_page_keeps_given_values() {
        let mut doc = Document::new();
        doc.set_title_value("Title", "_Big Fish_");
        let mut renderer = RecordingRenderer { conf: Conf::default() };
        let out = render_to_string(&mut renderer, &doc).unwrap();
        assert!(out.starts_with("TITLE Title: U:Big Fish:U\n"));
        assert!(out.contains("TITLE author: Unknown\n"));
    }

    #[test]
    fn sections_synopses_and_numbers_follow_conf() {
        let conf = Conf {
            print_sections: false,
            print_synopsis: false,
            print_scene_numbers: true,
            ..Conf::default()
        };
        let mut renderer = RecordingRenderer { conf };
        let out = render_to_string(&mut renderer, &sample_doc()).unwrap();
        assert_eq!(out, "SCENE: INT. HOUSE - DAY\nNUMBER: 4\nACTION: He B:runs:B.\nPAGEBREAK\n");
    }
}
