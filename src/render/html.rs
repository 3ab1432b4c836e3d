use std::fmt::{self, Write};

use crate::models::{Conf, Document, TitleValues};
use crate::parser::{parse_emphasis, plain_text, Span};
use crate::render::DocumentRenderer;

const CSS: &str = r#"
body { background: #fafafa; }
.fountain-doc { font-family: "Courier Prime", "Courier New", monospace; font-size: 12pt; }
.fountain-main { max-width: 6in; margin: 1in auto; padding: 0 1in; background: #fff; }
.fountain-title-page { text-align: center; padding: 2in 0 1in 0; }
.fountain-title-page h1 { font-size: 12pt; text-transform: uppercase; }
.fountain-title-page-footer { text-align: left; }
.fountain-scene-heading { font-weight: bold; text-transform: uppercase; margin-top: 2em; }
.fountain-scene-number { float: right; }
.fountain-action { margin: 1em 0; }
.fountain-centered-action { text-align: center; }
.fountain-character { margin: 1em 0 0 2in; text-transform: uppercase; }
.fountain-dialog { margin: 0 1.5in 0 1in; }
.fountain-parenthetical { margin: 0 2in 0 1.5in; }
.fountain-transition { text-align: right; text-transform: uppercase; }
.fountain-lyrics { font-style: italic; margin-left: 1in; }
.fountain-section { color: #5f7d95; }
.fountain-synopsis { color: #888; font-style: italic; }
"#;

/// 把文档渲染成 HTML
pub struct HtmlDocumentRenderer {
    conf: Conf,
}

impl HtmlDocumentRenderer {
    pub fn new(conf: Conf) -> Self {
        HtmlDocumentRenderer { conf }
    }

    /// 默认样式表
    pub fn css() -> &'static str {
        CSS
    }

    fn spans_html(&self, spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| self.format_span(span))
            .collect::<String>()
            .replace('\n', "<br/>\n")
    }

    fn paragraph(&self, out: &mut dyn Write, class: &str, spans: &[Span]) -> fmt::Result {
        writeln!(out, "<p class=\"fountain-{}\">{}</p>", class, self.spans_html(spans))
    }

    fn title_value(&self, out: &mut dyn Write, tag: &str, class: &str, value: &str) -> fmt::Result {
        let html = self.spans_html(&parse_emphasis(value));
        if class.is_empty() {
            writeln!(out, "<{}>{}</{}>", tag, html, tag)
        } else {
            writeln!(out, "<{} class=\"fountain-{}\">{}</{}>", tag, class, html, tag)
        }
    }
}

impl Default for HtmlDocumentRenderer {
    fn default() -> Self {
        Self::new(Conf::default())
    }
}

impl DocumentRenderer for HtmlDocumentRenderer {
    fn conf(&self) -> &Conf {
        &self.conf
    }

    fn format_span(&self, span: &Span) -> String {
        let mut html = html_escape::encode_text(&span.text).into_owned();
        if span.style.is_plain() {
            return html;
        }
        if span.style.underline {
            html = format!("<u>{}</u>", html);
        }
        if span.style.italic {
            html = format!("<em>{}</em>", html);
        }
        if span.style.bold {
            html = format!("<strong>{}</strong>", html);
        }
        html
    }

    fn write_header(&mut self, doc: &Document, out: &mut dyn Write) -> fmt::Result {
        if self.conf.html_standalone {
            let title = doc
                .title_values
                .get("title")
                .map(|t| plain_text(t).replace('\n', " "))
                .unwrap_or_else(|| "Fountain Screenplay".to_string());
            writeln!(out, "<!DOCTYPE html>")?;
            writeln!(out, "<html>")?;
            writeln!(out, "<head>")?;
            writeln!(out, "<meta charset=\"utf-8\">")?;
            writeln!(out, "<title>{}</title>", html_escape::encode_text(&title))?;
            writeln!(out, "<style>{}</style>", CSS)?;
            writeln!(out, "</head>")?;
            writeln!(out, "<body>")?;
        }
        writeln!(out, "<div class=\"fountain-doc\">")?;
        writeln!(out, "<div class=\"fountain-main\">")
    }

    fn write_footer(&mut self, _doc: &Document, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "</div>")?;
        writeln!(out, "</div>")?;
        if self.conf.html_standalone {
            writeln!(out, "</body>")?;
            writeln!(out, "</html>")?;
        }
        Ok(())
    }

    fn write_title_page(&mut self, values: &TitleValues, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "<div class=\"fountain-title-page\">")?;

        if let Some(title) = values.get("title") {
            self.title_value(out, "h1", "", title)?;
        }
        for key in ["credit", "author", "authors", "source"] {
            if let Some(value) = values.get(key) {
                self.title_value(out, "p", "title-page-heading", value)?;
            }
        }

        let date = values.get("date").or_else(|| values.get("draft date"));
        for value in [date, values.get("contact"), values.get("copyright")].into_iter().flatten() {
            self.title_value(out, "p", "title-page-footer", value)?;
        }

        writeln!(out, "</div>")?;
        self.write_page_break(out)
    }

    fn write_scene_heading(&mut self, spans: &[Span], number: Option<&str>, out: &mut dyn Write) -> fmt::Result {
        match number {
            Some(number) => writeln!(
                out,
                "<p class=\"fountain-scene-heading\">{} <span class=\"fountain-scene-number\">{}</span></p>",
                self.spans_html(spans),
                html_escape::encode_text(number)
            ),
            None => self.paragraph(out, "scene-heading", spans),
        }
    }

    fn write_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "action", spans)
    }

    fn write_centered_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "centered-action", spans)
    }

    fn write_character(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "character", spans)
    }

    fn write_dialog(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "dialog", spans)
    }

    fn write_parenthetical(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "parenthetical", spans)
    }

    fn write_transition(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "transition", spans)
    }

    fn write_lyrics(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "lyrics", spans)
    }

    fn write_page_break(&mut self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "<hr/>")
    }

    fn write_section(&mut self, depth: usize, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(
            out,
            "<p class=\"fountain-section\" data-depth=\"{}\">{}</p>",
            depth,
            self.spans_html(spans)
        )
    }

    fn write_synopsis(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.paragraph(out, "synopsis", spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Style;

    #[test]
    fn spans_are_escaped_then_styled() {
        let renderer = HtmlDocumentRenderer::default();
        assert_eq!(renderer.format_span(&Span::plain("a < b & c")), "a &lt; b &amp; c");
        let all = Span::new(Style { bold: true, italic: true, underline: true }, "x");
        assert_eq!(renderer.format_span(&all), "<strong><em><u>x</u></em></strong>");
    }

    #[test]
    fn line_breaks_become_br() {
        let renderer = HtmlDocumentRenderer::default();
        assert_eq!(
            renderer.spans_html(&[Span::plain("one\ntwo")]),
            "one<br/>\ntwo"
        );
    }
}
