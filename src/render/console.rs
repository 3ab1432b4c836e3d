use std::fmt::{self, Write};

use crossterm::style::{style, Color, Stylize};
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Conf, TitleValues};
use crate::parser::{parse_emphasis, Span, Style};
use crate::render::DocumentRenderer;

/// 每级缩进的宽度
const INDENT_WIDTH: usize = 8;

/// 换行后每行至少保留的宽度
const MIN_WRAP_WIDTH: usize = 16;

/// 东亚宽字符（CJK、谚文、全角符号等）的码位范围，占两列
const WIDE_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x115F),
    (0x2E80, 0x303E),
    (0x3041, 0x33FF),
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xA000, 0xA4CF),
    (0xAC00, 0xD7A3),
    (0xF900, 0xFAFF),
    (0xFE30, 0xFE4F),
    (0xFF00, 0xFF60),
    (0xFFE0, 0xFFE6),
    (0x1F300, 0x1F64F),
    (0x1F900, 0x1F9FF),
    (0x20000, 0x3FFFD),
];

/// 一个字素簇在终端中占的列数，按首字符判断
fn grapheme_width(grapheme: &str) -> usize {
    let wide = grapheme.chars().next().map_or(false, |c| {
        let code = c as u32;
        WIDE_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&code))
    });
    if wide {
        2
    } else {
        1
    }
}

/// 终端显示宽度
fn text_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| text_width(&s.text)).sum()
}

fn push_piece(line: &mut Vec<Span>, style: Style, text: &str) {
    if text.is_empty() {
        return;
    }
    match line.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => line.push(Span::new(style, text)),
    }
}

fn trim_line_end(line: &mut Vec<Span>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
        if !last.text.is_empty() {
            break;
        }
        line.pop();
    }
}

/// 按宽度贪心折行，保留片段样式；`\n` 强制换行，超长单词单独成行
pub fn wrap_spans(spans: &[Span], width: usize) -> Vec<Vec<Span>> {
    let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
    let mut column = 0;

    for span in spans {
        for (n, segment) in span.text.split('\n').enumerate() {
            if n > 0 {
                if let Some(line) = lines.last_mut() {
                    trim_line_end(line);
                }
                lines.push(Vec::new());
                column = 0;
            }
            for word in segment.split_inclusive(' ') {
                let word_width = text_width(word.trim_end());
                if column > 0 && column + word_width > width {
                    if let Some(line) = lines.last_mut() {
                        trim_line_end(line);
                    }
                    lines.push(Vec::new());
                    column = 0;
                }
                if let Some(line) = lines.last_mut() {
                    push_piece(line, span.style, word);
                }
                column += text_width(word);
            }
        }
    }
    if let Some(line) = lines.last_mut() {
        trim_line_end(line);
    }
    lines
}

/// 在终端中按剧本格式打印文档
pub struct ConsoleDocumentRenderer {
    conf: Conf,
}

impl ConsoleDocumentRenderer {
    pub fn new(conf: Conf) -> Self {
        ConsoleDocumentRenderer { conf }
    }

    fn width(&self) -> usize {
        self.conf.console_width
    }

    fn paint(&self, text: &str, color: Option<Color>, base: Style, dim: bool) -> String {
        if !self.conf.use_colors || text.is_empty() {
            return text.to_string();
        }
        let mut styled = style(text);
        if let Some(color) = color {
            styled = styled.with(color);
        }
        if base.bold {
            styled = styled.bold();
        }
        if base.italic {
            styled = styled.italic();
        }
        if base.underline {
            styled = styled.underlined();
        }
        if dim {
            styled = styled.dim();
        }
        styled.to_string()
    }

    fn line_text(&self, line: &[Span], color: Option<Color>, base: Style) -> String {
        line.iter()
            .map(|span| {
                let style = Style {
                    bold: base.bold || span.style.bold,
                    italic: base.italic || span.style.italic,
                    underline: base.underline || span.style.underline,
                };
                self.paint(&span.text, color, style, false)
            })
            .collect()
    }

    /// 缩进并折行输出一段
    fn block(
        &self,
        out: &mut dyn Write,
        spans: &[Span],
        indent_levels: usize,
        right_margin: usize,
        color: Option<Color>,
        base: Style,
    ) -> fmt::Result {
        let indent = indent_levels * INDENT_WIDTH;
        let wrap = self
            .width()
            .saturating_sub(indent + right_margin)
            .max(MIN_WRAP_WIDTH);
        for line in wrap_spans(spans, wrap) {
            writeln!(out, "{}{}", " ".repeat(indent), self.line_text(&line, color, base))?;
        }
        Ok(())
    }

    fn centered(&self, out: &mut dyn Write, spans: &[Span], color: Option<Color>) -> fmt::Result {
        for line in wrap_spans(spans, self.width()) {
            let pad = self.width().saturating_sub(spans_width(&line)) / 2;
            writeln!(out, "{}{}", " ".repeat(pad), self.line_text(&line, color, Style::PLAIN))?;
        }
        Ok(())
    }

    fn rule(&self, out: &mut dyn Write) -> fmt::Result {
        let rule = "=".repeat(self.width());
        writeln!(out, "{}", self.paint(&rule, None, Style::PLAIN, true))
    }
}

impl Default for ConsoleDocumentRenderer {
    fn default() -> Self {
        Self::new(Conf::default())
    }
}

impl DocumentRenderer for ConsoleDocumentRenderer {
    fn conf(&self) -> &Conf {
        &self.conf
    }

    fn format_span(&self, span: &Span) -> String {
        self.paint(&span.text, None, span.style, false)
    }

    fn write_title_page(&mut self, values: &TitleValues, out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        for key in ["title", "credit", "author", "authors", "source"] {
            if let Some(value) = values.get(key) {
                self.centered(out, &parse_emphasis(value), None)?;
                writeln!(out)?;
            }
        }
        writeln!(out)?;
        writeln!(out)?;

        let bottom: Vec<&str> = ["date", "draft date", "contact", "copyright"]
            .into_iter()
            .filter_map(|key| values.get(key))
            .collect();
        for (i, value) in bottom.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            for line in wrap_spans(&parse_emphasis(value), self.width()) {
                writeln!(out, "{}", self.line_text(&line, Some(Color::Grey), Style::PLAIN))?;
            }
        }
        writeln!(out)?;
        self.rule(out)
    }

    fn write_scene_heading(&mut self, spans: &[Span], number: Option<&str>, out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        let mut spans = spans.to_vec();
        if let Some(number) = number {
            spans.push(Span::plain(format!(" #{}#", number)));
        }
        let bold = Style { bold: true, ..Style::PLAIN };
        self.block(out, &spans, 0, 0, Some(Color::White), bold)
    }

    fn write_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.block(out, spans, 0, 0, None, Style::PLAIN)
    }

    fn write_centered_action(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.centered(out, spans, None)
    }

    fn write_character(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.block(out, spans, 3, 0, Some(Color::White), Style::PLAIN)
    }

    fn write_dialog(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.block(out, spans, 1, INDENT_WIDTH, None, Style::PLAIN)
    }

    fn write_parenthetical(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        self.block(out, spans, 2, INDENT_WIDTH, None, Style::PLAIN)
    }

    fn write_transition(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.block(out, spans, 4, 0, None, Style::PLAIN)
    }

    fn write_lyrics(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.block(out, spans, 0, 0, Some(Color::Magenta), Style::PLAIN)
    }

    fn write_page_break(&mut self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        self.rule(out)
    }

    fn write_section(&mut self, depth: usize, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        let mut marked = vec![Span::plain(format!("{} ", "#".repeat(depth)))];
        marked.extend_from_slice(spans);
        self.block(out, &marked, 0, 0, Some(Color::Cyan), Style::PLAIN)
    }

    fn write_synopsis(&mut self, spans: &[Span], out: &mut dyn Write) -> fmt::Result {
        writeln!(out)?;
        let mut marked = vec![Span::plain("= ")];
        marked.extend_from_slice(spans);
        self.block(out, &marked, 0, 0, Some(Color::Green), Style::PLAIN)
    }
}
