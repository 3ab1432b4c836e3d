//! 行内强调解析
//!
//! 把一段原始文本切分成带样式的文本片段。`*` 斜体、`**` 粗体、`***` 粗斜体、
//! `_` 下划线；反斜杠转义紧随其后的 `*` 或 `_`。不成对的标记原样保留为文本。

use serde::Serialize;

/// 样式集合，空集合即普通文本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Style::PLAIN
    }
}

/// 同一样式的连续文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

impl Span {
    pub fn new(style: Style, text: impl Into<String>) -> Self {
        Span {
            style,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Span::new(Style::PLAIN, text)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Span::new(Style { bold: true, ..Style::PLAIN }, text)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Span::new(Style { italic: true, ..Style::PLAIN }, text)
    }

    pub fn bold_italic(text: impl Into<String>) -> Self {
        Span::new(Style { bold: true, italic: true, ..Style::PLAIN }, text)
    }

    pub fn underline(text: impl Into<String>) -> Self {
        Span::new(Style { underline: true, ..Style::PLAIN }, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelimKind {
    Italic,
    Bold,
    BoldItalic,
    Underline,
}

impl DelimKind {
    fn from_stars(count: usize) -> Option<Self> {
        match count {
            1 => Some(DelimKind::Italic),
            2 => Some(DelimKind::Bold),
            3 => Some(DelimKind::BoldItalic),
            _ => None,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            DelimKind::Italic => "*",
            DelimKind::Bold => "**",
            DelimKind::BoldItalic => "***",
            DelimKind::Underline => "_",
        }
    }
}

#[derive(Debug)]
enum Piece {
    Text(String),
    Delim {
        kind: DelimKind,
        can_open: bool,
        can_close: bool,
    },
}

/// 每种样式当前打开的层数
#[derive(Default)]
struct StyleDepth {
    bold: usize,
    italic: usize,
    underline: usize,
}

impl StyleDepth {
    fn apply(&mut self, kind: DelimKind, open: bool) {
        let step = |n: &mut usize| {
            *n = if open { *n + 1 } else { n.saturating_sub(1) };
        };
        match kind {
            DelimKind::Italic => step(&mut self.italic),
            DelimKind::Bold => step(&mut self.bold),
            DelimKind::BoldItalic => {
                step(&mut self.bold);
                step(&mut self.italic);
            }
            DelimKind::Underline => step(&mut self.underline),
        }
    }

    fn style(&self) -> Style {
        Style {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
        }
    }
}

fn tokenize(text: &str) -> Vec<Piece> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    let flush = |buf: &mut String, pieces: &mut Vec<Piece>| {
        if !buf.is_empty() {
            pieces.push(Piece::Text(std::mem::take(buf)));
        }
    };

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' && matches!(chars.get(i + 1), Some('*') | Some('_')) {
            buf.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if c == '*' {
            let start = i;
            while i < chars.len() && chars[i] == '*' {
                i += 1;
            }
            let before = start.checked_sub(1).map(|p| chars[p]);
            let after = chars.get(i).copied();
            match DelimKind::from_stars(i - start) {
                Some(kind) => {
                    flush(&mut buf, &mut pieces);
                    pieces.push(Piece::Delim {
                        kind,
                        can_open: after.map_or(false, |c| !c.is_whitespace()),
                        can_close: before.map_or(false, |c| !c.is_whitespace()),
                    });
                }
                // 四个以上的星号不是强调标记
                None => buf.extend(std::iter::repeat('*').take(i - start)),
            }
            continue;
        }

        if c == '_' {
            let before = i.checked_sub(1).map(|p| chars[p]);
            let after = chars.get(i + 1).copied();
            flush(&mut buf, &mut pieces);
            // 单词内部的下划线不算标记
            pieces.push(Piece::Delim {
                kind: DelimKind::Underline,
                can_open: after.map_or(false, |c| !c.is_whitespace())
                    && !before.map_or(false, char::is_alphanumeric),
                can_close: before.map_or(false, |c| !c.is_whitespace())
                    && !after.map_or(false, char::is_alphanumeric),
            });
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }
    flush(&mut buf, &mut pieces);
    pieces
}

/// 为每个标记找到配对的另一半，未配对的为 None
fn pair_delimiters(pieces: &[Piece]) -> Vec<Option<usize>> {
    let mut partner = vec![None; pieces.len()];
    let mut openers: Vec<usize> = Vec::new();

    for (idx, piece) in pieces.iter().enumerate() {
        let (kind, can_open, can_close) = match piece {
            Piece::Delim { kind, can_open, can_close } => (*kind, *can_open, *can_close),
            Piece::Text(_) => continue,
        };

        let mut closed = false;
        if can_close {
            let found = openers.iter().rposition(|&o| {
                matches!(pieces[o], Piece::Delim { kind: k, .. } if k == kind) && o + 1 < idx
            });
            if let Some(pos) = found {
                let opener = openers[pos];
                partner[opener] = Some(idx);
                partner[idx] = Some(opener);
                // 其上未闭合的开标记作废
                openers.truncate(pos);
                closed = true;
            }
        }
        if !closed && can_open {
            openers.push(idx);
        }
    }
    partner
}

fn push_text(spans: &mut Vec<Span>, style: Style, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(Span::new(style, text)),
    }
}

/// 解析段落文本的行内强调
pub fn parse_emphasis(text: &str) -> Vec<Span> {
    let pieces = tokenize(text);
    let partner = pair_delimiters(&pieces);

    let mut depth = StyleDepth::default();
    let mut spans = Vec::new();
    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Text(t) => push_text(&mut spans, depth.style(), t),
            Piece::Delim { kind, .. } => match partner[idx] {
                Some(other) => depth.apply(*kind, other > idx),
                None => push_text(&mut spans, depth.style(), kind.marker()),
            },
        }
    }
    spans
}

/// 去除强调标记后的纯文本
pub fn plain_text(text: &str) -> String {
    parse_emphasis(text).into_iter().map(|s| s.text).collect()
}
