use log::{debug, trace};

use crate::models::{Document, ElementType, Paragraph, SceneSection};
use crate::parser::title_page::extract_title_page;
use crate::utils::{dedent, is_upper_case_line, strip_bom, FountainConstants, BLOCK_REGEX};

/// 当前所处的块。空行把状态重置为 `Start`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    /// 块的第一行（文件开头、空行之后或单行元素之后）
    Start,
    Action,
    /// 角色名之后的对白、括号注释
    Dialogue,
    Lyrics,
    Centered,
}

/// 块首行的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    SceneHeading { header: String, number: Option<String> },
    PageBreak,
    Section { depth: usize, text: String },
    Element(ElementType, String),
}

/// 分类时可见的上下文：当前行和下一行（一行前瞻）
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineContext<'a> {
    pub raw: &'a str,
    pub line: &'a str,
    pub next: Option<&'a str>,
}

type Rule = fn(&LineContext) -> Option<LineKind>;

/// 块首行的规则，按顺序匹配，先匹配者生效；都不匹配则为 action
const START_RULES: &[(&str, Rule)] = &[
    ("forced", forced_rule),
    ("scene_heading", scene_heading_rule),
    ("character", character_rule),
    ("transition", transition_rule),
];

pub(crate) fn classify(ctx: &LineContext) -> LineKind {
    for (name, rule) in START_RULES {
        if let Some(kind) = rule(ctx) {
            trace!("规则 {} 命中: {:?}", name, ctx.line);
            return kind;
        }
    }
    LineKind::Element(ElementType::Action, ctx.raw.trim_end().to_string())
}

fn forced_rule(ctx: &LineContext) -> Option<LineKind> {
    let line = ctx.line;
    if BLOCK_REGEX["page_break"].is_match(line) {
        return Some(LineKind::PageBreak);
    }

    let first = line.chars().next()?;
    let rest = line[first.len_utf8()..].trim();
    let non_empty = |kind: ElementType| (!rest.is_empty()).then(|| LineKind::Element(kind, rest.to_string()));

    match first {
        FountainConstants::FORCE_SCENE_HEADING => BLOCK_REGEX["scene_heading_force"]
            .captures(line)
            .map(|caps| scene_heading(&caps["text"])),
        FountainConstants::FORCE_ACTION => Some(LineKind::Element(
            ElementType::Action,
            line[first.len_utf8()..].to_string(),
        )),
        FountainConstants::FORCE_CHARACTER => non_empty(ElementType::Character),
        FountainConstants::FORCE_LYRICS => non_empty(ElementType::Lyrics),
        FountainConstants::FORCE_TRANSITION => match centered_text(line) {
            Some(text) => Some(LineKind::Element(ElementType::CenteredAction, text)),
            None => non_empty(ElementType::Transition),
        },
        FountainConstants::FORCE_SECTION => BLOCK_REGEX["section"].captures(line).map(|caps| {
            LineKind::Section {
                depth: caps["depth"].len(),
                text: caps["text"].trim_end().to_string(),
            }
        }),
        FountainConstants::FORCE_SYNOPSIS => BLOCK_REGEX["synopsis"]
            .captures(line)
            .map(|caps| LineKind::Element(ElementType::Synopsis, caps["text"].trim().to_string())),
        _ => None,
    }
}

fn scene_heading_rule(ctx: &LineContext) -> Option<LineKind> {
    BLOCK_REGEX["scene_heading"]
        .is_match(ctx.line)
        .then(|| scene_heading(ctx.line))
}

fn character_rule(ctx: &LineContext) -> Option<LineKind> {
    let next = ctx.next?.trim();
    if next.is_empty()
        || is_scene_heading_line(next)
        || next.starts_with(FountainConstants::FORCE_SECTION)
    {
        return None;
    }
    is_character_cue(ctx.line).then(|| LineKind::Element(ElementType::Character, ctx.line.to_string()))
}

fn transition_rule(ctx: &LineContext) -> Option<LineKind> {
    let line = ctx.line;
    let has_suffix = FountainConstants::TRANSITION_SUFFIXES.iter().any(|suffix| {
        line.strip_suffix(suffix)
            .map_or(false, |head| head.ends_with(char::is_whitespace))
    });
    (has_suffix && is_upper_case_line(line))
        .then(|| LineKind::Element(ElementType::Transition, line.to_string()))
}

/// 拆出场景编号，`INT. HOUSE - DAY #12#` -> (`INT. HOUSE - DAY`, `12`)
fn scene_heading(text: &str) -> LineKind {
    let text = text.trim();
    if let Some(caps) = BLOCK_REGEX["scene_number"].captures(text) {
        let head = caps["head"].trim();
        let number = caps.name("hash").or_else(|| caps.name("paren"));
        if let Some(number) = number.filter(|_| !head.is_empty()) {
            return LineKind::SceneHeading {
                header: head.to_string(),
                number: Some(number.as_str().trim().to_string()),
            };
        }
    }
    LineKind::SceneHeading {
        header: text.to_string(),
        number: None,
    }
}

fn is_scene_heading_line(line: &str) -> bool {
    BLOCK_REGEX["scene_heading"].is_match(line) || BLOCK_REGEX["scene_heading_force"].is_match(line)
}

/// 角色名：去掉末尾括号扩展（可多个）后全为大写，且不含 `:` `!`
fn is_character_cue(line: &str) -> bool {
    let extension = &BLOCK_REGEX["character_extension"];
    let mut name = line;
    while let Some(m) = extension.find(name) {
        if m.start() == 0 {
            break;
        }
        name = &name[..m.start()];
    }
    name.chars().next().map_or(false, char::is_alphanumeric)
        && !name.contains([':', '!'])
        && is_upper_case_line(name)
}

fn centered_text(line: &str) -> Option<String> {
    BLOCK_REGEX["centered"]
        .captures(line)
        .map(|caps| caps["text"].to_string())
}

/// Fountain 行分类器
///
/// 逐行读取正文，按块状态和规则表把每行归类，连续的同类行合并成一个段落。
pub struct FountainParser {
    document: Document,
    block: Block,
    /// 正在累积的段落
    pending: Option<(ElementType, Vec<String>)>,
}

impl FountainParser {
    pub fn new() -> Self {
        FountainParser {
            document: Document::new(),
            block: Block::Start,
            pending: None,
        }
    }

    /// 解析 Fountain 格式文本
    ///
    /// # Arguments
    ///
    /// * `script` - Fountain 格式的剧本文本
    ///
    /// # Returns
    ///
    /// 解析出的文档；标记不合规时退化为 action 文本，不会失败
    pub fn parse(&mut self, script: &str) -> Document {
        self.document = Document::new();
        self.block = Block::Start;
        self.pending = None;

        let mut lines: Vec<&str> = script.lines().collect();
        if let Some(first) = lines.first_mut() {
            *first = strip_bom(*first);
        }
        let (title_values, body_start) = extract_title_page(&lines);
        self.document.title_values = title_values;

        let body = &lines[body_start..];
        for (i, raw) in body.iter().enumerate() {
            trace!("第 {} 行: {:?}", body_start + i + 1, raw);
            self.consume_line(body_start + i + 1, raw, body.get(i + 1).copied());
        }
        self.flush();

        debug!(
            "解析完成: {} 个标题页字段, {} 个场景",
            self.document.title_values.len(),
            self.document.scenes.len()
        );
        std::mem::take(&mut self.document)
    }

    fn consume_line(&mut self, line_no: usize, raw: &str, next: Option<&str>) {
        let line = raw.trim();
        if line.is_empty() {
            self.flush();
            self.block = Block::Start;
            return;
        }

        match self.block {
            Block::Action => self.append(ElementType::Action, raw.trim_end()),
            Block::Dialogue => {
                if BLOCK_REGEX["parenthetical"].is_match(line) {
                    self.emit(ElementType::Parenthetical, line);
                } else {
                    self.append(ElementType::Dialog, line);
                }
            }
            Block::Lyrics => match line.strip_prefix(FountainConstants::FORCE_LYRICS) {
                Some(rest) => self.append(ElementType::Lyrics, rest.trim()),
                None => self.start_action(raw),
            },
            Block::Centered => match centered_text(line) {
                Some(text) => self.append(ElementType::CenteredAction, &text),
                None => self.start_action(raw),
            },
            Block::Start => {
                let kind = classify(&LineContext { raw, line, next });
                debug!("第 {} 行分类为 {:?}", line_no, kind);
                self.apply(kind);
            }
        }
    }

    fn apply(&mut self, kind: LineKind) {
        self.flush();
        self.block = Block::Start;
        match kind {
            LineKind::SceneHeading { header, number } => {
                let scene = self.document.add_scene(Some(header));
                scene.number = number;
            }
            LineKind::PageBreak => self.document.last_scene_mut().add_page_break(),
            LineKind::Section { depth, text } => self
                .document
                .last_scene_mut()
                .paragraphs
                .push(Paragraph::Section(SceneSection { depth, text })),
            LineKind::Element(element_type, text) => match element_type {
                ElementType::Action => self.start_action(&text),
                ElementType::Character => {
                    self.emit(element_type, &text);
                    self.block = Block::Dialogue;
                }
                ElementType::Lyrics => {
                    self.append(element_type, &text);
                    self.block = Block::Lyrics;
                }
                ElementType::CenteredAction => {
                    self.append(element_type, &text);
                    self.block = Block::Centered;
                }
                _ => self.emit(element_type, &text),
            },
        }
    }

    fn start_action(&mut self, text: &str) {
        self.append(ElementType::Action, text.trim_end());
        self.block = Block::Action;
    }

    /// 追加到正在累积的同类段落，类型不同则先结束上一段
    fn append(&mut self, kind: ElementType, text: &str) {
        match self.pending.as_mut() {
            Some((pending_kind, lines)) if *pending_kind == kind => lines.push(text.to_string()),
            _ => {
                self.flush();
                self.pending = Some((kind, vec![text.to_string()]));
            }
        }
    }

    /// 直接写入一个单行段落
    fn emit(&mut self, kind: ElementType, text: &str) {
        self.flush();
        self.document.last_scene_mut().add_element(kind, text);
    }

    fn flush(&mut self) {
        if let Some((kind, lines)) = self.pending.take() {
            let text = match kind {
                ElementType::Action => dedent(&lines).join("\n"),
                _ => lines.join("\n"),
            };
            self.document.last_scene_mut().add_element(kind, text);
        }
    }
}

impl Default for FountainParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_line(line: &str, next: Option<&str>) -> LineKind {
        classify(&LineContext {
            raw: line,
            line: line.trim(),
            next,
        })
    }

    fn element(kind: ElementType, text: &str) -> LineKind {
        LineKind::Element(kind, text.to_string())
    }

    #[test]
    fn forced_markers() {
        assert_eq!(classify_line("===", None), LineKind::PageBreak);
        assert_eq!(classify_line("!SCREAMS.", Some("more")), element(ElementType::Action, "SCREAMS."));
        assert_eq!(classify_line("@McCLANE", Some("Yippee")), element(ElementType::Character, "McCLANE"));
        assert_eq!(classify_line("~Willy Wonka!", None), element(ElementType::Lyrics, "Willy Wonka!"));
        assert_eq!(classify_line("> THE END <", None), element(ElementType::CenteredAction, "THE END"));
        assert_eq!(classify_line("> Burn to white.", None), element(ElementType::Transition, "Burn to white."));
        assert_eq!(classify_line("= Set up the heist", None), element(ElementType::Synopsis, "Set up the heist"));
        assert_eq!(
            classify_line("### Seq", None),
            LineKind::Section { depth: 3, text: "Seq".to_string() }
        );
        assert_eq!(
            classify_line(".SNIPER SCOPE POV", None),
            LineKind::SceneHeading { header: "SNIPER SCOPE POV".to_string(), number: None }
        );
    }

    #[test]
    fn ellipsis_is_not_a_forced_heading() {
        assert_eq!(classify_line("...and then", None), element(ElementType::Action, "...and then"));
    }

    #[test]
    fn scene_heading_prefixes() {
        for line in ["INT. HOUSE - DAY", "ext. park", "EST. CITY", "INT./EXT. CAR", "I/E TRAIN"] {
            assert!(
                matches!(classify_line(line, None), LineKind::SceneHeading { .. }),
                "应该识别为场景标题: {}",
                line
            );
        }
        assert_eq!(classify_line("INTERIOR DESIGN", None), element(ElementType::Action, "INTERIOR DESIGN"));
    }

    #[test]
    fn scene_number_is_stripped() {
        assert_eq!(
            classify_line("INT. HOUSE - DAY #1A#", None),
            LineKind::SceneHeading { header: "INT. HOUSE - DAY".to_string(), number: Some("1A".to_string()) }
        );
        assert_eq!(
            classify_line("EXT. ROOF - NIGHT (12)", None),
            LineKind::SceneHeading { header: "EXT. ROOF - NIGHT".to_string(), number: Some("12".to_string()) }
        );
        assert_eq!(
            classify_line("INT. HALL - CONTINUOUS (CONTINUOUS)", None),
            LineKind::SceneHeading { header: "INT. HALL - CONTINUOUS (CONTINUOUS)".to_string(), number: None }
        );
    }

    #[test]
    fn character_needs_following_content() {
        assert_eq!(classify_line("JOHN", Some("Hi.")), element(ElementType::Character, "JOHN"));
        assert_eq!(classify_line("JOHN", Some("")), element(ElementType::Action, "JOHN"));
        assert_eq!(classify_line("JOHN", None), element(ElementType::Action, "JOHN"));
        assert_eq!(classify_line("JOHN", Some("INT. HOUSE")), element(ElementType::Action, "JOHN"));
        assert_eq!(classify_line("JOHN", Some("# Act")), element(ElementType::Action, "JOHN"));
    }

    #[test]
    fn character_extensions() {
        assert_eq!(
            classify_line("HANS (on the radio) (CONT'D)", Some("Hello.")),
            element(ElementType::Character, "HANS (on the radio) (CONT'D)")
        );
        assert_eq!(classify_line("(beat)", Some("x")), element(ElementType::Action, "(beat)"));
        assert_eq!(classify_line("John", Some("x")), element(ElementType::Action, "John"));
    }

    #[test]
    fn transition_suffix() {
        assert_eq!(classify_line("CUT TO:", Some("")), element(ElementType::Transition, "CUT TO:"));
        assert_eq!(
            classify_line("SMASH CUT TO:", Some("INT. HOUSE - DAY")),
            element(ElementType::Transition, "SMASH CUT TO:")
        );
        assert_eq!(classify_line("Cut to:", None), element(ElementType::Action, "Cut to:"));
        assert_eq!(classify_line("INTO:", None), element(ElementType::Action, "INTO:"));
    }

    #[test]
    fn transition_wins_over_character_before_content() {
        assert_eq!(
            classify_line("CUT TO:", Some("The house burns.")),
            element(ElementType::Transition, "CUT TO:")
        );
        assert_eq!(
            classify_line("BANG! BANG!", Some("Glass shatters.")),
            element(ElementType::Action, "BANG! BANG!")
        );
    }

    #[test]
    fn double_equals_is_not_a_synopsis() {
        assert_eq!(classify_line("==", None), element(ElementType::Action, "=="));
        assert_eq!(classify_line("=Setup", None), element(ElementType::Synopsis, "Setup"));
    }

    #[test]
    fn unsupported_markup_is_action() {
        assert_eq!(classify_line("/* cut */", None), element(ElementType::Action, "/* cut */"));
        assert_eq!(classify_line("[[note]]", None), element(ElementType::Action, "[[note]]"));
    }
}
