use std::fmt;

use serde::Serialize;

use crate::error::{FountainError, Result};
use crate::models::title_values::TitleValues;

/// 场景内段落的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Action,
    CenteredAction,
    Character,
    Dialog,
    Parenthetical,
    Transition,
    Lyrics,
    PageBreak,
    Section,
    Synopsis,
}

impl ElementType {
    /// 小写名称，用于 HTML class 和 JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Action => "action",
            ElementType::CenteredAction => "centered_action",
            ElementType::Character => "character",
            ElementType::Dialog => "dialog",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Transition => "transition",
            ElementType::Lyrics => "lyrics",
            ElementType::PageBreak => "page_break",
            ElementType::Section => "section",
            ElementType::Synopsis => "synopsis",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// 一个段落单元。`text` 保留原始的强调标记，渲染时才解析。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneElement {
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub text: String,
}

impl SceneElement {
    pub fn new(kind: ElementType, text: impl Into<String>) -> Self {
        SceneElement {
            kind,
            text: text.into(),
        }
    }
}

/// 章节标记，`depth` 为前导 `#` 的个数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSection {
    pub depth: usize,
    pub text: String,
}

impl SceneSection {
    pub fn new(depth: usize, text: impl Into<String>) -> Result<Self> {
        if depth == 0 {
            return Err(FountainError::InvalidSectionDepth(depth));
        }
        Ok(SceneSection {
            depth,
            text: text.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Paragraph {
    Element(SceneElement),
    Section(SceneSection),
}

impl Paragraph {
    pub fn kind(&self) -> ElementType {
        match self {
            Paragraph::Element(e) => e.kind,
            Paragraph::Section(_) => ElementType::Section,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Paragraph::Element(e) => &e.text,
            Paragraph::Section(s) => &s.text,
        }
    }

    /// 章节深度，非章节返回 None
    pub fn depth(&self) -> Option<usize> {
        match self {
            Paragraph::Section(s) => Some(s.depth),
            Paragraph::Element(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&SceneSection> {
        match self {
            Paragraph::Section(s) => Some(s),
            Paragraph::Element(_) => None,
        }
    }
}

/// 场景：一个场景标题（开头无标题的内容块则为 None）及其段落
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub header: Option<String>,
    /// 场景编号原文，如 `#1A#` 中的 `1A`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

impl Scene {
    pub fn new(header: Option<String>) -> Self {
        Scene {
            header,
            number: None,
            paragraphs: Vec::new(),
        }
    }

    /// 追加一个段落。`ElementType::Section` 按深度 1 的章节处理。
    pub fn add_element(&mut self, kind: ElementType, text: impl Into<String>) -> &mut Paragraph {
        let paragraph = match kind {
            ElementType::Section => Paragraph::Section(SceneSection {
                depth: 1,
                text: text.into(),
            }),
            _ => Paragraph::Element(SceneElement::new(kind, text)),
        };
        self.paragraphs.push(paragraph);
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn add_section(&mut self, depth: usize, text: impl Into<String>) -> Result<()> {
        let section = SceneSection::new(depth, text)?;
        self.paragraphs.push(Paragraph::Section(section));
        Ok(())
    }

    pub fn add_action(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Action, text);
    }

    pub fn add_centered_action(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::CenteredAction, text);
    }

    pub fn add_character(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Character, text);
    }

    pub fn add_dialog(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Dialog, text);
    }

    pub fn add_parenthetical(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Parenthetical, text);
    }

    pub fn add_transition(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Transition, text);
    }

    pub fn add_lyrics(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Lyrics, text);
    }

    pub fn add_synopsis(&mut self, text: impl Into<String>) {
        self.add_element(ElementType::Synopsis, text);
    }

    pub fn add_page_break(&mut self) {
        self.add_element(ElementType::PageBreak, String::new());
    }

    pub fn last_paragraph(&self) -> Option<&Paragraph> {
        self.paragraphs.last()
    }
}

/// 解析后的剧本文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title_values: TitleValues,
    pub scenes: Vec<Scene>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&mut self, header: Option<String>) -> &mut Scene {
        self.scenes.push(Scene::new(header));
        let last = self.scenes.len() - 1;
        &mut self.scenes[last]
    }

    pub fn last_scene(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    /// 获取最后一个场景；文档还没有场景时创建一个无标题场景
    pub fn last_scene_mut(&mut self) -> &mut Scene {
        if self.scenes.is_empty() {
            return self.add_scene(None);
        }
        let last = self.scenes.len() - 1;
        &mut self.scenes[last]
    }

    pub fn last_paragraph(&self) -> Option<&Paragraph> {
        self.last_scene().and_then(Scene::last_paragraph)
    }

    pub fn set_title_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.title_values.insert(key, value);
    }

    /// 所有段落（按场景顺序展开）
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.scenes.iter().flat_map(|s| s.paragraphs.iter())
    }
}
