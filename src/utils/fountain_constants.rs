use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::Regex;

pub struct FountainConstants;

impl FountainConstants {
    /// 强制类型标记
    pub const FORCE_SCENE_HEADING: char = '.';
    pub const FORCE_ACTION: char = '!';
    pub const FORCE_CHARACTER: char = '@';
    pub const FORCE_LYRICS: char = '~';
    pub const FORCE_TRANSITION: char = '>';
    pub const FORCE_SECTION: char = '#';
    pub const FORCE_SYNOPSIS: char = '=';

    /// 非强制转场行的结尾词
    pub const TRANSITION_SUFFIXES: &'static [&'static str] = &["TO:"];

    /// 标题页缺省值，强制打印标题页时补齐
    pub fn title_page_defaults() -> [(&'static str, &'static str); 3] {
        [
            ("title", "Untitled Screenplay"),
            ("credit", "Written by"),
            ("author", "Unknown"),
        ]
    }
}

lazy_static! {
    // 标题页正则
    pub static ref TITLE_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        map.insert("key_value", Regex::new(r"^(?P<key>\w[\w \t\-]*?)[ \t]*:[ \t]*(?P<value>.*)$").unwrap());
        map.insert("continuation", Regex::new(r"^[ \t]+\S").unwrap());
        map
    };

    // 行分类正则，均作用于去除首尾空白后的行
    pub static ref BLOCK_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        map.insert("scene_heading", Regex::new(r"(?i)^(?:int\.?/ext|i\.?/e|int|ext|est)[.\s]").unwrap());
        map.insert("scene_heading_force", Regex::new(r"^\.(?P<text>[\w(（].*)$").unwrap());
        map.insert("scene_number", Regex::new(r"^(?P<head>.*?)\s*(?:#(?P<hash>[^#]+)#|\((?P<paren>[\w.\-]*\d[\w.\-]*)\))$").unwrap());
        map.insert("character_extension", Regex::new(r"\s*\([^()]*\)\s*$").unwrap());
        map.insert("parenthetical", Regex::new(r"^\(.*\)$").unwrap());
        map.insert("centered", Regex::new(r"^>\s*(?P<text>.*?)\s*<$").unwrap());
        map.insert("page_break", Regex::new(r"^={3,}$").unwrap());
        map.insert("section", Regex::new(r"^(?P<depth>#+)\s*(?P<text>.*)$").unwrap());
        map.insert("synopsis", Regex::new(r"^=(?P<text>[^=].*)$").unwrap());
        map
    };
}
