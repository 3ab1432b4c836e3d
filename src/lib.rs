pub mod error;
pub mod models;
pub mod utils;
pub mod parser;
pub mod render;
pub mod api;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

pub use error::{FountainError, Result};

pub use models::{
    Conf,
    Document,
    ElementType,
    Paragraph,
    Scene,
    SceneElement,
    SceneSection,
    TitleValues
};

pub use parser::{
    FountainParser,
    Span,
    Style,
    parse_emphasis,
    plain_text
};

pub use render::{
    ConsoleDocumentRenderer,
    DocumentRenderer,
    HtmlDocumentRenderer,
    render_to_string
};

pub use api::{
    ExportResult,
    export_to_html,
    parse_fountain_text,
    render_console,
    render_html
};

/// 解析Fountain格式文本
///
/// # Arguments
///
/// * `source` - Fountain格式的剧本文本
///
/// # Returns
///
/// 文档对象；标记本身的问题不会导致失败
pub fn parse(source: &str) -> Document {
    let mut parser = FountainParser::new();
    parser.parse(source)
}

/// 从任意读取器解析剧本
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Document> {
    let mut source = String::new();
    for line in reader.lines() {
        let line = line.map_err(|e| FountainError::source_unavailable("<reader>", e))?;
        source.push_str(&line);
        source.push('\n');
    }
    Ok(parse(&source))
}

/// 从文件解析剧本
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    info!("读取剧本: {}", path.display());
    let file = File::open(path).map_err(|e| FountainError::source_unavailable(path, e))?;

    let doc = parse_reader(BufReader::new(file)).map_err(|e| match e {
        FountainError::SourceUnavailable { source, .. } => FountainError::source_unavailable(path, source),
        other => other,
    })?;
    info!("解析完成: {} 个场景", doc.scenes.len());
    Ok(doc)
}
