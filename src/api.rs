//! 对外 API
//!
//! 给宿主程序调用的简单接口：输入剧本文本，输出 JSON、HTML 或终端文本。

use std::fs;

use log::{info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::models::Conf;
use crate::render::{render_to_string, ConsoleDocumentRenderer, HtmlDocumentRenderer};

/// 导出结果
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub success: bool,
    pub message: String,
    pub file_path: Option<String>,
}

/// 解析Fountain文本，返回文档的 JSON
pub fn parse_fountain_text(text: &str) -> String {
    let doc = crate::parse(text);
    serde_json::to_string(&doc).unwrap_or_else(|_| "{}".to_string())
}

/// 渲染为 HTML
pub fn render_html(text: &str, conf: &Conf) -> Result<String> {
    let doc = crate::parse(text);
    let mut renderer = HtmlDocumentRenderer::new(conf.clone());
    render_to_string(&mut renderer, &doc)
}

/// 渲染为终端文本
pub fn render_console(text: &str, conf: &Conf) -> Result<String> {
    conf.validate()?;
    let doc = crate::parse(text);
    let mut renderer = ConsoleDocumentRenderer::new(conf.clone());
    render_to_string(&mut renderer, &doc)
}

/// 导出 HTML 文件
pub fn export_to_html(text: &str, output_path: &str, conf: &Conf) -> ExportResult {
    let written = render_html(text, conf)
        .map_err(|e| e.to_string())
        .and_then(|html| fs::write(output_path, html).map_err(|e| e.to_string()));

    match written {
        Ok(()) => {
            info!("HTML 已导出到 {}", output_path);
            ExportResult {
                success: true,
                message: "HTML文档导出成功".to_string(),
                file_path: Some(output_path.to_string()),
            }
        }
        Err(e) => {
            warn!("HTML 导出失败: {}", e);
            ExportResult {
                success: false,
                message: format!("导出失败: {}", e),
                file_path: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FountainError;

    #[test]
    fn json_contains_scenes_and_paragraphs() {
        let json = parse_fountain_text("INT. HOUSE - DAY\n\nJOHN\nHello.\n");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let scene = &value["scenes"][0];
        assert_eq!(scene["header"], "INT. HOUSE - DAY");
        assert_eq!(scene["paragraphs"][0]["type"], "character");
        assert_eq!(scene["paragraphs"][1]["text"], "Hello.");
    }

    #[test]
    fn console_rejects_narrow_width() {
        let conf = Conf { console_width: 5, ..Conf::default() };
        assert!(matches!(render_console("Hi.", &conf), Err(FountainError::Config(_))));
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let result = export_to_html("Hi.", "/no/such/dir/out.html", &Conf::default());
        assert!(!result.success);
        assert!(result.file_path.is_none());
        assert!(result.message.starts_with("导出失败"));
    }
}
