use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FountainError, Result};

/// 渲染配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// 即使没有标题页信息也打印（占位）标题页
    pub print_title_page: bool,
    /// 是否打印章节
    pub print_sections: bool,
    /// 是否打印概要
    pub print_synopsis: bool,
    /// 是否在场景标题后打印场景编号
    pub print_scene_numbers: bool,
    /// HTML 是否输出完整页面（含 CSS）
    pub html_standalone: bool,
    /// 终端输出宽度（按字素簇计）
    pub console_width: usize,
    /// 终端输出是否带颜色和文字属性
    pub use_colors: bool,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            print_title_page: false,
            print_sections: true,
            print_synopsis: true,
            print_scene_numbers: false,
            html_standalone: true,
            console_width: 80,
            use_colors: true,
        }
    }
}

impl Conf {
    /// 从 JSON 文本读取配置，缺省字段使用默认值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let conf: Conf =
            serde_json::from_str(json).map_err(|e| FountainError::Config(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| FountainError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<()> {
        if self.console_width < 20 {
            return Err(FountainError::Config(format!(
                "console_width 至少为 20，实际为 {}",
                self.console_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let conf = Conf::from_json_str(r#"{ "console_width": 100, "use_colors": false }"#).unwrap();
        assert_eq!(conf.console_width, 100);
        assert!(!conf.use_colors);
        assert!(conf.print_sections);
        assert!(conf.html_standalone);
    }

    #[test]
    fn rejects_narrow_console() {
        let err = Conf::from_json_str(r#"{ "console_width": 5 }"#).unwrap_err();
        assert!(matches!(err, FountainError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Conf::from_json_str("{ console_width: }").is_err());
    }
}
