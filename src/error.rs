use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 解析与渲染过程中可能出现的错误
///
/// 标记语法本身永远不会导致错误：无法识别的内容一律退化为 action 文本。
/// 这里只覆盖读取源文件、构建文档模型和输出时的失败。
#[derive(Error, Debug)]
pub enum FountainError {
    /// 无法读取剧本源（文件不存在、权限不足、编码错误等）
    #[error("无法读取剧本源 {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 章节深度必须为正整数
    #[error("章节深度必须大于 0，实际为 {0}")]
    InvalidSectionDepth(usize),

    /// 配置文件内容无效
    #[error("配置无效: {0}")]
    Config(String),

    #[error("渲染输出失败: {0}")]
    Render(#[from] fmt::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl FountainError {
    pub(crate) fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FountainError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FountainError>;
