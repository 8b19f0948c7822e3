//! 错误类型

use crate::geometry::Rect;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 导出前的输入校验错误，出现时不会开始遍历节点树
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scale must be a number, got \"{0}\"")]
    NonNumericScale(String),

    #[error("scale must be a finite positive number, got {0}")]
    InvalidScale(f64),

    #[error("output destination is missing")]
    MissingOutput,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 场景图访问错误
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown node id \"{0}\"")]
    UnknownNode(String),

    #[error("duplicate node id \"{0}\"")]
    DuplicateNode(String),

    #[error("node \"{node}\" cannot be resized to {width}x{height}")]
    ResizeRejected { node: String, width: f64, height: f64 },

    #[error("design document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 栅格化批次失败（整批报告一次，不逐项）
#[derive(Debug, Error)]
#[error("rasterization failed for {failed} of {total} renditions: {message}")]
pub struct RasterError {
    pub failed: usize,
    pub total: usize,
    pub message: String,
}

/// 导出流程错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("no exportable root found")]
    NothingToExport,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize layout document: {0}")]
    Json(#[from] serde_json::Error),
}

/// 导出过程中的非致命问题，导出仍会完成
#[derive(Debug, Clone, PartialEq)]
pub enum ExportWarning {
    /// 结构问题（缺少 Area 子节点、容器类型不符等），该节点输出为空或不完整
    Structural { node: String, message: String },
    /// 尺寸探测恢复后节点未回到原位，建议手动撤销
    ProbeDrift { node: String, before: Rect, restore: Rect },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::Structural { node, message } => write!(f, "{}: {}", node, message),
            ExportWarning::ProbeDrift { node, before, restore } => write!(
                f,
                "{}: bounds changed after the resize probe ({},{} {}x{} -> {},{} {}x{}); undo manually if the document looks wrong",
                node,
                before.x, before.y, before.width, before.height,
                restore.x, restore.y, restore.width, restore.height,
            ),
        }
    }
}
