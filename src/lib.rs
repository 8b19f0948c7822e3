//! UI Layout Export - 设计稿到布局文档的编译器
//! 读取设计工具的节点树，按图层名中的指令与原生类型输出引擎可导入的布局文档和图片

mod color;
mod geometry;

pub use color::Color;
pub use geometry::{draw_bounds, layout_bounds, BoundsAccumulator, LayoutRect, Rect};

// 错误类型
pub mod error;

// 导出配置
pub mod config;

// 场景图接口与 JSON 设计文档
pub mod scene;

// 图层名指令解析
pub mod directive;

// 响应式参数推断
pub mod responsive;

// 栅格化请求
pub mod rendition;

// 节点 -> 布局元素
pub mod compiler;

// 布局文档组装
pub mod assembler;

// 文件与图片输出
pub mod output;

// 导出流程
pub mod export;

pub use assembler::LayoutDocument;
pub use compiler::{ElementKind, LayoutElement};
pub use config::ExportConfig;
pub use error::{ConfigError, ExportError, ExportWarning, RasterError, SceneError};
pub use export::{export_roots, CompileOutput, ExportReport, Exporter};
pub use output::{BoxRasterizer, FsSink, OutputSink, Rasterizer};
pub use scene::{DesignDocument, DesignNode, NodeId, NodeKind, SceneGraph};

// FFI 导出
mod ffi;
pub use ffi::*;

// 单元测试
#[cfg(test)]
mod tests;
