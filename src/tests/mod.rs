//! 单元测试模块
//! 覆盖指令解析、坐标换算、响应式推断、节点编译与导出流程

pub mod responsive_tests;
pub mod export_tests;

use crate::config::ExportConfig;
use crate::export::{export_roots, CompileOutput, Exporter};
use crate::geometry::Rect;
use crate::scene::{DesignDocument, DesignNode, NodeKind, TextAlign, TextInfo};
use crate::Color;

/// 画板节点，位于原点
pub(crate) fn artboard(name: &str, width: f64, height: f64) -> DesignNode {
    DesignNode::new(name, name, NodeKind::Artboard, Rect::new(0.0, 0.0, width, height))
}

/// 以名称作为 id 的节点
pub(crate) fn node(name: &str, kind: NodeKind, x: f64, y: f64, w: f64, h: f64) -> DesignNode {
    DesignNode::new(name, name, kind, Rect::new(x, y, w, h))
}

pub(crate) fn text_info(content: &str) -> TextInfo {
    TextInfo {
        content: content.to_string(),
        font_family: "Roboto".to_string(),
        font_style: "Bold".to_string(),
        font_size: 24.0,
        fill: Color::WHITE,
        align: TextAlign::Center,
        area_box: false,
    }
}

pub(crate) fn document(artboards: Vec<DesignNode>) -> DesignDocument {
    DesignDocument::from_nodes(artboards).unwrap()
}

/// 按默认根节点规则编译整个文档
pub(crate) fn compile(doc: &mut DesignDocument, config: &ExportConfig) -> CompileOutput {
    let exporter = Exporter::new(config).unwrap();
    let roots = export_roots(doc);
    exporter.compile(doc, &roots).unwrap()
}

pub(crate) fn config() -> ExportConfig {
    ExportConfig::new("out")
}
