//! 布局文档组装
//! 给编译好的根元素加上版本号与画布信息；根节点带 pivot 时把 base 对齐到父节点的对应边

use crate::compiler::LayoutElement;
use crate::config::ExportConfig;
use crate::geometry::{layout_bounds, Rect};
use crate::responsive::ResponsiveParameter;
use crate::scene::{NodeId, NodeKind, SceneGraph};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CanvasSize {
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CanvasBase {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CanvasInfo {
    pub image: CanvasSize,
    pub size: CanvasSize,
    pub base: CanvasBase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub version: String,
    pub canvas: CanvasInfo,
}

/// 一个导出根节点对应的布局文档
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutDocument {
    pub info: DocumentInfo,
    pub root: LayoutElement,
}

impl LayoutDocument {
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// 计算画布信息
pub fn canvas_info<S: SceneGraph + ?Sized>(
    scene: &S,
    root: NodeId,
    parameter: &ResponsiveParameter,
    config: &ExportConfig,
) -> CanvasInfo {
    let scale = config.scale;
    let root_box = layout_bounds(scene, root, scale);
    let size = CanvasSize { w: root_box.width, h: root_box.height };

    let parent = scene.parent(root);
    let top_level = scene.kind(root) == NodeKind::Artboard && parent.is_none();

    let mut base = match parent.filter(|_| !top_level) {
        Some(p) => {
            let relative = root_box.to_center_relative(&layout_bounds(scene, p, scale));
            CanvasBase { x: relative.x, y: relative.y, w: relative.width, h: relative.height }
        }
        None => CanvasBase { x: 0.0, y: 0.0, w: root_box.width, h: root_box.height },
    };

    if let Some(p) = parent.filter(|_| !top_level) {
        let parent_box = layout_bounds(scene, p, scale);
        align_base(&mut base, &parent_box, parameter);
    }

    CanvasInfo { image: size, size, base }
}

/// 按 pivot 把 base 的边贴到父节点（以父节点中心为原点）的对应边
fn align_base(base: &mut CanvasBase, parent: &Rect, parameter: &ResponsiveParameter) {
    let half_w = parent.width / 2.0;
    let half_h = parent.height / 2.0;
    if parameter.pivot_has("left") {
        base.x = -half_w;
    } else if parameter.pivot_has("right") {
        base.x = half_w - base.w;
    }
    if parameter.pivot_has("top") {
        base.y = -half_h;
    } else if parameter.pivot_has("bottom") {
        base.y = half_h - base.h;
    }
}

/// 组装布局文档
pub fn assemble<S: SceneGraph + ?Sized>(
    scene: &S,
    root: NodeId,
    element: LayoutElement,
    config: &ExportConfig,
) -> LayoutDocument {
    let canvas = canvas_info(scene, root, &element.responsive, config);
    LayoutDocument {
        info: DocumentInfo {
            version: config.format_version.clone(),
            canvas,
        },
        root: element,
    }
}
