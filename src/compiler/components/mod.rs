//! 各输出类型的构建器
//! 每个类型独立文件，便于维护

mod image;
mod text;
mod group;
mod control;
mod scroller;
mod viewport;
mod vertical_group;

pub use image::ImageComponent;
pub use text::TextComponent;
pub use group::GroupComponent;
pub use control::ControlComponent;
pub use scroller::ScrollerComponent;
pub use viewport::ViewportComponent;
pub use vertical_group::{infer_vertical_layout, ALIGN_EPSILON};

use crate::scene::{NodeId, NodeKind, SceneGraph};
use crate::geometry::layout_bounds;

/// 节点自身是 Repeat Grid 时返回自身，否则返回第一个 Repeat Grid 子节点
pub(crate) fn find_repeat_grid<S: SceneGraph + ?Sized>(scene: &S, node: NodeId) -> Option<NodeId> {
    if scene.kind(node) == NodeKind::RepeatGrid {
        return Some(node);
    }
    scene
        .children(node)
        .iter()
        .copied()
        .find(|c| scene.kind(*c) == NodeKind::RepeatGrid)
}

/// Repeat Grid 的单元按位置排序（先行后列）
pub(crate) fn grid_cells<S: SceneGraph + ?Sized>(scene: &S, grid: NodeId) -> Vec<NodeId> {
    let mut cells = scene.children(grid).to_vec();
    cells.sort_by(|a, b| {
        let ra = layout_bounds(scene, *a, 1.0);
        let rb = layout_bounds(scene, *b, 1.0);
        ra.y.total_cmp(&rb.y).then(ra.x.total_cmp(&rb.x))
    });
    cells
}
