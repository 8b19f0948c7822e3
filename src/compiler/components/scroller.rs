//! Scroller 元素 - 由 Repeat Grid 生成的滚动列表
//!
//! - 单列：纵向滚动，第一个单元作为模板
//! - 单行：横向滚动，第一个单元作为模板
//! - 其他：网格滚动，第一行的单元合成一个模板 item
//!
//! padding / spacing 由单元尺寸、单元间隔以及模板在单元内的偏移计算，均为缩放后的值。

use super::{find_repeat_grid, grid_cells};
use crate::compiler::{convert_node, ComponentContext, ElementKind, LayoutElement};
use crate::directive::ParsedName;
use crate::geometry::{layout_bounds, BoundsAccumulator};
use crate::scene::{NodeId, SceneGraph};
use serde_json::json;

/// 显式内容区域子节点名
const SCROLL_AREA: &str = "Area";

/// 滚动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
    Grid,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Vertical => "vertical",
            ScrollDirection::Horizontal => "horizontal",
            ScrollDirection::Grid => "grid",
        }
    }
}

pub struct ScrollerComponent;

impl ScrollerComponent {
    pub fn build<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        let scale = ctx.scale();
        let scroller_box = layout_bounds(ctx.scene, node, scale);
        let element = LayoutElement::new(ElementKind::Scroller, &parsed.name, ctx.to_layout(&scroller_box))
            .with_responsive(ctx.parameter(node, parsed));

        let has_area = ctx
            .scene
            .children(node)
            .iter()
            .any(|c| ctx.parse(*c).name == SCROLL_AREA);
        if has_area {
            ctx.structural(node, "scroller with an Area child is not supported");
            return element;
        }

        let Some(grid_node) = find_repeat_grid(ctx.scene, node) else {
            ctx.structural(node, "scroller requires a repeat grid");
            return element;
        };
        let Some(grid) = ctx.scene.repeat_grid(grid_node).copied() else {
            ctx.structural(node, "repeat grid has no grid attributes");
            return element;
        };
        let cells = grid_cells(ctx.scene, grid_node);
        let Some(first) = cells.first().copied() else {
            ctx.structural(node, "repeat grid has no items");
            return element;
        };

        let direction = if grid.columns == 1 {
            ScrollDirection::Vertical
        } else if grid.rows == 1 {
            ScrollDirection::Horizontal
        } else {
            ScrollDirection::Grid
        };

        let grid_box = layout_bounds(ctx.scene, grid_node, scale);
        let item_box = layout_bounds(ctx.scene, first, scale);
        let cell_w = grid.cell_width * scale;
        let cell_h = grid.cell_height * scale;
        let gap_x = grid.padding_x * scale;
        let gap_y = grid.padding_y * scale;

        // 模板在自身单元中的偏移
        let offset_x = item_box.x - grid_box.x;
        let offset_y = item_box.y - grid_box.y;

        let spacing_x = cell_w + gap_x - item_box.width;
        let spacing_y = cell_h + gap_y - item_box.height;
        let left = (grid_box.x - scroller_box.x) + offset_x;
        let top = (grid_box.y - scroller_box.y) + offset_y;

        let template = match direction {
            ScrollDirection::Vertical | ScrollDirection::Horizontal => {
                convert_node(ctx, first, depth + 1).into_iter().collect()
            }
            ScrollDirection::Grid => {
                let row: Vec<NodeId> = cells.iter().copied().take(grid.columns).collect();
                vec![Self::regroup_row(ctx, &row, depth)]
            }
        };

        let columns = match direction {
            ScrollDirection::Grid => grid.columns as f64,
            _ => 1.0,
        };
        let (right, bottom, spacing) = match direction {
            ScrollDirection::Horizontal => (
                cell_w - offset_x - item_box.width,
                scroller_box.height - top - item_box.height,
                spacing_x,
            ),
            _ => {
                let extent = columns * item_box.width + (columns - 1.0) * spacing_x;
                (scroller_box.width - left - extent, cell_h - offset_y - item_box.height, spacing_y)
            }
        };

        element
            .with_field("scroll", direction.as_str())
            .with_field(
                "layout",
                json!({
                    "method": direction.as_str(),
                    "padding": { "left": left, "right": right, "top": top, "bottom": bottom },
                    "spacing": spacing,
                    "spacing_x": spacing_x,
                    "spacing_y": spacing_y,
                    "cell": { "w": item_box.width, "h": item_box.height },
                }),
            )
            .with_elements(template)
    }

    /// 网格滚动：一行单元合成一个模板
    fn regroup_row<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        row: &[NodeId],
        depth: usize,
    ) -> LayoutElement {
        let scale = ctx.scale();
        let mut envelope = BoundsAccumulator::new();
        for cell in row {
            envelope.add(&layout_bounds(ctx.scene, *cell, scale));
        }
        let elements: Vec<LayoutElement> = row
            .iter()
            .rev()
            .filter_map(|cell| convert_node(ctx, *cell, depth + 2))
            .collect();
        let rect = envelope.result().map(|r| ctx.to_layout(&r)).unwrap_or_default();
        LayoutElement::new(ElementKind::Group, "item0", rect).with_elements(elements)
    }
}
