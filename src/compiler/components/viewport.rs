//! Viewport 元素 - 纵向滚动的 Repeat Grid
//!
//! 内容区域取所有单元墨迹范围的并集；与视口墨迹范围不相交的单元视为设计工具残留，不计入内容区域。
//! 每个子元素固定为 `pivot=topleft`、`stretchx=true`。

use super::{find_repeat_grid, grid_cells};
use crate::compiler::{convert_node, ComponentContext, ElementKind, LayoutElement};
use crate::directive::ParsedName;
use crate::geometry::{draw_bounds, layout_bounds, BoundsAccumulator};
use crate::responsive::ResponsiveParameter;
use crate::scene::{NodeId, SceneGraph};
use serde_json::json;

pub struct ViewportComponent;

impl ViewportComponent {
    pub fn build<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        let scale = ctx.scale();
        let viewport_box = layout_bounds(ctx.scene, node, scale);
        let element = LayoutElement::new(ElementKind::Viewport, &parsed.name, ctx.to_layout(&viewport_box))
            .with_responsive(ctx.parameter(node, parsed));

        let grid = find_repeat_grid(ctx.scene, node)
            .and_then(|g| ctx.scene.repeat_grid(g).copied().map(|info| (g, info)));
        let Some((grid_node, grid)) = grid.filter(|(_, info)| info.columns == 1) else {
            ctx.structural(node, "viewport requires a single-column repeat grid");
            return element;
        };

        let viewport_draw = draw_bounds(ctx.scene, node, scale);
        let mut content = BoundsAccumulator::new();
        let mut elements = Vec::new();
        let children = ctx.scene.children(grid_node).to_vec();
        for child in children.into_iter().rev() {
            let child_draw = draw_bounds(ctx.scene, child, scale);
            if child_draw.intersects(&viewport_draw) {
                content.add(&child_draw);
            } else {
                tracing::debug!(
                    viewport = %parsed.name,
                    child = ctx.scene.guid(child),
                    "repeat grid item outside the viewport, excluded from content bounds"
                );
            }
            if let Some(item) = convert_node(ctx, child, depth + 1) {
                elements.push(item.with_responsive(ResponsiveParameter {
                    pivot: Some("topleft".to_string()),
                    stretchx: Some(true),
                    stretchy: None,
                }));
            }
        }

        // 翻页高度：第一个单元在格内的纵向偏移 + 名义单元高度
        let grid_box = layout_bounds(ctx.scene, grid_node, scale);
        let cell_height = grid_cells(ctx.scene, grid_node)
            .first()
            .map(|first| layout_bounds(ctx.scene, *first, scale).y - grid_box.y)
            .unwrap_or(0.0)
            + grid.cell_height * scale;

        let mut element = element
            .with_field("scroll", "vertical")
            .with_field("cell_height", cell_height);
        if let Some(rect) = content.result() {
            let content_rect = ctx.to_layout(&rect);
            element = element.with_field(
                "content",
                json!({ "x": content_rect.x, "y": content_rect.y, "w": content_rect.w, "h": content_rect.h }),
            );
        }
        element.with_elements(elements)
    }
}
