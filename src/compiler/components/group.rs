//! Group 元素 - 普通容器
//!
//! 字段：
//! - elements: 子元素（即使为空也输出）
//! - canvas_group: `@canvas-group`
//! - vertical_fit: `@vertical-fit`
//! - preferred_height: `@preferred-height`，取自身高度
//! - layout: `@v-group` 时推断的纵向布局参数

use super::infer_vertical_layout;
use crate::compiler::{convert_children, ComponentContext, ElementKind, LayoutElement};
use crate::directive::{DirectiveKey, ParsedName};
use crate::geometry::layout_bounds;
use crate::scene::{NodeId, SceneGraph};
use serde_json::Value;

pub struct GroupComponent;

impl GroupComponent {
    pub fn build<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        Self::build_as(ctx, node, parsed, depth, ElementKind::Group)
    }

    /// 以指定类型输出容器及其子元素
    pub fn build_as<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
        kind: ElementKind,
    ) -> LayoutElement {
        let bounds = layout_bounds(ctx.scene, node, ctx.scale());
        let rect = ctx.to_layout(&bounds);
        let elements = convert_children(ctx, node, depth);

        let directives = &parsed.directives;
        let mut element = LayoutElement::new(kind, &parsed.name, rect)
            .with_responsive(ctx.parameter(node, parsed));

        if directives.has(&DirectiveKey::CanvasGroup) {
            element = element.with_field("canvas_group", true);
        }
        if directives.has(&DirectiveKey::VerticalFit) {
            element = element.with_field("vertical_fit", true);
        }
        if directives.has(&DirectiveKey::PreferredHeight) {
            element = element.with_field("preferred_height", rect.h);
        }
        if directives.has(&DirectiveKey::VGroup) {
            let layout = infer_vertical_layout(&rect, &elements);
            element = element.with_field("layout", Value::Object(layout));
        }

        element.with_elements(elements)
    }
}
