//! 交互控件 - Button / Slider / Toggle / List
//! 都是带子元素的容器，区别只在类型和少量附加字段

use super::GroupComponent;
use crate::compiler::{ComponentContext, ElementKind, LayoutElement};
use crate::directive::{DirectiveKey, ParsedName};
use crate::scene::{NodeId, SceneGraph};

/// List 必需的子元素名
const LIST_AREA: &str = "Area";

pub struct ControlComponent;

impl ControlComponent {
    pub fn button<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        GroupComponent::build_as(ctx, node, parsed, depth, ElementKind::Button)
    }

    pub fn slider<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        GroupComponent::build_as(ctx, node, parsed, depth, ElementKind::Slider)
    }

    /// `@toggle=xxx` 的值作为 ToggleGroup 名
    pub fn toggle<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        let element = GroupComponent::build_as(ctx, node, parsed, depth, ElementKind::Toggle);
        match parsed.directives.text(&DirectiveKey::Toggle) {
            Some(group) => element.with_field("group", group),
            None => element,
        }
    }

    /// 子元素中必须有 `Area`，缺少时记录错误但仍然输出
    pub fn list<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
        depth: usize,
    ) -> LayoutElement {
        let element = GroupComponent::build_as(ctx, node, parsed, depth, ElementKind::List);
        if element.find_child(LIST_AREA).is_none() {
            ctx.structural(node, "list has no child named Area");
        }
        element
    }
}
