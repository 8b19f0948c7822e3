//! 场景 -> 布局树编译器
//!
//! 递归遍历节点：先按指令、再按原生类型决定输出类型，交给 `components` 中对应的构建器。
//! 子节点按图层的逆序处理，保证输出 `elements` 的绘制顺序与设计稿一致。

mod element;
pub mod components;

pub use element::{ElementKind, LayoutElement};

use crate::config::ExportConfig;
use crate::directive::{parse_node, DirectiveKey, ParsedName};
use crate::error::ExportWarning;
use crate::geometry::{layout_bounds, LayoutRect, Rect};
use crate::rendition::RenditionQueue;
use crate::responsive::{ResponsiveMap, ResponsiveParameter};
use crate::scene::{NodeId, NodeKind, SceneGraph};

use components::{
    ControlComponent, GroupComponent, ImageComponent, ScrollerComponent, TextComponent,
    ViewportComponent,
};

/// 编译一个导出根节点时共享的上下文
pub struct ComponentContext<'a, S: SceneGraph + ?Sized> {
    pub scene: &'a S,
    pub config: &'a ExportConfig,
    pub responsive: &'a ResponsiveMap,
    /// 导出根节点的逻辑包围盒（已缩放），所有输出坐标相对它的中心
    pub base: Rect,
    /// 图片输出子文件夹
    pub folder: &'a str,
    pub renditions: &'a mut RenditionQueue,
    pub warnings: &'a mut Vec<ExportWarning>,
}

impl<S: SceneGraph + ?Sized> ComponentContext<'_, S> {
    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    /// 全局缩放坐标 -> 输出坐标
    pub fn to_layout(&self, rect: &Rect) -> LayoutRect {
        LayoutRect::from_center_relative(&rect.to_center_relative(&self.base))
    }

    pub fn parse(&self, node: NodeId) -> ParsedName {
        parse_node(self.scene, node, self.config.extended)
    }

    /// 推断结果优先；没有探测记录时只使用显式指令
    pub fn parameter(&self, node: NodeId, parsed: &ParsedName) -> ResponsiveParameter {
        match self.responsive.parameter(node) {
            Some(p) => p.clone(),
            None => ResponsiveParameter::resolve(None, &parsed.directives),
        }
    }

    /// 记录结构问题，继续导出
    pub fn structural(&mut self, node: NodeId, message: &str) {
        let guid = self.scene.guid(node).to_string();
        tracing::error!(node = %guid, name = self.scene.name(node), "{}", message);
        self.warnings.push(ExportWarning::Structural {
            node: guid,
            message: message.to_string(),
        });
    }

    /// 把节点加入栅格化队列，返回布局文档中引用的图片名
    pub fn queue_image(&mut self, node: NodeId, parsed: &ParsedName, bounds: Rect) -> String {
        let parent_name = self
            .scene
            .parent(node)
            .map(|p| self.parse(p).name)
            .unwrap_or_default();
        let label = format!("{} - {}", parent_name, parsed.name);
        let request = self.renditions.push(
            node,
            self.scene.guid(node),
            &label,
            self.folder,
            self.config.scale,
            bounds,
        );
        request.stem().to_string()
    }
}

/// 转换单个节点；返回 None 表示该节点不输出
pub fn convert_node<S: SceneGraph + ?Sized>(
    ctx: &mut ComponentContext<'_, S>,
    node: NodeId,
    depth: usize,
) -> Option<LayoutElement> {
    let parsed = ctx.parse(node);
    let directives = &parsed.directives;

    if directives.is_comment() {
        tracing::debug!(name = %parsed.name, "commented out");
        return None;
    }
    if depth > 0 && directives.is_sub_prefab() {
        tracing::debug!(name = %parsed.name, "sub-prefab boundary, exported separately");
        return None;
    }

    let kind = ctx.scene.kind(node);
    tracing::debug!(name = %parsed.name, ?kind, depth, "convert");

    let element = match kind {
        NodeKind::BooleanGroup => ImageComponent::build_or_button(ctx, node, &parsed),
        k if k.is_shape() => ImageComponent::build_or_button(ctx, node, &parsed),
        NodeKind::Text => {
            if directives.is_image() || directives.is_button() {
                ImageComponent::build_or_button(ctx, node, &parsed)
            } else {
                TextComponent::build(ctx, node, &parsed)
            }
        }
        _ => convert_container(ctx, node, &parsed, depth),
    };

    Some(element.with_component(parsed.directives.is_component()))
}

fn convert_container<S: SceneGraph + ?Sized>(
    ctx: &mut ComponentContext<'_, S>,
    node: NodeId,
    parsed: &ParsedName,
    depth: usize,
) -> LayoutElement {
    let directives = &parsed.directives;
    if directives.is_image() {
        return ImageComponent::build(ctx, node, parsed);
    }
    if directives.is_button() {
        return ControlComponent::button(ctx, node, parsed, depth);
    }
    // Scrollbar 指令不参与判定，带该后缀的容器按后续规则处理
    if directives.has(&DirectiveKey::Slider) {
        return ControlComponent::slider(ctx, node, parsed, depth);
    }
    if directives.has(&DirectiveKey::Toggle) {
        return ControlComponent::toggle(ctx, node, parsed, depth);
    }
    if directives.has(&DirectiveKey::List) {
        return ControlComponent::list(ctx, node, parsed, depth);
    }
    if directives.has(&DirectiveKey::Scroller) {
        return ScrollerComponent::build(ctx, node, parsed, depth);
    }
    if directives.has(&DirectiveKey::Viewport) {
        return ViewportComponent::build(ctx, node, parsed, depth);
    }
    GroupComponent::build(ctx, node, parsed, depth)
}

/// 转换全部子节点（图层逆序）
pub fn convert_children<S: SceneGraph + ?Sized>(
    ctx: &mut ComponentContext<'_, S>,
    node: NodeId,
    depth: usize,
) -> Vec<LayoutElement> {
    let children = ctx.scene.children(node).to_vec();
    children
        .into_iter()
        .rev()
        .filter_map(|child| convert_node(ctx, child, depth + 1))
        .collect()
}

/// 以 `root` 为基准编译整棵子树
///
/// 根节点被注释掉时返回 None。
pub fn compile_root<S: SceneGraph + ?Sized>(
    scene: &S,
    root: NodeId,
    config: &ExportConfig,
    responsive: &ResponsiveMap,
    folder: &str,
    renditions: &mut RenditionQueue,
    warnings: &mut Vec<ExportWarning>,
) -> Option<LayoutElement> {
    let mut ctx = ComponentContext {
        scene,
        config,
        responsive,
        base: layout_bounds(scene, root, config.scale),
        folder,
        renditions,
        warnings,
    };
    convert_node(&mut ctx, root, 0)
}
