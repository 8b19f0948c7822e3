//! Image 元素 - 栅格化为位图的节点
//!
//! 字段：
//! - image: 图片文件名（不含扩展名）
//! - preserve_aspect: 保持宽高比（`@preserve-aspect`）
//! - slice: 九宫格边距，原样透传（`@slice=...`）

use crate::compiler::{ComponentContext, ElementKind, LayoutElement};
use crate::directive::{DirectiveKey, ParsedName};
use crate::geometry::draw_bounds;
use crate::responsive::ResponsiveParameter;
use crate::scene::{NodeId, SceneGraph};

pub struct ImageComponent;

impl ImageComponent {
    pub fn build<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
    ) -> LayoutElement {
        let bounds = draw_bounds(ctx.scene, node, ctx.scale());
        let image = ctx.queue_image(node, parsed, bounds);

        let mut element = LayoutElement::new(ElementKind::Image, &parsed.name, ctx.to_layout(&bounds))
            .with_responsive(ctx.parameter(node, parsed))
            .with_field("image", image);

        if parsed.directives.has(&DirectiveKey::PreserveAspect) {
            element = element.with_field("preserve_aspect", true);
        }
        if let Some(slice) = parsed.directives.text(&DirectiveKey::Slice) {
            element = element.with_field("slice", slice);
        }
        element
    }

    /// 叶子节点：带 button 指令时外面再包一层 Button
    pub fn build_or_button<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
    ) -> LayoutElement {
        let image = Self::build(ctx, node, parsed);
        if !parsed.directives.is_button() {
            return image;
        }

        let rect = image.rect;
        let responsive = image.responsive.clone();
        // 图片铺满按钮
        let image = image.with_responsive(ResponsiveParameter {
            pivot: None,
            stretchx: Some(true),
            stretchy: Some(true),
        });
        LayoutElement::new(ElementKind::Button, &parsed.name, rect)
            .with_responsive(responsive)
            .with_elements(vec![image])
    }
}
