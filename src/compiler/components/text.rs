//! 文本元素 - Text / TextMeshPro / Input
//!
//! 字段：
//! - text: 文本内容
//! - textType: point（点文本）或 paragraph（区域文本）
//! - font / style / size / color / align

use crate::compiler::components::ImageComponent;
use crate::compiler::{ComponentContext, ElementKind, LayoutElement};
use crate::directive::{DirectiveKey, ParsedName};
use crate::geometry::{draw_bounds, layout_bounds};
use crate::scene::{NodeId, SceneGraph};

pub struct TextComponent;

impl TextComponent {
    pub fn build<S: SceneGraph + ?Sized>(
        ctx: &mut ComponentContext<'_, S>,
        node: NodeId,
        parsed: &ParsedName,
    ) -> LayoutElement {
        let Some(info) = ctx.scene.text(node).cloned() else {
            ctx.structural(node, "text node has no text attributes, rasterizing instead");
            return ImageComponent::build(ctx, node, parsed);
        };

        let scale = ctx.scale();
        let bounds = if info.area_box {
            layout_bounds(ctx.scene, node, scale)
        } else {
            draw_bounds(ctx.scene, node, scale)
        };

        let kind = Self::kind(ctx, parsed);
        LayoutElement::new(kind, &parsed.name, ctx.to_layout(&bounds))
            .with_responsive(ctx.parameter(node, parsed))
            .with_field("text", info.content.as_str())
            .with_field("textType", if info.area_box { "paragraph" } else { "point" })
            .with_field("font", info.font_family.as_str())
            .with_field("style", info.font_style.as_str())
            .with_field("size", info.font_size * scale)
            .with_field("color", info.fill.to_hex_string())
            .with_field("align", info.align.as_str())
    }

    /// input 指令 -> Input；扩展模式或 `@textmp` -> TextMeshPro（显式 `@text` 除外）；否则 Text
    fn kind<S: SceneGraph + ?Sized>(ctx: &ComponentContext<'_, S>, parsed: &ParsedName) -> ElementKind {
        let directives = &parsed.directives;
        if directives.has(&DirectiveKey::Input) {
            return ElementKind::Input;
        }
        if directives.has(&DirectiveKey::TextMp) {
            return ElementKind::TextMeshPro;
        }
        if ctx.config.extended && !directives.is_explicit(&DirectiveKey::Text) {
            return ElementKind::TextMeshPro;
        }
        ElementKind::Text
    }
}
