//! 纵向布局推断
//!
//! 根据已输出的子元素反推 VerticalLayoutGroup 的 padding / spacing / child_alignment。
//! 标记为组件（`+`）的子元素排在最后，不参与测量。

use crate::compiler::LayoutElement;
use crate::geometry::{BoundsAccumulator, LayoutRect};
use serde_json::{json, Map, Value};

/// 判断边缘对齐时的容差
pub const ALIGN_EPSILON: f64 = 1e-5;

fn sort_key(element: &LayoutElement) -> f64 {
    if element.component {
        f64::MAX
    } else {
        element.rect.y
    }
}

/// 返回 `layout` 字段的内容
pub fn infer_vertical_layout(group: &LayoutRect, children: &[LayoutElement]) -> Map<String, Value> {
    let mut sorted: Vec<&LayoutElement> = children.iter().collect();
    sorted.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
    let items: Vec<&LayoutElement> = sorted.into_iter().filter(|e| !e.component).collect();

    let mut layout = Map::new();
    layout.insert("method".to_string(), json!("vertical"));

    let mut envelope = BoundsAccumulator::new();
    for item in &items {
        envelope.add(&item.rect.to_rect());
    }
    if let Some(env) = envelope.result() {
        layout.insert(
            "padding".to_string(),
            json!({
                "left": env.left() - group.left(),
                "right": group.right() - env.right(),
                "top": env.top() - group.top(),
                "bottom": group.bottom() - env.bottom(),
            }),
        );
    }

    if let [first, second, ..] = items.as_slice() {
        let (a, b) = (&first.rect, &second.rect);
        layout.insert("spacing".to_string(), json!(b.top() - a.bottom()));
        let alignment = if (a.left() - b.left()).abs() < ALIGN_EPSILON {
            "left"
        } else if (a.right() - b.right()).abs() < ALIGN_EPSILON {
            "right"
        } else {
            "center"
        };
        layout.insert("child_alignment".to_string(), json!(alignment));
    }

    if !items.is_empty() && items.iter().all(|e| e.responsive.stretchx == Some(true)) {
        layout.insert("child_force_expand_width".to_string(), json!(true));
    }

    layout
}
