//! 响应式参数推断
//!
//! 画板临时放大 [`PROBE_DELTA`]，比较每个节点放大前后的包围盒，推断锚点（pivot）和拉伸（stretch），
//! 再恢复原尺寸并校验所有节点是否回到原位。图层名上的显式指令优先于推断结果。

use crate::config::ExportConfig;
use crate::directive::{parse_node, DirectiveKey, Directives};
use crate::error::SceneError;
use crate::geometry::{layout_bounds, Rect};
use crate::scene::{NodeId, SceneGraph};
use serde::Serialize;
use std::collections::HashMap;

/// 探测时画板宽高的增量（文档单位，缩放前）
pub const PROBE_DELTA: f64 = 100.0;
/// 位移不超过父节点增量的该比例时视为居中
const CENTER_RATIO: f64 = 0.6;
/// 尺寸增长超过该比例时视为拉伸
const STRETCH_RATIO: f64 = 1.0001;

/// 节点的锚点与拉伸参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponsiveParameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretchx: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretchy: Option<bool>,
}

/// 由尺寸探测推断出的原始结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heuristic {
    pub horizontal: Option<&'static str>,
    pub vertical: Option<&'static str>,
    pub stretchx: bool,
    pub stretchy: bool,
}

impl Heuristic {
    /// `dw`/`dh` 是父节点经历的尺寸变化
    pub fn measure(before: &Rect, after: &Rect, dw: f64, dh: f64, directives: &Directives) -> Self {
        let mut horizontal = Some(anchor(before.x, after.x, dw, ["left", "center", "right"]));
        let mut vertical = Some(anchor(before.y, after.y, dh, ["top", "middle", "bottom"]));
        let mut stretchx = false;
        let mut stretchy = false;

        if !has_explicit_stretch_x(directives) && before.width * STRETCH_RATIO < after.width {
            stretchx = true;
            horizontal = None;
        }
        if !has_explicit_stretch_y(directives) && before.height * STRETCH_RATIO < after.height {
            stretchy = true;
            vertical = None;
        }

        Self { horizontal, vertical, stretchx, stretchy }
    }
}

fn anchor(before: f64, after: f64, delta: f64, labels: [&'static str; 3]) -> &'static str {
    if before == after {
        return labels[0];
    }
    let moved = after - before;
    if moved > 0.0 && moved <= CENTER_RATIO * delta {
        labels[1]
    } else {
        labels[2]
    }
}

fn has_explicit_stretch_x(directives: &Directives) -> bool {
    [
        DirectiveKey::StretchX,
        DirectiveKey::StretchXY,
        DirectiveKey::StretchW,
        DirectiveKey::StretchH,
        DirectiveKey::StretchWH,
        DirectiveKey::Fix,
    ]
    .iter()
    .any(|k| directives.has(k))
}

fn has_explicit_stretch_y(directives: &Directives) -> bool {
    [
        DirectiveKey::StretchY,
        DirectiveKey::StretchXY,
        DirectiveKey::StretchWH,
        DirectiveKey::Fix,
    ]
    .iter()
    .any(|k| directives.has(k))
}

/// `fix=` 指令展开后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSpec {
    pub stretchx: bool,
    pub stretchy: bool,
    pub pivot: Option<String>,
}

/// 解析 `fix=` 的值
///
/// 缩写 `w/h/t/b/l/r` 展开为 `width/height/top/bottom/left/right`。
/// 固定 width 则不水平拉伸，否则水平拉伸；同时固定 left 和 right 也会水平拉伸。垂直方向同理。
/// 去掉这些词后剩下的文本原样作为 pivot。
pub fn parse_fix(value: &str) -> FixSpec {
    let raw: Vec<&str> = value
        .split(|c: char| c == ',' || c == '+' || c == '|' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let is_abbreviated = raw.len() == 1 && raw[0].chars().all(|c| "whtblr".contains(c));
    let mut tokens: Vec<String> = if is_abbreviated {
        raw[0].chars().map(|c| expand_fix_token(&c.to_string())).collect()
    } else {
        raw.iter().map(|t| expand_fix_token(t)).collect()
    };

    let mut take = |word: &str| -> bool {
        let found = tokens.iter().any(|t| t == word);
        tokens.retain(|t| t != word);
        found
    };

    let mut stretchx = !take("width");
    let mut stretchy = !take("height");

    let has = |tokens: &[String], word: &str| tokens.iter().any(|t| t == word);
    if has(&tokens, "left") && has(&tokens, "right") {
        stretchx = true;
        tokens.retain(|t| t != "left" && t != "right");
    }
    if has(&tokens, "top") && has(&tokens, "bottom") {
        stretchy = true;
        tokens.retain(|t| t != "top" && t != "bottom");
    }

    let pivot = tokens.concat();
    FixSpec {
        stretchx,
        stretchy,
        pivot: if pivot.is_empty() { None } else { Some(pivot) },
    }
}

fn expand_fix_token(token: &str) -> String {
    match token {
        "w" => "width",
        "h" => "height",
        "t" => "top",
        "b" => "bottom",
        "l" => "left",
        "r" => "right",
        other => other,
    }
    .to_string()
}

impl ResponsiveParameter {
    /// 合并推断结果与显式指令（指令优先）
    pub fn resolve(heuristic: Option<&Heuristic>, directives: &Directives) -> Self {
        let (mut horizontal, mut vertical, mut stretchx, mut stretchy) = match heuristic {
            Some(h) => (h.horizontal, h.vertical, h.stretchx.then_some(true), h.stretchy.then_some(true)),
            None => (None, None, None, None),
        };
        let mut pivot: Option<String> = None;

        if let Some(value) = directives.text(&DirectiveKey::Pivot) {
            pivot = Some(value.to_string());
        }
        if let Some(value) = directives.flag(&DirectiveKey::StretchX) {
            stretchx = Some(value);
        }
        if let Some(value) = directives.flag(&DirectiveKey::StretchY) {
            stretchy = Some(value);
        }
        if let Some(value) = directives.flag(&DirectiveKey::StretchXY) {
            stretchx = Some(value);
            stretchy = Some(value);
        }
        // stretchw 与 stretchh 都写入水平方向，沿用既有行为
        if let Some(value) = directives.flag(&DirectiveKey::StretchW) {
            stretchx = Some(value);
        }
        if let Some(value) = directives.flag(&DirectiveKey::StretchH) {
            stretchx = Some(value);
        }
        if let Some(value) = directives.flag(&DirectiveKey::StretchWH) {
            stretchx = Some(value);
            stretchy = Some(value);
        }
        if let Some(value) = directives.get(&DirectiveKey::Fix) {
            let fix = parse_fix(value.as_str().unwrap_or_default());
            stretchx = Some(fix.stretchx);
            stretchy = Some(fix.stretchy);
            if fix.pivot.is_some() {
                pivot = fix.pivot;
            }
        }

        if pivot.is_none() {
            if stretchx == Some(true) {
                horizontal = None;
            }
            if stretchy == Some(true) {
                vertical = None;
            }
            let composed = format!("{}{}", vertical.unwrap_or_default(), horizontal.unwrap_or_default());
            if !composed.is_empty() {
                pivot = Some(composed);
            }
        }

        Self { pivot, stretchx, stretchy }
    }

    pub fn is_empty(&self) -> bool {
        self.pivot.is_none() && self.stretchx.is_none() && self.stretchy.is_none()
    }

    /// pivot 是否包含某个方向词
    pub fn pivot_has(&self, word: &str) -> bool {
        self.pivot.as_deref().is_some_and(|p| p.contains(word))
    }
}

/// 单个节点的探测记录
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsiveRecord {
    pub before: Rect,
    pub after: Rect,
    pub restore: Rect,
    pub parameter: ResponsiveParameter,
}

/// 恢复后位置与探测前不一致的节点
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeDrift {
    pub node: NodeId,
    pub guid: String,
    pub before: Rect,
    pub restore: Rect,
}

/// 一个画板的推断结果
#[derive(Debug, Clone, Default)]
pub struct ResponsiveMap {
    records: HashMap<NodeId, ResponsiveRecord>,
    drift: Vec<ProbeDrift>,
}

impl ResponsiveMap {
    pub fn get(&self, node: NodeId) -> Option<&ResponsiveRecord> {
        self.records.get(&node)
    }

    pub fn parameter(&self, node: NodeId) -> Option<&ResponsiveParameter> {
        self.records.get(&node).map(|r| &r.parameter)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn drift(&self) -> &[ProbeDrift] {
        &self.drift
    }

    pub fn is_consistent(&self) -> bool {
        self.drift.is_empty()
    }

    /// 合并多个画板的结果
    pub fn merge(&mut self, other: ResponsiveMap) {
        self.records.extend(other.records);
        self.drift.extend(other.drift);
    }
}

/// 尺寸探测事务
///
/// 持有场景的可变借用；`restore` 未被调用时在 drop 中恢复原尺寸。
pub struct ResizeProbe<'a, S: SceneGraph + ?Sized> {
    scene: &'a mut S,
    node: NodeId,
    width: f64,
    height: f64,
    restored: bool,
}

impl<'a, S: SceneGraph + ?Sized> ResizeProbe<'a, S> {
    pub fn begin(scene: &'a mut S, node: NodeId) -> Self {
        let original = scene.layout_bounds(node);
        Self {
            scene,
            node,
            width: original.width,
            height: original.height,
            restored: false,
        }
    }

    pub fn grow(&mut self, dw: f64, dh: f64) -> Result<(), SceneError> {
        self.scene.resize(self.node, self.width + dw, self.height + dh)
    }

    pub fn scene(&self) -> &S {
        &*self.scene
    }

    pub fn restore(mut self) -> Result<(), SceneError> {
        self.restored = true;
        self.scene.resize(self.node, self.width, self.height)
    }
}

impl<S: SceneGraph + ?Sized> Drop for ResizeProbe<'_, S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.scene.resize(self.node, self.width, self.height) {
            tracing::error!(error = %e, node = self.scene.guid(self.node), "failed to restore artboard size after probe");
        }
    }
}

fn measure<S: SceneGraph + ?Sized>(scene: &S, nodes: &[NodeId], scale: f64) -> HashMap<NodeId, Rect> {
    nodes.iter().map(|n| (*n, layout_bounds(scene, *n, scale))).collect()
}

/// 对一个画板执行 放大 -> 测量 -> 恢复 的探测并推断每个节点的响应式参数
pub fn infer<S: SceneGraph + ?Sized>(
    scene: &mut S,
    artboard: NodeId,
    config: &ExportConfig,
) -> Result<ResponsiveMap, SceneError> {
    let scale = config.scale;
    let nodes = scene.descendants(artboard);

    let before = measure(scene, &nodes, scale);
    let after = {
        let mut probe = ResizeProbe::begin(&mut *scene, artboard);
        probe.grow(PROBE_DELTA, PROBE_DELTA)?;
        let after = measure(probe.scene(), &nodes, scale);
        probe.restore()?;
        after
    };
    let restore = measure(scene, &nodes, scale);

    let mut map = ResponsiveMap::default();
    for node in &nodes {
        let (Some(b), Some(a), Some(r)) = (before.get(node), after.get(node), restore.get(node)) else {
            continue;
        };
        if b != r {
            tracing::warn!(
                node = scene.guid(*node),
                ?b,
                ?r,
                "node did not return to its original bounds after the resize probe"
            );
            map.drift.push(ProbeDrift {
                node: *node,
                guid: scene.guid(*node).to_string(),
                before: *b,
                restore: *r,
            });
        }

        let directives = parse_node(&*scene, *node, config.extended).directives;
        let parent = scene.parent(*node).filter(|_| *node != artboard);
        let heuristic = parent.and_then(|p| {
            let (pb, pa) = (before.get(&p)?, after.get(&p)?);
            let dw = pa.width - pb.width;
            let dh = pa.height - pb.height;
            Some(Heuristic::measure(b, a, dw, dh, &directives))
        });
        let parameter = ResponsiveParameter::resolve(heuristic.as_ref(), &directives);

        map.records.insert(
            *node,
            ResponsiveRecord {
                before: *b,
                after: *a,
                restore: *r,
                parameter,
            },
        );
    }

    tracing::debug!(artboard = scene.guid(artboard), nodes = map.len(), "responsive inference complete");
    Ok(map)
}
