//! 响应式参数推断测试

use super::{artboard, config, document, node};
use crate::directive::{parse_name, Directives};
use crate::error::SceneError;
use crate::geometry::Rect;
use crate::responsive::{infer, parse_fix, Heuristic, ResizeProbe, ResponsiveParameter};
use crate::scene::{
    DesignDocument, HorizontalPin, NodeId, NodeKind, SceneGraph, VerticalPin,
};

fn sample(x: f64, width: f64) -> Rect {
    Rect::new(x, 0.0, width, 10.0)
}

fn horizontal(before: Rect, after: Rect, dw: f64) -> Heuristic {
    Heuristic::measure(&before, &after, dw, 0.0, &Directives::new())
}

#[test]
fn test_unmoved_node_is_left() {
    let h = horizontal(sample(10.0, 50.0), sample(10.0, 50.0), 100.0);
    assert_eq!(h.horizontal, Some("left"));
    assert_eq!(h.vertical, Some("top"));
    assert!(!h.stretchx);
}

#[test]
fn test_center_threshold() {
    assert_eq!(horizontal(sample(0.0, 50.0), sample(70.0, 50.0), 100.0).horizontal, Some("right"));
    assert_eq!(horizontal(sample(0.0, 50.0), sample(50.0, 50.0), 100.0).horizontal, Some("center"));
    // 恰好 0.6 倍仍算居中
    assert_eq!(horizontal(sample(0.0, 50.0), sample(60.0, 50.0), 100.0).horizontal, Some("center"));
    assert_eq!(horizontal(sample(0.0, 50.0), sample(-10.0, 50.0), 100.0).horizontal, Some("right"));
}

#[test]
fn test_vertical_labels() {
    let before = Rect::new(0.0, 0.0, 10.0, 10.0);
    let h = Heuristic::measure(&before, &Rect::new(0.0, 30.0, 10.0, 10.0), 0.0, 100.0, &Directives::new());
    assert_eq!(h.vertical, Some("middle"));
    let h = Heuristic::measure(&before, &Rect::new(0.0, 100.0, 10.0, 10.0), 0.0, 100.0, &Directives::new());
    assert_eq!(h.vertical, Some("bottom"));
}

#[test]
fn test_stretch_threshold() {
    let h = horizontal(sample(0.0, 100.0), sample(0.0, 100.02), 100.0);
    assert!(h.stretchx);
    assert_eq!(h.horizontal, None, "stretch and anchor are exclusive on an axis");

    let h = horizontal(sample(0.0, 100.0), sample(0.0, 100.005), 100.0);
    assert!(!h.stretchx);
    assert_eq!(h.horizontal, Some("left"));
}

#[test]
fn test_explicit_stretch_disables_heuristic() {
    let directives = parse_name("Bar@stretchx=false", false).directives;
    let h = Heuristic::measure(&sample(0.0, 100.0), &sample(0.0, 200.0), 100.0, 0.0, &directives);
    assert!(!h.stretchx);

    let parameter = ResponsiveParameter::resolve(Some(&h), &directives);
    assert_eq!(parameter.stretchx, Some(false));
    assert_eq!(parameter.pivot.as_deref(), Some("topleft"));
}

#[test]
fn test_resolve_composes_pivot() {
    let h = Heuristic {
        horizontal: Some("right"),
        vertical: Some("bottom"),
        stretchx: false,
        stretchy: false,
    };
    let parameter = ResponsiveParameter::resolve(Some(&h), &Directives::new());
    assert_eq!(parameter.pivot.as_deref(), Some("bottomright"));
    assert_eq!(parameter.stretchx, None);

    let h = Heuristic {
        horizontal: None,
        vertical: Some("top"),
        stretchx: true,
        stretchy: false,
    };
    let parameter = ResponsiveParameter::resolve(Some(&h), &Directives::new());
    assert_eq!(parameter.pivot.as_deref(), Some("top"));
    assert_eq!(parameter.stretchx, Some(true));
    assert_eq!(parameter.stretchy, None);

    let h = Heuristic { horizontal: None, vertical: None, stretchx: true, stretchy: true };
    let parameter = ResponsiveParameter::resolve(Some(&h), &Directives::new());
    assert_eq!(parameter.pivot, None);
}

#[test]
fn test_directive_overrides() {
    let h = Heuristic {
        horizontal: Some("left"),
        vertical: Some("top"),
        stretchx: false,
        stretchy: false,
    };
    let resolve = |name: &str| ResponsiveParameter::resolve(Some(&h), &parse_name(name, false).directives);

    assert_eq!(resolve("A@pivot=center").pivot.as_deref(), Some("center"));

    let p = resolve("A@stretchxy=true");
    assert_eq!((p.stretchx, p.stretchy), (Some(true), Some(true)));
    assert_eq!(p.pivot, None);

    let p = resolve("A@stretchwh=true");
    assert_eq!((p.stretchx, p.stretchy), (Some(true), Some(true)));

    let p = resolve("A@stretchy=true");
    assert_eq!(p.stretchy, Some(true));
    assert_eq!(p.pivot.as_deref(), Some("left"));
}

/// stretchh 写入水平方向（既有行为）
#[test]
fn test_stretchh_writes_horizontal_slot() {
    let parameter = ResponsiveParameter::resolve(None, &parse_name("A@stretchh=true", false).directives);
    assert_eq!(parameter.stretchx, Some(true));
    assert_eq!(parameter.stretchy, None);

    let parameter = ResponsiveParameter::resolve(None, &parse_name("A@stretchw=true", false).directives);
    assert_eq!(parameter.stretchx, Some(true));
    assert_eq!(parameter.stretchy, None);
}

#[test]
fn test_fix_grammar() {
    let fix = parse_fix("w");
    assert!(!fix.stretchx);
    assert!(fix.stretchy);
    assert_eq!(fix.pivot, None);

    let fix = parse_fix("wh");
    assert!(!fix.stretchx && !fix.stretchy);

    let fix = parse_fix("width,top");
    assert!(!fix.stretchx);
    assert!(fix.stretchy);
    assert_eq!(fix.pivot.as_deref(), Some("top"));

    let fix = parse_fix("lr");
    assert!(fix.stretchx);
    assert_eq!(fix.pivot, None);

    let fix = parse_fix("t b l");
    assert!(fix.stretchy);
    assert_eq!(fix.pivot.as_deref(), Some("left"));

    let fix = parse_fix("tl");
    assert_eq!(fix.pivot.as_deref(), Some("topleft"));
}

#[test]
fn test_fix_directive_overrides_heuristic() {
    let h = Heuristic { horizontal: None, vertical: None, stretchx: true, stretchy: true };
    let directives = parse_name("A@fix=w+b", false).directives;
    let parameter = ResponsiveParameter::resolve(Some(&h), &directives);
    assert_eq!(parameter.stretchx, Some(false));
    assert_eq!(parameter.stretchy, Some(true));
    assert_eq!(parameter.pivot.as_deref(), Some("bottom"));
}

fn pinned_screen() -> DesignDocument {
    document(vec![artboard("Screen", 400.0, 300.0).with_children(vec![
        node("Logo", NodeKind::Rectangle, 10.0, 10.0, 50.0, 50.0),
        node("Close", NodeKind::Rectangle, 340.0, 10.0, 50.0, 50.0)
            .with_pins(HorizontalPin::Right, VerticalPin::Top),
        node("Header", NodeKind::Rectangle, 0.0, 0.0, 400.0, 60.0)
            .with_pins(HorizontalPin::Stretch, VerticalPin::Top),
        node("Dialog", NodeKind::Group, 100.0, 100.0, 200.0, 100.0)
            .with_pins(HorizontalPin::Center, VerticalPin::Middle),
        node("Footer", NodeKind::Rectangle, 0.0, 260.0, 400.0, 40.0)
            .with_pins(HorizontalPin::Stretch, VerticalPin::Bottom),
    ])])
}

#[test]
fn test_infer_pins() {
    let mut doc = pinned_screen();
    let screen = doc.find("Screen").unwrap();
    let map = infer(&mut doc, screen, &config()).unwrap();
    assert_eq!(map.len(), 6);

    let pivot = |name: &str| map.parameter(doc.find(name).unwrap()).unwrap().clone();

    assert_eq!(pivot("Logo").pivot.as_deref(), Some("topleft"));
    assert_eq!(pivot("Close").pivot.as_deref(), Some("topright"));
    assert_eq!(pivot("Dialog").pivot.as_deref(), Some("middlecenter"));

    let header = pivot("Header");
    assert_eq!(header.pivot.as_deref(), Some("top"));
    assert_eq!(header.stretchx, Some(true));

    let footer = pivot("Footer");
    assert_eq!(footer.pivot.as_deref(), Some("bottom"));
    assert_eq!(footer.stretchx, Some(true));

    // 根节点没有父节点增量，不做推断
    assert!(pivot("Screen").is_empty());
}

#[test]
fn test_infer_restores_document() {
    let mut doc = pinned_screen();
    let screen = doc.find("Screen").unwrap();
    let before: Vec<Rect> = doc.descendants(screen).iter().map(|n| doc.layout_bounds(*n)).collect();

    let map = infer(&mut doc, screen, &config()).unwrap();
    assert!(map.is_consistent());

    let after: Vec<Rect> = doc.descendants(screen).iter().map(|n| doc.layout_bounds(*n)).collect();
    assert_eq!(before, after);

    let record = map.get(doc.find("Close").unwrap()).unwrap();
    assert_eq!(record.before, record.restore);
    assert_eq!(record.after.x, record.before.x + 100.0);
}

#[test]
fn test_infer_uses_parent_delta() {
    // Panel 跟随画板拉伸，Badge 靠 Panel 右侧
    let mut doc = document(vec![artboard("Screen", 400.0, 300.0).with_child(
        node("Panel", NodeKind::Group, 0.0, 0.0, 200.0, 300.0)
            .with_pins(HorizontalPin::Stretch, VerticalPin::Top)
            .with_child(
                node("Badge", NodeKind::Rectangle, 150.0, 0.0, 50.0, 50.0)
                    .with_pins(HorizontalPin::Right, VerticalPin::Top),
            ),
    )]);
    let screen = doc.find("Screen").unwrap();
    let map = infer(&mut doc, screen, &config().with_scale(2.0)).unwrap();

    let badge = map.get(doc.find("Badge").unwrap()).unwrap();
    assert_eq!(badge.after.x - badge.before.x, 200.0, "delta is in scaled units");
    assert_eq!(badge.parameter.pivot.as_deref(), Some("topright"));
}

#[test]
fn test_probe_drop_restores_size() {
    let mut doc = pinned_screen();
    let screen = doc.find("Screen").unwrap();
    {
        let mut probe = ResizeProbe::begin(&mut doc, screen);
        probe.grow(100.0, 100.0).unwrap();
        assert_eq!(probe.scene().layout_bounds(screen).width, 500.0);
    }
    assert_eq!(doc.layout_bounds(screen), Rect::new(0.0, 0.0, 400.0, 300.0));
    assert_eq!(doc.layout_bounds(doc.find("Close").unwrap()).x, 340.0);
}

#[derive(Clone, Copy, PartialEq)]
enum Fault {
    /// 恢复时宽度多 1
    Drift,
    /// 拒绝放大
    RejectGrow,
}

/// 模拟行为异常的宿主
struct FaultyScene {
    doc: DesignDocument,
    fault: Fault,
    calls: usize,
}

impl SceneGraph for FaultyScene {
    fn guid(&self, node: NodeId) -> &str { self.doc.guid(node) }
    fn name(&self, node: NodeId) -> &str { self.doc.name(node) }
    fn parent(&self, node: NodeId) -> Option<NodeId> { self.doc.parent(node) }
    fn children(&self, node: NodeId) -> &[NodeId] { self.doc.children(node) }
    fn kind(&self, node: NodeId) -> NodeKind { self.doc.kind(node) }
    fn draw_bounds(&self, node: NodeId) -> Rect { self.doc.draw_bounds(node) }
    fn layout_bounds(&self, node: NodeId) -> Rect { self.doc.layout_bounds(node) }
    fn artboards(&self) -> Vec<NodeId> { self.doc.artboards() }

    fn resize(&mut self, node: NodeId, width: f64, height: f64) -> Result<(), SceneError> {
        self.calls += 1;
        match (self.fault, self.calls) {
            (Fault::Drift, 2) => self.doc.resize(node, width + 1.0, height),
            (Fault::RejectGrow, 1) => Err(SceneError::ResizeRejected {
                node: self.doc.guid(node).to_string(),
                width,
                height,
            }),
            _ => self.doc.resize(node, width, height),
        }
    }
}

#[test]
fn test_drift_is_reported() {
    let doc = pinned_screen();
    let screen = doc.find("Screen").unwrap();
    let mut scene = FaultyScene { doc, fault: Fault::Drift, calls: 0 };

    let map = infer(&mut scene, screen, &config()).unwrap();
    assert!(!map.is_consistent());

    let drifted: Vec<&str> = map.drift().iter().map(|d| d.guid.as_str()).collect();
    assert!(drifted.contains(&"Screen"));
    assert!(drifted.contains(&"Close"), "right-pinned children move with the residual width");
    assert!(!drifted.contains(&"Logo"));
}

#[test]
fn test_rejected_probe_leaves_document_untouched() {
    let doc = pinned_screen();
    let screen = doc.find("Screen").unwrap();
    let mut scene = FaultyScene { doc, fault: Fault::RejectGrow, calls: 0 };

    let result = infer(&mut scene, screen, &config());
    assert!(matches!(result, Err(SceneError::ResizeRejected { .. })));
    assert_eq!(scene.layout_bounds(screen), Rect::new(0.0, 0.0, 400.0, 300.0));
}

#[test]
fn test_fractional_document_restored_exactly() {
    let mut doc = document(vec![artboard("Screen", 375.3, 667.1).with_child(
        node("Close", NodeKind::Rectangle, 330.7, 12.3, 30.1, 30.1)
            .with_pins(HorizontalPin::Right, VerticalPin::Bottom),
    )]);
    let screen = doc.find("Screen").unwrap();
    let close = doc.find("Close").unwrap();

    let map = infer(&mut doc, screen, &config()).unwrap();
    assert!(map.is_consistent(), "{:?}", map.drift());
    assert_eq!(doc.layout_bounds(close), Rect::new(330.7, 12.3, 30.1, 30.1));
    assert_eq!(doc.layout_bounds(screen), Rect::new(0.0, 0.0, 375.3, 667.1));

    let output = super::compile(&mut doc, &config());
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
}
