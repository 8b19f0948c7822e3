//! 内存中的设计文档
//! CLI、FFI 与测试使用的 [`SceneGraph`] 实现，从 JSON 加载

use super::{NodeId, NodeKind, RepeatGridInfo, SceneGraph, TextInfo};
use crate::error::SceneError;
use crate::geometry::Rect;
use crate::Color;
use serde::Deserialize;
use std::collections::HashMap;

/// 水平方向的尺寸约束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPin {
    #[default]
    Left,
    Right,
    Center,
    Stretch,
}

/// 垂直方向的尺寸约束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPin {
    #[default]
    Top,
    Bottom,
    Middle,
    Stretch,
}

/// 文档 JSON 中的节点（嵌套结构）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// 逻辑包围盒，文档坐标
    pub bounds: Rect,
    /// 墨迹范围，缺省与 bounds 相同
    #[serde(default)]
    pub draw_bounds: Option<Rect>,
    #[serde(default)]
    pub viewport_height: Option<f64>,
    #[serde(default)]
    pub children: Vec<DesignNode>,
    #[serde(default)]
    pub text: Option<TextInfo>,
    #[serde(default)]
    pub repeat_grid: Option<RepeatGridInfo>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub export: bool,
    #[serde(default)]
    pub pin_x: HorizontalPin,
    #[serde(default)]
    pub pin_y: VerticalPin,
}

impl DesignNode {
    pub fn new(id: &str, name: &str, kind: NodeKind, bounds: Rect) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            bounds,
            draw_bounds: None,
            viewport_height: None,
            children: Vec::new(),
            text: None,
            repeat_grid: None,
            fill: None,
            export: false,
            pin_x: HorizontalPin::default(),
            pin_y: VerticalPin::default(),
        }
    }

    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<DesignNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_draw_bounds(mut self, rect: Rect) -> Self {
        self.draw_bounds = Some(rect);
        self
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn with_text(mut self, text: TextInfo) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_repeat_grid(mut self, grid: RepeatGridInfo) -> Self {
        self.repeat_grid = Some(grid);
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_pins(mut self, pin_x: HorizontalPin, pin_y: VerticalPin) -> Self {
        self.pin_x = pin_x;
        self.pin_y = pin_y;
        self
    }

    pub fn marked(mut self) -> Self {
        self.export = true;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DocumentFile {
    artboards: Vec<DesignNode>,
}

#[derive(Debug, Clone)]
struct NodeData {
    guid: String,
    name: String,
    kind: NodeKind,
    bounds: Rect,
    draw: Rect,
    viewport_height: Option<f64>,
    /// 加载时的几何，恢复到原尺寸时直接取回，不经过浮点增量
    design: (Rect, Rect, Option<f64>),
    text: Option<TextInfo>,
    grid: Option<RepeatGridInfo>,
    fill: Option<Color>,
    export: bool,
    pin_x: HorizontalPin,
    pin_y: VerticalPin,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// 扁平存储的设计文档
#[derive(Debug, Clone, Default)]
pub struct DesignDocument {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl DesignDocument {
    /// 从 `{"artboards": [...]}` 格式的 JSON 加载
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let file: DocumentFile = serde_json::from_str(json)?;
        Self::from_nodes(file.artboards)
    }

    pub fn from_nodes(roots: Vec<DesignNode>) -> Result<Self, SceneError> {
        let mut doc = Self::default();
        for root in roots {
            let id = doc.insert(root, None)?;
            doc.roots.push(id);
        }
        Ok(doc)
    }

    fn insert(&mut self, node: DesignNode, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        if self.index.contains_key(&node.id) {
            return Err(SceneError::DuplicateNode(node.id));
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(node.id.clone(), id);
        let draw = node.draw_bounds.unwrap_or(node.bounds);
        self.nodes.push(NodeData {
            guid: node.id,
            name: node.name,
            kind: node.kind,
            bounds: node.bounds,
            draw,
            viewport_height: node.viewport_height,
            design: (node.bounds, draw, node.viewport_height),
            text: node.text,
            grid: node.repeat_grid,
            fill: node.fill,
            export: node.export,
            pin_x: node.pin_x,
            pin_y: node.pin_y,
            parent,
            children: Vec::new(),
        });
        for child in node.children {
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按 guid 查找
    pub fn find(&self, guid: &str) -> Option<NodeId> {
        self.index.get(guid).copied()
    }

    /// 按显示名查找第一个匹配的节点
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// 把节点移到新的逻辑包围盒，墨迹范围与子节点随之变化
    fn apply_bounds(&mut self, id: NodeId, new: Rect) {
        if new == self.nodes[id.0].design.0 {
            self.restore_design(id);
            return;
        }
        let data = &mut self.nodes[id.0];
        let old = data.bounds;
        let dx = new.x - old.x;
        let dy = new.y - old.y;
        let dw = new.width - old.width;
        let dh = new.height - old.height;

        data.bounds = new;
        data.draw = Rect::new(data.draw.x + dx, data.draw.y + dy, data.draw.width + dw, data.draw.height + dh);
        if let Some(height) = data.viewport_height.as_mut() {
            *height += dh;
        }

        let children = data.children.clone();
        for child in children {
            let c = &self.nodes[child.0];
            let mut next = c.bounds;
            match c.pin_x {
                HorizontalPin::Left => next.x += dx,
                HorizontalPin::Right => next.x += new.right() - old.right(),
                HorizontalPin::Center => next.x += new.center_x() - old.center_x(),
                HorizontalPin::Stretch => {
                    next.x += dx;
                    next.width += dw;
                }
            }
            match c.pin_y {
                VerticalPin::Top => next.y += dy,
                VerticalPin::Bottom => next.y += new.bottom() - old.bottom(),
                VerticalPin::Middle => next.y += new.center_y() - old.center_y(),
                VerticalPin::Stretch => {
                    next.y += dy;
                    next.height += dh;
                }
            }
            self.apply_bounds(child, next);
        }
    }

    /// 子树整体回到加载时的几何
    fn restore_design(&mut self, id: NodeId) {
        let data = &mut self.nodes[id.0];
        (data.bounds, data.draw, data.viewport_height) = data.design;
        let children = data.children.clone();
        for child in children {
            self.restore_design(child);
        }
    }
}

impl SceneGraph for DesignDocument {
    fn guid(&self, node: NodeId) -> &str {
        &self.nodes[node.0].guid
    }

    fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.0].kind
    }

    fn draw_bounds(&self, node: NodeId) -> Rect {
        self.nodes[node.0].draw
    }

    fn layout_bounds(&self, node: NodeId) -> Rect {
        self.nodes[node.0].bounds
    }

    fn viewport_height(&self, node: NodeId) -> Option<f64> {
        self.nodes[node.0].viewport_height
    }

    fn text(&self, node: NodeId) -> Option<&TextInfo> {
        self.nodes[node.0].text.as_ref()
    }

    fn repeat_grid(&self, node: NodeId) -> Option<&RepeatGridInfo> {
        self.nodes[node.0].grid.as_ref()
    }

    fn fill(&self, node: NodeId) -> Option<Color> {
        self.nodes[node.0].fill
    }

    fn marked_for_export(&self, node: NodeId) -> bool {
        self.nodes[node.0].export
    }

    fn artboards(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.nodes[id.0].kind == NodeKind::Artboard)
            .collect()
    }

    fn resize(&mut self, node: NodeId, width: f64, height: f64) -> Result<(), SceneError> {
        let data = self
            .nodes
            .get(node.0)
            .ok_or_else(|| SceneError::UnknownNode(format!("#{}", node.0)))?;
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(SceneError::ResizeRejected {
                node: data.guid.clone(),
                width,
                height,
            });
        }
        let old = data.bounds;
        self.apply_bounds(node, Rect::new(old.x, old.y, width, height));
        Ok(())
    }
}
