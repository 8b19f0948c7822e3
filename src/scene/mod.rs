//! 设计场景图
//! 宿主设计工具的节点树只通过 [`SceneGraph`] 访问，编译器除了响应式探测的两次 resize 外不修改它

mod document;

pub use document::{DesignDocument, DesignNode, HorizontalPin, VerticalPin};

use crate::error::SceneError;
use crate::geometry::Rect;
use crate::Color;
use serde::Deserialize;

/// 节点句柄，在一次导出期间稳定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 宿主节点的原生类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NodeKind {
    Artboard,
    Group,
    RepeatGrid,
    SymbolInstance,
    BooleanGroup,
    Line,
    Ellipse,
    Rectangle,
    Path,
    Text,
}

impl NodeKind {
    /// 矢量图元，没有对应的原生控件
    pub fn is_shape(&self) -> bool {
        matches!(self, NodeKind::Line | NodeKind::Ellipse | NodeKind::Rectangle | NodeKind::Path)
    }
}

/// 文本对齐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// 文本节点属性
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInfo {
    pub content: String,
    pub font_family: String,
    #[serde(default = "default_font_style")]
    pub font_style: String,
    pub font_size: f64,
    #[serde(default)]
    pub fill: Color,
    #[serde(default)]
    pub align: TextAlign,
    /// 区域文本（固定框）而非点文本
    #[serde(default)]
    pub area_box: bool,
}

fn default_font_style() -> String { "Regular".to_string() }

/// Repeat Grid 属性（文档单位，未缩放）
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGridInfo {
    pub cell_width: f64,
    pub cell_height: f64,
    pub columns: usize,
    pub rows: usize,
    /// 单元格之间的水平间隔
    #[serde(default)]
    pub padding_x: f64,
    /// 单元格之间的垂直间隔
    #[serde(default)]
    pub padding_y: f64,
}

/// 场景图访问接口
///
/// 子节点按图层面板顺序排列：最上层在前。
pub trait SceneGraph {
    fn guid(&self, node: NodeId) -> &str;
    fn name(&self, node: NodeId) -> &str;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> &[NodeId];
    fn kind(&self, node: NodeId) -> NodeKind;

    /// 可见墨迹范围，文档坐标
    fn draw_bounds(&self, node: NodeId) -> Rect;
    /// 逻辑包围盒，文档坐标
    fn layout_bounds(&self, node: NodeId) -> Rect;
    /// 可滚动视口高度
    fn viewport_height(&self, node: NodeId) -> Option<f64> {
        let _ = node;
        None
    }

    fn text(&self, node: NodeId) -> Option<&TextInfo> {
        let _ = node;
        None
    }

    fn repeat_grid(&self, node: NodeId) -> Option<&RepeatGridInfo> {
        let _ = node;
        None
    }

    fn fill(&self, node: NodeId) -> Option<Color> {
        let _ = node;
        None
    }

    fn marked_for_export(&self, node: NodeId) -> bool {
        let _ = node;
        false
    }

    /// 顶层画板
    fn artboards(&self) -> Vec<NodeId>;

    /// 改变节点尺寸（左上角不动），子节点按宿主的约束规则跟随
    fn resize(&mut self, node: NodeId, width: f64, height: f64) -> Result<(), SceneError>;

    /// 在 `parent` 的子节点中的位置
    fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|c| *c == node)
    }

    /// 向上查找最近的画板（包含自身）
    fn enclosing_artboard(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.kind(n) == NodeKind::Artboard {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// 深度优先前序遍历
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            for child in self.children(n).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }
}
