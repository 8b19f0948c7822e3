//! 几何图形模块
//! 坐标空间换算：原生包围盒 -> 缩放后的全局坐标 -> 相对基准中心的坐标

use crate::scene::{NodeId, SceneGraph};
use serde::{Deserialize, Serialize};

/// 矩形（左上角 + 尺寸）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 { self.x }
    pub fn top(&self) -> f64 { self.y }
    pub fn right(&self) -> f64 { self.x + self.width }
    pub fn bottom(&self) -> f64 { self.y + self.height }

    pub fn center_x(&self) -> f64 { self.x + self.width / 2.0 }
    pub fn center_y(&self) -> f64 { self.y + self.height / 2.0 }

    /// 各分量乘以输出缩放系数
    pub fn scaled(&self, scale: f64) -> Rect {
        Rect {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    /// 以 base 的中心为原点重新表达左上角，宽高不变
    pub fn to_center_relative(&self, base: &Rect) -> Rect {
        Rect {
            x: self.x - base.center_x(),
            y: self.y - base.center_y(),
            width: self.width,
            height: self.height,
        }
    }

    /// 半开区间相交测试
    ///
    /// 每个轴按 `[s, e)` 判断：`A.s >= B.s` 时要求 `A.s < B.e`，否则要求 `A.e > B.s`。
    /// 相邻（共享边）的两个矩形不算相交。
    pub fn intersects(&self, other: &Rect) -> bool {
        overlap(self.left(), self.right(), other.left(), other.right())
            && overlap(self.top(), self.bottom(), other.top(), other.bottom())
    }
}

fn overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    if a_start >= b_start {
        a_start < b_end
    } else {
        a_end > b_start
    }
}

/// 输出文档中使用的 `{x, y, w, h}`，x/y 为元素中心
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LayoutRect {
    /// 由相对基准中心的左上角矩形得到中心坐标表示
    pub fn from_center_relative(rect: &Rect) -> Self {
        Self {
            x: rect.x + rect.width / 2.0,
            y: rect.y + rect.height / 2.0,
            w: rect.width,
            h: rect.height,
        }
    }

    pub fn left(&self) -> f64 { self.x - self.w / 2.0 }
    pub fn right(&self) -> f64 { self.x + self.w / 2.0 }
    pub fn top(&self) -> f64 { self.y - self.h / 2.0 }
    pub fn bottom(&self) -> f64 { self.y + self.h / 2.0 }

    /// 转回左上角表示
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.w, self.h)
    }
}

/// 包围盒累加器
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsAccumulator {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    count: usize,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rect: &Rect) {
        if self.count == 0 {
            self.min_x = rect.left();
            self.min_y = rect.top();
            self.max_x = rect.right();
            self.max_y = rect.bottom();
        } else {
            self.min_x = self.min_x.min(rect.left());
            self.min_y = self.min_y.min(rect.top());
            self.max_x = self.max_x.max(rect.right());
            self.max_y = self.max_y.max(rect.bottom());
        }
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// 包含所有已添加矩形的最小矩形，未添加任何矩形时为 None
    pub fn result(&self) -> Option<Rect> {
        if self.count == 0 {
            return None;
        }
        Some(Rect::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        ))
    }
}

/// 节点可见墨迹范围（全局坐标，已缩放）
pub fn draw_bounds<S: SceneGraph + ?Sized>(scene: &S, node: NodeId, scale: f64) -> Rect {
    scene.draw_bounds(node).scaled(scale)
}

/// 节点逻辑包围盒（全局坐标，已缩放）
///
/// 可滚动视口（如 Repeat Grid）的视口高度优先于包围盒高度。
pub fn layout_bounds<S: SceneGraph + ?Sized>(scene: &S, node: NodeId, scale: f64) -> Rect {
    let mut rect = scene.layout_bounds(node);
    if let Some(height) = scene.viewport_height(node) {
        rect.height = height;
    }
    rect.scaled(scale)
}
