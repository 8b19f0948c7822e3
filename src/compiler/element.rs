//! 输出布局树的节点

use crate::geometry::LayoutRect;
use crate::responsive::ResponsiveParameter;
use serde::Serialize;
use serde_json::{Map, Value};

/// 输出元素类型（`type` 字段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementKind {
    Image,
    Text,
    TextMeshPro,
    Input,
    Group,
    Button,
    Slider,
    Toggle,
    List,
    Scroller,
    Viewport,
}

impl ElementKind {
    /// 带 `elements` 数组的类型
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            ElementKind::Group
                | ElementKind::Button
                | ElementKind::Slider
                | ElementKind::Toggle
                | ElementKind::List
                | ElementKind::Scroller
                | ElementKind::Viewport
        )
    }
}

/// 布局树节点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    #[serde(flatten)]
    pub rect: LayoutRect,
    #[serde(flatten)]
    pub responsive: ResponsiveParameter,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub component: bool,
    /// 各类型特有的字段
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<LayoutElement>>,
}

impl LayoutElement {
    pub fn new(kind: ElementKind, name: &str, rect: LayoutRect) -> Self {
        Self {
            kind,
            name: name.to_string(),
            rect,
            responsive: ResponsiveParameter::default(),
            component: false,
            fields: Map::new(),
            elements: kind.is_group().then(Vec::new),
        }
    }

    pub fn with_responsive(mut self, responsive: ResponsiveParameter) -> Self {
        self.responsive = responsive;
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_elements(mut self, elements: Vec<LayoutElement>) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_component(mut self, component: bool) -> Self {
        self.component = component;
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn children(&self) -> &[LayoutElement] {
        self.elements.as_deref().unwrap_or_default()
    }

    /// 按名称查找直接子元素
    pub fn find_child(&self, name: &str) -> Option<&LayoutElement> {
        self.children().iter().find(|e| e.name == name)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
