//! 图层名指令解析
//!
//! 图层名格式：`[#][*][+]语义名[/]@key=value@flag...`
//! - `#` 注释掉（不导出），`*` 强制栅格化为图片，`+` 标记为组件
//! - 结尾 `/` 表示子 Prefab 边界
//! - key 转小写并去掉 `-` `_`，value 去空白并转小写；没有 `=` 的指令值为 `true`
//!
//! 只有这个模块读取原始图层名，其余阶段只看 [`Directives`]。

use crate::scene::{NodeId, NodeKind, SceneGraph};
use std::collections::HashMap;

/// 指令键（封闭集合，未知键保留在 `Other` 中）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirectiveKey {
    Comment,
    Image,
    Component,
    SubPrefab,
    Button,
    Slider,
    Scrollbar,
    Text,
    TextMp,
    Toggle,
    List,
    Input,
    Scroller,
    Viewport,
    Pivot,
    StretchX,
    StretchY,
    StretchXY,
    StretchW,
    StretchH,
    StretchWH,
    Fix,
    CanvasGroup,
    VerticalFit,
    PreferredHeight,
    VGroup,
    PreserveAspect,
    Slice,
    Other(String),
}

impl DirectiveKey {
    /// 由已规范化的键名得到指令键
    pub fn from_normalized(key: &str) -> DirectiveKey {
        match key {
            "comment" => DirectiveKey::Comment,
            "image" | "rasterize" => DirectiveKey::Image,
            "component" => DirectiveKey::Component,
            "subprefab" => DirectiveKey::SubPrefab,
            "button" => DirectiveKey::Button,
            "slider" => DirectiveKey::Slider,
            "scrollbar" => DirectiveKey::Scrollbar,
            "text" => DirectiveKey::Text,
            "textmp" => DirectiveKey::TextMp,
            "toggle" => DirectiveKey::Toggle,
            "list" => DirectiveKey::List,
            "input" => DirectiveKey::Input,
            "scroller" => DirectiveKey::Scroller,
            "viewport" => DirectiveKey::Viewport,
            "pivot" => DirectiveKey::Pivot,
            "stretchx" => DirectiveKey::StretchX,
            "stretchy" => DirectiveKey::StretchY,
            "stretchxy" => DirectiveKey::StretchXY,
            "stretchw" => DirectiveKey::StretchW,
            "stretchh" => DirectiveKey::StretchH,
            "stretchwh" => DirectiveKey::StretchWH,
            "fix" => DirectiveKey::Fix,
            "canvasgroup" => DirectiveKey::CanvasGroup,
            "verticalfit" => DirectiveKey::VerticalFit,
            "preferredheight" => DirectiveKey::PreferredHeight,
            "vgroup" | "verticalgroup" => DirectiveKey::VGroup,
            "preserveaspect" => DirectiveKey::PreserveAspect,
            "slice" => DirectiveKey::Slice,
            other => DirectiveKey::Other(other.to_string()),
        }
    }
}

/// 规范化键名：小写，去掉 `-` 和 `_`
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 指令值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    /// 没有 `=`
    Flag,
    Text(String),
}

impl DirectiveValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DirectiveValue::Flag => None,
            DirectiveValue::Text(s) => Some(s),
        }
    }

    /// `Flag` 与 true/yes/1/on 为真
    pub fn as_bool(&self) -> bool {
        match self {
            DirectiveValue::Flag => true,
            DirectiveValue::Text(s) => matches!(s.as_str(), "true" | "yes" | "1" | "on"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: DirectiveValue,
    implicit: bool,
}

/// 一个节点的指令集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: HashMap<DirectiveKey, Entry>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显式指令，重复的键以后出现的为准
    pub fn insert(&mut self, key: DirectiveKey, value: DirectiveValue) {
        self.entries.insert(key, Entry { value, implicit: false });
    }

    /// 由名称后缀推断的指令，不覆盖已有的同名指令
    pub fn insert_implicit(&mut self, key: DirectiveKey) {
        self.entries.entry(key).or_insert(Entry {
            value: DirectiveValue::Flag,
            implicit: true,
        });
    }

    pub fn has(&self, key: &DirectiveKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_explicit(&self, key: &DirectiveKey) -> bool {
        self.entries.get(key).is_some_and(|e| !e.implicit)
    }

    pub fn get(&self, key: &DirectiveKey) -> Option<&DirectiveValue> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn text(&self, key: &DirectiveKey) -> Option<&str> {
        self.get(key).and_then(DirectiveValue::as_str)
    }

    pub fn flag(&self, key: &DirectiveKey) -> Option<bool> {
        self.get(key).map(DirectiveValue::as_bool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_comment(&self) -> bool { self.has(&DirectiveKey::Comment) }
    pub fn is_image(&self) -> bool { self.has(&DirectiveKey::Image) }
    pub fn is_component(&self) -> bool { self.has(&DirectiveKey::Component) }
    pub fn is_sub_prefab(&self) -> bool { self.has(&DirectiveKey::SubPrefab) }
    pub fn is_button(&self) -> bool { self.has(&DirectiveKey::Button) }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub directives: Directives,
}

/// 名称后缀 -> 隐式指令
const SUFFIX_DIRECTIVES: &[(&str, DirectiveKey)] = &[
    ("image", DirectiveKey::Image),
    ("button", DirectiveKey::Button),
    ("slider", DirectiveKey::Slider),
    ("scrollbar", DirectiveKey::Scrollbar),
    ("text", DirectiveKey::Text),
    ("toggle", DirectiveKey::Toggle),
    ("list", DirectiveKey::List),
];

/// 仅扩展模式启用的后缀
const EXTENDED_SUFFIX_DIRECTIVES: &[(&str, DirectiveKey)] = &[
    ("input", DirectiveKey::Input),
    ("scroller", DirectiveKey::Scroller),
    ("viewport", DirectiveKey::Viewport),
];

/// 解析原始图层名
pub fn parse_name(raw: &str, extended: bool) -> ParsedName {
    let mut segments = raw.split('@');
    let mut name = segments.next().unwrap_or_default().trim().to_string();
    let mut directives = Directives::new();

    if let Some(rest) = name.strip_prefix('#') {
        directives.insert(DirectiveKey::Comment, DirectiveValue::Flag);
        name = rest.to_string();
    }
    if let Some(rest) = name.strip_prefix('*') {
        directives.insert(DirectiveKey::Image, DirectiveValue::Flag);
        name = rest.to_string();
    }
    if let Some(rest) = name.strip_prefix('+') {
        directives.insert(DirectiveKey::Component, DirectiveValue::Flag);
        name = rest.to_string();
    }
    if let Some(rest) = name.strip_suffix('/') {
        directives.insert(DirectiveKey::SubPrefab, DirectiveValue::Flag);
        name = rest.to_string();
    }
    // 设计稿里常见的 `Icon*` 写法
    if let Some(rest) = name.strip_suffix('*') {
        directives.insert(DirectiveKey::Image, DirectiveValue::Flag);
        name = rest.to_string();
    }
    let name = name.trim().to_string();

    for segment in segments {
        let (key, value) = match segment.split_once('=') {
            Some((k, v)) => (k, DirectiveValue::Text(v.trim().to_lowercase())),
            None => (segment, DirectiveValue::Flag),
        };
        let key = normalize_key(key);
        if key.is_empty() {
            continue;
        }
        directives.insert(DirectiveKey::from_normalized(&key), value);
    }

    let mut parsed = ParsedName { name, directives };
    apply_suffix_directives(&mut parsed, extended);
    parsed
}

/// 解析场景节点的名称
///
/// Repeat Grid 的直接子节点一律改名为 `item{序号}`，避免自动生成的实例名误触发后缀指令。
pub fn parse_node<S: SceneGraph + ?Sized>(scene: &S, node: NodeId, extended: bool) -> ParsedName {
    let mut parsed = parse_name(scene.name(node), extended);
    let in_grid = scene
        .parent(node)
        .is_some_and(|p| scene.kind(p) == NodeKind::RepeatGrid);
    if in_grid {
        let index = scene.child_index(node).unwrap_or(0);
        parsed.name = format!("item{}", index);
        // 只保留显式指令，重新按新名字推断
        parsed.directives.entries.retain(|_, e| !e.implicit);
        apply_suffix_directives(&mut parsed, extended);
    }
    parsed
}

fn apply_suffix_directives(parsed: &mut ParsedName, extended: bool) {
    let extra: &[(&str, DirectiveKey)] = if extended { EXTENDED_SUFFIX_DIRECTIVES } else { &[] };
    for (suffix, key) in SUFFIX_DIRECTIVES.iter().chain(extra) {
        if has_word_suffix(&parsed.name, suffix) {
            parsed.directives.insert_implicit(key.clone());
        }
    }
}

/// 名称以 `suffix` 这个词结尾（不区分大小写）
///
/// 整个名称相同，或前面是 `_`、`-`、空格，或后缀从大写字母开始（`PlayButton`）。
/// `Playlist` 不算 `List`。
fn has_word_suffix(name: &str, suffix: &str) -> bool {
    if name.len() < suffix.len() {
        return false;
    }
    let start = name.len() - suffix.len();
    let Some(tail) = name.get(start..) else {
        return false;
    };
    if !tail.eq_ignore_ascii_case(suffix) {
        return false;
    }
    if start == 0 {
        return true;
    }
    let delimited = name[..start].ends_with(['_', '-', ' ']);
    let camel = tail.starts_with(|c: char| c.is_ascii_uppercase());
    delimited || camel
}
