//! 栅格化请求队列
//! 需要变成位图的节点在这里排队，文件名冲突时追加节点 guid 的前缀

use crate::geometry::Rect;
use crate::scene::NodeId;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// guid 后缀长度
const ID_SUFFIX_LEN: usize = 8;

/// 输出图片格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

/// 一次栅格化请求
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenditionRequest {
    pub file_name: String,
    #[serde(skip)]
    pub node: NodeId,
    pub guid: String,
    /// 相对输出目录的子文件夹
    pub output_target: PathBuf,
    pub format: ImageFormat,
    pub scale: f64,
    /// 节点墨迹范围（已缩放）
    pub bounds: Rect,
}

impl RenditionRequest {
    /// 文件名去掉扩展名，即布局文档中 `image` 字段的值
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(self.format.extension())
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.file_name)
    }
}

/// 栅格化请求队列
#[derive(Debug, Clone, Default)]
pub struct RenditionQueue {
    requests: Vec<RenditionRequest>,
    taken: HashSet<PathBuf>,
}

impl RenditionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 排队一个节点，返回最终的请求（文件名可能已追加后缀）
    ///
    /// `label` 通常是 `{父节点语义名} - {节点语义名}`。
    pub fn push(
        &mut self,
        node: NodeId,
        guid: &str,
        label: &str,
        folder: &str,
        scale: f64,
        bounds: Rect,
    ) -> &RenditionRequest {
        let format = ImageFormat::Png;
        let stem = sanitize_file_name(label);
        let mut file_name = format!("{}.{}", stem, format.extension());
        let target = PathBuf::from(folder);

        if self.taken.contains(&target.join(&file_name)) {
            let renamed = format!("{}_{}.{}", stem, id_suffix(guid), format.extension());
            tracing::warn!(from = %file_name, to = %renamed, "image file name collision");
            file_name = renamed;
        }
        self.taken.insert(target.join(&file_name));

        let index = self.requests.len();
        self.requests.push(RenditionRequest {
            file_name,
            node,
            guid: guid.to_string(),
            output_target: target,
            format,
            scale,
            bounds,
        });
        &self.requests[index]
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn into_requests(self) -> Vec<RenditionRequest> {
        self.requests
    }
}

/// 冲突时追加的短后缀，取 guid 的字母数字部分
pub(crate) fn id_suffix(guid: &str) -> String {
    guid.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(ID_SUFFIX_LEN)
        .collect()
}

/// 去掉文件名中不允许的字符
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "layout".to_string()
    } else {
        trimmed.to_string()
    }
}
