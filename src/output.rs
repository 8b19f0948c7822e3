//! 输出端：文件写入与栅格化

use crate::color::Color;
use crate::error::RasterError;
use crate::rendition::RenditionRequest;
use crate::scene::SceneGraph;
use image::{ImageBuffer, Rgba};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 文件/文件夹写入
pub trait OutputSink {
    /// 不存在时创建文件夹
    fn create_folder(&mut self, name: &Path) -> io::Result<PathBuf>;
    /// 创建文件，已存在时覆盖
    fn write_file(&mut self, name: &Path, contents: &str) -> io::Result<PathBuf>;
}

/// 写入本地文件系统
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn create_folder(&mut self, name: &Path) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    fn write_file(&mut self, name: &Path, contents: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// 栅格化器
///
/// 一批请求处理完后统一报告失败。
pub trait Rasterizer<S: SceneGraph + ?Sized> {
    fn render_batch(&mut self, scene: &S, requests: &[RenditionRequest]) -> Result<(), RasterError>;
}

/// 按节点墨迹范围输出纯色 PNG
///
/// 用于脱离宿主工具运行时，让导入端拿到尺寸正确的占位图片；颜色取节点填充色，没有则透明。
#[derive(Debug, Clone)]
pub struct BoxRasterizer {
    root: PathBuf,
}

impl BoxRasterizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn render_one(&self, request: &RenditionRequest, fill: Color) -> Result<(), String> {
        let width = request.bounds.width.ceil().max(1.0) as u32;
        let height = request.bounds.height.ceil().max(1.0) as u32;
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([fill.r, fill.g, fill.b, fill.a]));

        let folder = self.root.join(&request.output_target);
        fs::create_dir_all(&folder).map_err(|e| format!("{}: {}", folder.display(), e))?;
        let path = folder.join(&request.file_name);
        img.save(&path).map_err(|e| format!("{}: {}", path.display(), e))
    }
}

impl<S: SceneGraph + ?Sized> Rasterizer<S> for BoxRasterizer {
    fn render_batch(&mut self, scene: &S, requests: &[RenditionRequest]) -> Result<(), RasterError> {
        let mut failures = Vec::new();
        for request in requests {
            let fill = scene.fill(request.node).unwrap_or(Color::TRANSPARENT);
            if let Err(e) = self.render_one(request, fill) {
                failures.push(e);
            }
        }
        if failures.is_empty() {
            return Ok(());
        }
        Err(RasterError {
            failed: failures.len(),
            total: requests.len(),
            message: failures.join("; "),
        })
    }
}
