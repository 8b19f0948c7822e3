//! 导出配置
//! 每次导出构造一次，只读传递给各个阶段

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 输出文档格式版本
pub const LAYOUT_FORMAT_VERSION: &str = "0.6.1";

/// 导出配置（可从 TOML 加载）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 输出缩放系数，作用于所有坐标与图片
    pub scale: f64,
    /// 扩展模式：启用 Input/Scroller/Viewport 后缀与 TextMeshPro 文本
    pub extended: bool,
    /// 是否执行响应式参数推断
    pub responsive: bool,
    /// 是否输出栅格化图片
    pub images: bool,
    pub output_dir: PathBuf,
    pub format_version: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            extended: false,
            responsive: true,
            images: true,
            output_dir: PathBuf::new(),
            format_version: LAYOUT_FORMAT_VERSION.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into(), ..Self::default() }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 解析用户输入的缩放系数
    pub fn parse_scale(input: &str) -> Result<f64, ConfigError> {
        let scale: f64 = input
            .trim()
            .parse()
            .map_err(|_| ConfigError::NonNumericScale(input.to_string()))?;
        Self::check_scale(scale)?;
        Ok(scale)
    }

    fn check_scale(scale: f64) -> Result<(), ConfigError> {
        if scale.is_finite() && scale > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidScale(scale))
        }
    }

    /// 遍历节点树之前调用；失败时不产生任何输出
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_scale(self.scale)?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingOutput);
        }
        Ok(())
    }
}
