//! 导出流程编排
//!
//! 配置校验 -> 响应式探测 -> 编译 -> 组装 -> 写文件 -> 栅格化。
//! 编译阶段只读场景图（探测除外），写出阶段通过 [`OutputSink`] 与 [`Rasterizer`] 完成。

use crate::assembler::{assemble, LayoutDocument};
use crate::compiler::compile_root;
use crate::config::ExportConfig;
use crate::directive::parse_node;
use crate::error::{ExportError, ExportWarning, RasterError};
use crate::output::{OutputSink, Rasterizer};
use crate::rendition::{id_suffix, sanitize_file_name, RenditionQueue, RenditionRequest};
use crate::responsive::{infer, ResponsiveMap};
use crate::scene::{NodeId, SceneGraph};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 布局文档扩展名
pub const LAYOUT_FILE_SUFFIX: &str = ".layout.txt";

/// 导出根节点：显式标记的节点；没有标记时导出全部画板
pub fn export_roots<S: SceneGraph + ?Sized>(scene: &S) -> Vec<NodeId> {
    let mut marked = Vec::new();
    for artboard in scene.artboards() {
        marked.extend(
            scene
                .descendants(artboard)
                .into_iter()
                .filter(|n| scene.marked_for_export(*n)),
        );
    }
    if marked.is_empty() {
        scene.artboards()
    } else {
        marked
    }
}

/// 一个根节点的编译结果
#[derive(Debug, Clone, Serialize)]
pub struct CompiledLayout {
    #[serde(skip)]
    pub root: NodeId,
    /// 清洗后的根节点名称，同时作为文件名与图片子文件夹名
    pub name: String,
    pub document: LayoutDocument,
}

impl CompiledLayout {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, LAYOUT_FILE_SUFFIX)
    }
}

/// 一次编译的全部产物（尚未写出）
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileOutput {
    pub layouts: Vec<CompiledLayout>,
    pub renditions: Vec<RenditionRequest>,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<ExportWarning>,
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[ExportWarning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(|w| w.to_string()))
}

/// 写出结果
#[derive(Debug, Default)]
pub struct ExportReport {
    pub documents: Vec<PathBuf>,
    pub renditions: usize,
    pub warnings: Vec<ExportWarning>,
    /// 栅格化失败不回滚已写出的布局文档
    pub raster_failure: Option<RasterError>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.raster_failure.is_none()
    }
}

/// 导出器
pub struct Exporter<'a> {
    config: &'a ExportConfig,
}

impl<'a> Exporter<'a> {
    /// 配置非法时直接返回错误，不会访问场景
    pub fn new(config: &'a ExportConfig) -> Result<Self, ExportError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        self.config
    }

    /// 编译给定的根节点
    pub fn compile<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        roots: &[NodeId],
    ) -> Result<CompileOutput, ExportError> {
        if roots.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let responsive = if self.config.responsive {
            self.probe(scene, roots)?
        } else {
            ResponsiveMap::default()
        };

        let scene: &S = scene;
        let mut warnings: Vec<ExportWarning> = responsive
            .drift()
            .iter()
            .map(|d| ExportWarning::ProbeDrift {
                node: d.guid.clone(),
                before: d.before,
                restore: d.restore,
            })
            .collect();

        let mut renditions = RenditionQueue::new();
        let mut layouts = Vec::with_capacity(roots.len());
        let mut taken = HashSet::new();
        for &root in roots {
            let mut name = root_name(scene, root, self.config.extended);
            if taken.contains(&name) {
                // 同名根节点共用文件名和图片文件夹，后来者追加 guid 后缀
                let renamed = format!("{}_{}", name, id_suffix(scene.guid(root)));
                tracing::warn!(from = %name, to = %renamed, "layout file name collision");
                name = renamed;
            }
            taken.insert(name.clone());
            let _span = tracing::info_span!("compile", root = %name).entered();

            let Some(element) = compile_root(
                scene,
                root,
                self.config,
                &responsive,
                &name,
                &mut renditions,
                &mut warnings,
            ) else {
                tracing::info!("root is commented out, skipped");
                continue;
            };
            let document = assemble(scene, root, element, self.config);
            layouts.push(CompiledLayout { root, name, document });
        }

        if layouts.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        tracing::info!(
            layouts = layouts.len(),
            renditions = renditions.len(),
            warnings = warnings.len(),
            "compile finished"
        );
        Ok(CompileOutput {
            layouts,
            renditions: renditions.into_requests(),
            warnings,
        })
    }

    /// 每个画板只探测一次
    fn probe<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        roots: &[NodeId],
    ) -> Result<ResponsiveMap, ExportError> {
        let mut artboards: Vec<NodeId> = Vec::new();
        for root in roots {
            if let Some(artboard) = scene.enclosing_artboard(*root) {
                if !artboards.contains(&artboard) {
                    artboards.push(artboard);
                }
            }
        }

        let mut map = ResponsiveMap::default();
        for artboard in artboards {
            map.merge(infer(scene, artboard, self.config)?);
        }
        Ok(map)
    }

    /// 写出布局文档并提交栅格化请求
    pub fn write<S, O, R>(
        &self,
        scene: &S,
        output: CompileOutput,
        sink: &mut O,
        rasterizer: &mut R,
    ) -> Result<ExportReport, ExportError>
    where
        S: SceneGraph + ?Sized,
        O: OutputSink + ?Sized,
        R: Rasterizer<S> + ?Sized,
    {
        let mut report = ExportReport {
            warnings: output.warnings,
            ..ExportReport::default()
        };

        for layout in &output.layouts {
            if self.config.images {
                sink.create_folder(Path::new(&layout.name))
                    .map_err(|source| ExportError::Write {
                        path: PathBuf::from(&layout.name),
                        source,
                    })?;
            }
            let text = layout.document.to_pretty_json()?;
            let file_name = layout.file_name();
            let path = sink
                .write_file(Path::new(&file_name), &text)
                .map_err(|source| ExportError::Write {
                    path: PathBuf::from(&file_name),
                    source,
                })?;
            tracing::info!(path = %path.display(), "layout written");
            report.documents.push(path);
        }

        if self.config.images && !output.renditions.is_empty() {
            report.renditions = output.renditions.len();
            if let Err(e) = rasterizer.render_batch(scene, &output.renditions) {
                tracing::error!(error = %e, "rasterization failed");
                report.raster_failure = Some(e);
            }
        }

        Ok(report)
    }

    /// 编译并写出
    pub fn export<S, O, R>(
        &self,
        scene: &mut S,
        roots: &[NodeId],
        sink: &mut O,
        rasterizer: &mut R,
    ) -> Result<ExportReport, ExportError>
    where
        S: SceneGraph + ?Sized,
        O: OutputSink + ?Sized,
        R: Rasterizer<S> + ?Sized,
    {
        let output = self.compile(scene, roots)?;
        self.write(&*scene, output, sink, rasterizer)
    }
}

/// 根节点的语义名，清洗后用作文件名
pub fn root_name<S: SceneGraph + ?Sized>(scene: &S, root: NodeId, extended: bool) -> String {
    sanitize_file_name(&parse_node(scene, root, extended).name)
}
