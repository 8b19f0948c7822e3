//! 导出流程测试
//! 配置校验、根节点选择、画布信息、文件写出与 FFI

use super::{artboard, compile, config, document, node};
use crate::config::{ExportConfig, LAYOUT_FORMAT_VERSION};
use crate::error::{ConfigError, ExportError, RasterError};
use crate::export::{export_roots, root_name, Exporter};
use crate::output::{BoxRasterizer, FsSink, Rasterizer};
use crate::rendition::RenditionRequest;
use crate::geometry::Rect;
use crate::scene::{DesignDocument, DesignNode, NodeKind, SceneGraph};
use crate::{lx_compile_layout, lx_string_free};
use serde_json::{json, Value};
use std::ffi::{CStr, CString};
use std::fs;

fn icon_screen() -> DesignDocument {
    document(vec![artboard("Screen", 400.0, 300.0).with_child(
        node("Icon*", NodeKind::Group, 150.0, 125.0, 100.0, 50.0)
            .with_child(node("Glyph", NodeKind::Path, 160.0, 130.0, 80.0, 40.0)),
    )])
}

#[test]
fn test_single_icon_end_to_end() {
    for scale in [1.0, 2.0] {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new(dir.path()).with_scale(scale);
        let exporter = Exporter::new(&config).unwrap();
        let mut doc = icon_screen();
        let roots = export_roots(&doc);

        let mut sink = FsSink::new(dir.path());
        let mut rasterizer = BoxRasterizer::new(dir.path());
        let report = exporter.export(&mut doc, &roots, &mut sink, &mut rasterizer).unwrap();
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.renditions, 1);

        let text = fs::read_to_string(dir.path().join("Screen.layout.txt")).unwrap();
        let layout: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(layout["info"]["version"], json!(LAYOUT_FORMAT_VERSION));
        assert_eq!(layout["info"]["canvas"]["size"], json!({ "w": 400.0 * scale, "h": 300.0 * scale }));
        assert_eq!(
            layout["info"]["canvas"]["base"],
            json!({ "x": 0.0, "y": 0.0, "w": 400.0 * scale, "h": 300.0 * scale })
        );

        let elements = layout["root"]["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 1);
        let icon = &elements[0];
        assert_eq!(icon["type"], json!("Image"));
        assert_eq!(icon["name"], json!("Icon"));
        assert_eq!(icon["x"], json!(0.0));
        assert_eq!(icon["y"], json!(0.0));
        assert_eq!(icon["w"], json!(100.0 * scale));
        assert_eq!(icon["h"], json!(50.0 * scale));
        assert_eq!(icon["image"], json!("Screen - Icon"));
        assert!(icon.get("elements").is_none());

        let png = dir.path().join("Screen").join("Screen - Icon.png");
        let (w, h) = image::image_dimensions(&png).unwrap();
        assert_eq!((w, h), ((100.0 * scale) as u32, (50.0 * scale) as u32));
    }
}

#[test]
fn test_scale_parsing() {
    assert_eq!(ExportConfig::parse_scale("2").unwrap(), 2.0);
    assert_eq!(ExportConfig::parse_scale(" 1.5 ").unwrap(), 1.5);
    assert!(matches!(ExportConfig::parse_scale("big"), Err(ConfigError::NonNumericScale(_))));
    assert!(matches!(ExportConfig::parse_scale("0"), Err(ConfigError::InvalidScale(_))));
    assert!(matches!(ExportConfig::parse_scale("-1"), Err(ConfigError::InvalidScale(_))));
    assert!(matches!(ExportConfig::parse_scale("inf"), Err(ConfigError::InvalidScale(_))));
}

#[test]
fn test_invalid_config_rejected_before_walk() {
    assert!(matches!(
        ExportConfig::default().validate(),
        Err(ConfigError::MissingOutput)
    ));

    let bad = config().with_scale(0.0);
    assert!(matches!(
        Exporter::new(&bad),
        Err(ExportError::Config(ConfigError::InvalidScale(_)))
    ));
}

#[test]
fn test_config_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.toml");
    fs::write(&path, "scale = 2.0\nextended = true\nimages = false\noutput_dir = \"build/ui\"\n").unwrap();

    let config = ExportConfig::load(&path).unwrap();
    assert_eq!(config.scale, 2.0);
    assert!(config.extended);
    assert!(!config.images);
    assert!(config.responsive);
    assert_eq!(config.output_dir, std::path::PathBuf::from("build/ui"));
    assert_eq!(config.format_version, LAYOUT_FORMAT_VERSION);

    fs::write(&path, "scale = \"big\"").unwrap();
    assert!(matches!(ExportConfig::load(&path), Err(ConfigError::Parse { .. })));
    assert!(matches!(
        ExportConfig::load(&dir.path().join("missing.toml")),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_export_roots() {
    let doc = document(vec![
        artboard("Home", 400.0, 300.0),
        artboard("Settings", 400.0, 300.0),
    ]);
    assert_eq!(export_roots(&doc).len(), 2);

    let doc = document(vec![
        artboard("Home", 400.0, 300.0)
            .with_child(node("Card", NodeKind::Group, 0.0, 0.0, 100.0, 100.0).marked()),
        artboard("Settings", 400.0, 300.0),
    ]);
    assert_eq!(export_roots(&doc), vec![doc.find("Card").unwrap()]);
}

#[test]
fn test_root_name_sanitized() {
    let doc = document(vec![artboard("+Home: Main/@pivot=top", 400.0, 300.0)]);
    let home = doc.artboards()[0];
    assert_eq!(root_name(&doc, home, false), "Home_ Main");
}

#[test]
fn test_duplicate_root_names_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig::new(dir.path());
    let exporter = Exporter::new(&config).unwrap();
    let mut doc = document(vec![
        DesignNode::new("home-1", "Home", NodeKind::Artboard, Rect::new(0.0, 0.0, 400.0, 300.0))
            .with_child(node("Logo*", NodeKind::Rectangle, 10.0, 10.0, 50.0, 50.0)),
        DesignNode::new("home-2", "Home", NodeKind::Artboard, Rect::new(500.0, 0.0, 400.0, 300.0))
            .with_child(node("Badge*", NodeKind::Rectangle, 510.0, 10.0, 50.0, 50.0)),
    ]);
    let roots = export_roots(&doc);

    let output = exporter.compile(&mut doc, &roots).unwrap();
    let names: Vec<&str> = output.layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Home_home2"]);
    let targets: Vec<&std::path::Path> = output.renditions.iter().map(|r| r.output_target.as_path()).collect();
    assert_eq!(targets, vec![std::path::Path::new("Home"), std::path::Path::new("Home_home2")]);

    let report = exporter
        .write(&doc, output, &mut FsSink::new(dir.path()), &mut BoxRasterizer::new(dir.path()))
        .unwrap();
    assert_eq!(report.documents.len(), 2);
    assert!(dir.path().join("Home.layout.txt").exists());
    assert!(dir.path().join("Home_home2.layout.txt").exists());
}

fn card_screen() -> DesignDocument {
    document(vec![artboard("Screen", 400.0, 300.0)
        .with_child(node("Card", NodeKind::Group, 50.0, 50.0, 100.0, 100.0).marked())])
}

#[test]
fn test_nested_root_base_aligned_to_pivot() {
    let mut doc = card_screen();
    let output = compile(&mut doc, &config());
    let layout = &output.layouts[0];
    assert_eq!(layout.name, "Card");
    assert_eq!(layout.document.root.responsive.pivot.as_deref(), Some("topleft"));

    let canvas = &layout.document.info.canvas;
    assert_eq!((canvas.size.w, canvas.size.h), (100.0, 100.0));
    assert_eq!((canvas.base.x, canvas.base.y), (-200.0, -150.0));
    assert_eq!((layout.document.root.rect.x, layout.document.root.rect.y), (0.0, 0.0));
}

#[test]
fn test_nested_root_without_pivot() {
    let mut doc = card_screen();
    let output = compile(&mut doc, &config().with_responsive(false));
    let canvas = &output.layouts[0].document.info.canvas;
    assert_eq!((canvas.base.x, canvas.base.y, canvas.base.w), (-150.0, -100.0, 100.0));
}

#[test]
fn test_commented_root_is_nothing_to_export() {
    let mut doc = document(vec![artboard("#Draft", 400.0, 300.0)]);
    let config = config();
    let exporter = Exporter::new(&config).unwrap();
    let roots = export_roots(&doc);
    assert!(matches!(exporter.compile(&mut doc, &roots), Err(ExportError::NothingToExport)));
    assert!(matches!(exporter.compile(&mut doc, &[]), Err(ExportError::NothingToExport)));
}

struct FailingRasterizer;

impl<S: SceneGraph + ?Sized> Rasterizer<S> for FailingRasterizer {
    fn render_batch(&mut self, _scene: &S, requests: &[RenditionRequest]) -> Result<(), RasterError> {
        Err(RasterError {
            failed: requests.len(),
            total: requests.len(),
            message: "renderer offline".to_string(),
        })
    }
}

#[test]
fn test_raster_failure_keeps_documents() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig::new(dir.path());
    let exporter = Exporter::new(&config).unwrap();
    let mut doc = icon_screen();
    let roots = export_roots(&doc);

    let report = exporter
        .export(&mut doc, &roots, &mut FsSink::new(dir.path()), &mut FailingRasterizer)
        .unwrap();
    assert_eq!(report.documents.len(), 1);
    assert!(report.documents[0].exists());
    let failure = report.raster_failure.unwrap();
    assert_eq!((failure.failed, failure.total), (1, 1));
}

#[test]
fn test_images_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ExportConfig::new(dir.path());
    config.images = false;
    let exporter = Exporter::new(&config).unwrap();
    let mut doc = icon_screen();
    let roots = export_roots(&doc);

    let report = exporter
        .export(&mut doc, &roots, &mut FsSink::new(dir.path()), &mut FailingRasterizer)
        .unwrap();
    assert_eq!(report.renditions, 0);
    assert!(report.raster_failure.is_none());
    assert!(!dir.path().join("Screen").exists());
}

const DESIGN_JSON: &str = r##"{
    "artboards": [{
        "id": "a1",
        "name": "Screen",
        "kind": "Artboard",
        "bounds": { "x": 0, "y": 0, "width": 400, "height": 300 },
        "children": [{
            "id": "n1",
            "name": "Icon*",
            "kind": "Rectangle",
            "bounds": { "x": 150, "y": 125, "width": 100, "height": 50 },
            "fill": "#ff0000"
        }]
    }]
}"##;

fn call_ffi(input: &str, scale: f64) -> Value {
    let input = CString::new(input).unwrap();
    let raw = lx_compile_layout(input.as_ptr(), scale, false);
    assert!(!raw.is_null());
    let text = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_string();
    lx_string_free(raw);
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_ffi_compile() {
    let result = call_ffi(DESIGN_JSON, 2.0);
    let layout = &result["layouts"][0];
    assert_eq!(layout["name"], json!("Screen"));
    assert_eq!(layout["document"]["info"]["canvas"]["size"], json!({ "w": 800.0, "h": 600.0 }));
    assert_eq!(layout["document"]["root"]["elements"][0]["type"], json!("Image"));

    let rendition = &result["renditions"][0];
    assert_eq!(rendition["fileName"], json!("Screen - Icon.png"));
    assert_eq!(rendition["outputTarget"], json!("Screen"));
    assert_eq!(rendition["format"], json!("png"));
    assert_eq!(result["warnings"], json!([]));
}

#[test]
fn test_ffi_errors() {
    let result = call_ffi("{ not json", 1.0);
    assert!(result["error"].as_str().unwrap().contains("malformed"));

    let result = call_ffi(DESIGN_JSON, 0.0);
    assert!(result["error"].as_str().unwrap().contains("scale"));

    assert!(lx_compile_layout(std::ptr::null(), 1.0, false).is_null());
}

#[test]
fn test_box_rasterizer_uses_fill() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = document(vec![artboard("Screen", 100.0, 100.0).with_child(
        node("Swatch", NodeKind::Rectangle, 10.0, 10.0, 30.0, 20.0).with_fill(crate::Color::rgb(255, 0, 0)),
    )]);
    let output = compile(&mut doc, &ExportConfig::new(dir.path()));

    let mut rasterizer = BoxRasterizer::new(dir.path());
    rasterizer.render_batch(&doc, &output.renditions).unwrap();

    let png = image::open(dir.path().join("Screen").join("Screen - Swatch.png")).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (30, 20));
    assert_eq!(png.get_pixel(0, 0).0, [255, 0, 0, 255]);
}
