//! layout-export 命令行
//! 读取 JSON 设计文档，输出布局文档与占位图片

use clap::Parser;
use layout_export::config::ExportConfig;
use layout_export::export::export_roots;
use layout_export::{BoxRasterizer, DesignDocument, ExportError, Exporter, FsSink, NodeId};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "layout-export", version, about = "Compile a design document into layout files")]
struct Cli {
    /// Design document (JSON)
    design: PathBuf,

    /// Output directory
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Output scale factor
    #[arg(long)]
    scale: Option<String>,

    /// Enable Input/Scroller/Viewport suffixes and TextMeshPro text
    #[arg(long)]
    extended: bool,

    /// Skip the resize probe; only explicit directives set pivot/stretch
    #[arg(long)]
    no_responsive: bool,

    /// Do not write image files
    #[arg(long)]
    no_images: bool,

    /// TOML config file; command line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export only these nodes (id or layer name), repeatable
    #[arg(long = "root")]
    roots: Vec<String>,
}

fn build_config(cli: &Cli) -> Result<ExportConfig, ExportError> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(out) = &cli.out {
        config.output_dir = out.clone();
    }
    if let Some(scale) = &cli.scale {
        config.scale = ExportConfig::parse_scale(scale)?;
    }
    config.extended |= cli.extended;
    if cli.no_responsive {
        config.responsive = false;
    }
    if cli.no_images {
        config.images = false;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), ExportError> {
    let config = build_config(&cli)?;
    let exporter = Exporter::new(&config)?;

    let text = fs::read_to_string(&cli.design).map_err(|source| ExportError::Read {
        path: cli.design.clone(),
        source,
    })?;
    let mut document = DesignDocument::from_json(&text)?;
    println!("✅ Design loaded: {} nodes", document.len());

    let roots: Vec<NodeId> = if cli.roots.is_empty() {
        export_roots(&document)
    } else {
        let mut roots = Vec::new();
        for key in &cli.roots {
            let node = document
                .find(key)
                .or_else(|| document.find_by_name(key))
                .ok_or_else(|| layout_export::SceneError::UnknownNode(key.clone()))?;
            roots.push(node);
        }
        roots
    };

    let mut sink = FsSink::new(&config.output_dir);
    let mut rasterizer = BoxRasterizer::new(&config.output_dir);
    let report = exporter.export(&mut document, &roots, &mut sink, &mut rasterizer)?;

    for path in &report.documents {
        println!("📄 {}", path.display());
    }
    if report.renditions > 0 {
        println!("🖼  {} images", report.renditions);
    }
    for warning in &report.warnings {
        println!("⚠️  {}", warning);
    }
    if let Some(e) = &report.raster_failure {
        println!("❌ {}", e);
    }
    println!("✅ Export finished: {} layouts", report.documents.len());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
