//! enigma: generate a silhouette-constrained paint-by-region puzzle.
//!
//! Reads an optional source image, runs the geometry pipeline, and writes
//! any combination of SVG, JSON, PNG preview, deduction book, and
//! progress map. With no output flag the JSON document is printed to
//! stdout.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin enigma -- [OPTIONS] [IMAGE_PATH]
//! ```
//!
//! Set `RUST_LOG=debug` for per-stage logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use enigma_deduction::{DeductionStore, MapOptions, SlotBoard, to_map_svg};
use enigma_export::{ExportOptions, SvgMetadata, render_preview, to_json, to_svg};
use enigma_pipeline::{Dimensions, GenerationParams, Painting, process_with_diagnostics};
use log::{error, info};

/// Silhouette-constrained paint-by-region puzzle generator.
///
/// Partitions the canvas into numbered Voronoi cells and marks each cell
/// inside or outside the dark silhouette of the source image.
#[derive(Parser)]
#[command(name = "enigma", version)]
struct Cli {
    /// Source image (PNG, JPEG, BMP, WebP). Without one the silhouette is
    /// empty.
    image_path: Option<PathBuf>,

    /// Sampler seed.
    #[arg(long, default_value_t = GenerationParams::DEFAULT_SEED, allow_negative_numbers = true)]
    seed: i64,

    /// Number of cells (values below 1 are raised to 1).
    #[arg(long, default_value_t = i64::from(GenerationParams::DEFAULT_COMPLEXITY), allow_negative_numbers = true)]
    complexity: i64,

    /// Luminance threshold; darker pixels are silhouette (clamped to 0-255).
    #[arg(long, default_value_t = i64::from(GenerationParams::DEFAULT_THRESHOLD), allow_negative_numbers = true)]
    threshold: i64,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = Dimensions::CANVAS.width, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = Dimensions::CANVAS.height, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    height: u32,

    /// Generation parameters as a JSON string.
    ///
    /// When provided, `--seed`, `--complexity`, `--threshold`, `--width`
    /// and `--height` are ignored.
    #[arg(long)]
    config_json: Option<String>,

    /// Draw cell outlines only, without the brass fills.
    #[arg(long)]
    monochrome: bool,

    /// Do not draw the silhouette outline.
    #[arg(long)]
    hide_outline: bool,

    /// Do not draw cell numbers.
    #[arg(long)]
    hide_numbers: bool,

    /// Write the SVG document to this file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the JSON document to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a PNG preview to this file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the deduction book (clues and sentences) as JSON to this file.
    #[arg(long)]
    deduction: Option<PathBuf>,

    /// Write the deduction progress map as SVG to this file.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Print per-stage timings and counts to stderr.
    #[arg(long)]
    diagnostics: bool,
}

impl Cli {
    const fn has_output(&self) -> bool {
        self.svg.is_some()
            || self.json.is_some()
            || self.png.is_some()
            || self.deduction.is_some()
            || self.map.is_some()
    }

    const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            color_mode: !self.monochrome,
            show_outline: !self.hide_outline,
            show_numbers: !self.hide_numbers,
        }
    }
}

/// Build [`GenerationParams`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn params_from_cli(cli: &Cli) -> Result<GenerationParams, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str::<GenerationParams>(json)
            .map(GenerationParams::normalized)
            .map_err(|e| format!("Error parsing --config-json: {e}"));
    }
    Ok(GenerationParams::clamped(
        cli.seed,
        cli.complexity,
        cli.threshold,
        Dimensions {
            width: cli.width,
            height: cli.height,
        },
    ))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let params = params_from_cli(cli)?;

    let source = cli
        .image_path
        .as_deref()
        .map(|path| {
            std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))
        })
        .transpose()?;
    if let (Some(path), Some(bytes)) = (&cli.image_path, &source) {
        info!("source {} ({} bytes)", path.display(), bytes.len());
    }

    let (painting, diagnostics) = process_with_diagnostics(source.as_deref(), &params);
    if cli.diagnostics {
        eprintln!("{}", diagnostics.report());
    }

    let options = cli.export_options();

    if !cli.has_output() {
        let json = to_json(&painting).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    if let Some(ref path) = cli.json {
        let json = to_json(&painting).map_err(|e| e.to_string())?;
        write_output(path, json.as_bytes())?;
    }

    if let Some(ref path) = cli.svg {
        let svg = svg_document(cli, &painting, &options)?;
        write_output(path, svg.as_bytes())?;
    }

    if let Some(ref path) = cli.png {
        let img = render_preview(&painting, &options).map_err(|e| e.to_string())?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        info!("preview written to {}", path.display());
    }

    if cli.deduction.is_some() || cli.map.is_some() {
        let store = DeductionStore::from_cells(&painting.cells);

        if let Some(ref path) = cli.deduction {
            let json = serde_json::to_string_pretty(&store.book())
                .map_err(|e| format!("Error serializing deduction book: {e}"))?;
            write_output(path, json.as_bytes())?;
        }

        if let Some(ref path) = cli.map {
            let board = SlotBoard::new(&store);
            let map_options = MapOptions {
                show_outline: options.show_outline,
                show_numbers: options.show_numbers,
            };
            let svg = to_map_svg(&painting, &store, &board, &map_options);
            write_output(path, svg.as_bytes())?;
        }
    }

    Ok(())
}

fn svg_document(cli: &Cli, painting: &Painting, options: &ExportOptions) -> Result<String, String> {
    let params_json = serde_json::to_string(&painting.params)
        .map_err(|e| format!("Error serializing parameters: {e}"))?;
    let title = cli
        .image_path
        .as_deref()
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or("enigma");
    let description = format!(
        "seed={} complexity={} threshold={}",
        painting.params.seed, painting.params.complexity, painting.params.threshold,
    );
    let metadata = SvgMetadata {
        title: Some(title),
        description: Some(&description),
        params_json: Some(&params_json),
    };
    Ok(to_svg(painting, options, &metadata))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
