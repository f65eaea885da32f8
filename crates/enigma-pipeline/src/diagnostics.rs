//! Pipeline diagnostics: timing and counts for each stage.
//!
//! Durations are measured with the `web-time` crate so the same code
//! runs natively and under WASM. They serialize as fractional seconds,
//! since `std::time::Duration` has no serde support of its own.

use std::fmt::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
///
/// The silhouette stages are `None` when no source raster was available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Decode and resample onto the canvas.
    pub rasterize: Option<StageDiagnostics>,
    /// Luminance thresholding.
    pub threshold: Option<StageDiagnostics>,
    /// Marching-squares contour tracing.
    pub contour_tracing: Option<StageDiagnostics>,
    /// Seeded point sampling.
    pub sampling: StageDiagnostics,
    /// Bounded Voronoi tessellation.
    pub tessellation: StageDiagnostics,
    /// Centroid containment.
    pub classification: StageDiagnostics,
    /// Wall-clock duration of the entire run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Rasterization metrics.
    Rasterize {
        /// Size of the encoded source in bytes.
        input_bytes: usize,
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },
    /// Thresholding metrics.
    Threshold {
        /// Luminance threshold applied.
        threshold: u8,
        /// Pixels classified as foreground.
        foreground_pixels: usize,
        /// Total pixel count.
        total_pixels: u64,
    },
    /// Contour tracing metrics.
    ContourTracing {
        /// Number of closed contours.
        contour_count: usize,
        /// Vertices across all contours.
        total_point_count: usize,
        /// Vertices in the largest contour.
        max_contour_points: usize,
    },
    /// Sampling metrics.
    Sampling {
        /// Seed the generator was initialised with.
        seed: i64,
        /// Number of points drawn.
        point_count: usize,
    },
    /// Tessellation metrics.
    Tessellation {
        /// Cells that survived clipping.
        cell_count: usize,
        /// Samples that produced no cell.
        dropped_count: usize,
    },
    /// Classification metrics.
    Classification {
        /// Cells whose centroid lies inside the silhouette.
        inside_count: usize,
        /// Cells outside the silhouette.
        outside_count: usize,
    },
}

/// High-level summary counts for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Whether a source raster contributed a silhouette.
    pub source_available: bool,
    /// Number of silhouette contours.
    pub contour_count: usize,
    /// Number of cells.
    pub cell_count: usize,
    /// Number of cells inside the silhouette.
    pub inside_count: usize,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = format!("Pipeline Diagnostics Report\n{}\n", "=".repeat(60));
        let _ = writeln!(
            out,
            "Canvas: {}x{}  |  Source: {}",
            self.summary.canvas_width,
            self.summary.canvas_height,
            if self.summary.source_available {
                "rasterized"
            } else {
                "none"
            },
        );
        let total_ms = duration_ms(self.total_duration);
        let _ = writeln!(out, "Total duration: {total_ms:.3}ms\n");
        let _ = writeln!(
            out,
            "{:<18} {:>10} {:>10}  Details",
            "Stage", "Duration", "% Total"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));

        let stages = [
            ("Rasterize", self.rasterize.as_ref()),
            ("Threshold", self.threshold.as_ref()),
            ("Contour Tracing", self.contour_tracing.as_ref()),
            ("Sampling", Some(&self.sampling)),
            ("Tessellation", Some(&self.tessellation)),
            ("Classification", Some(&self.classification)),
        ];
        for (name, diag) in stages {
            let Some(diag) = diag else {
                let _ = writeln!(out, "{name:<18} {:>10} {:>10}  skipped", "-", "-");
                continue;
            };
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            let _ = writeln!(out, "{name:<18} {ms:>8.3}ms {pct:>9.1}%  {details}");
        }

        let _ = write!(
            out,
            "\nContours: {}  |  Cells: {} ({} inside)",
            self.summary.contour_count, self.summary.cell_count, self.summary.inside_count,
        );
        out
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Rasterize {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::Threshold {
            threshold,
            foreground_pixels,
            total_pixels,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let density = if *total_pixels > 0 {
                *foreground_pixels as f64 / *total_pixels as f64 * 100.0
            } else {
                0.0
            };
            format!("threshold={threshold} foreground={foreground_pixels} ({density:.1}%)")
        }
        StageMetrics::ContourTracing {
            contour_count,
            total_point_count,
            max_contour_points,
        } => format!("{contour_count} contours, {total_point_count} pts (max={max_contour_points})"),
        StageMetrics::Sampling { seed, point_count } => {
            format!("seed={seed} points={point_count}")
        }
        StageMetrics::Tessellation {
            cell_count,
            dropped_count,
        } => format!("{cell_count} cells, {dropped_count} dropped"),
        StageMetrics::Classification {
            inside_count,
            outside_count,
        } => format!("{inside_count} inside, {outside_count} outside"),
    }
}
