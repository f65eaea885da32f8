//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! ```rust
//! # use enigma_pipeline::{GenerationParams, Pipeline, PipelineError};
//! # fn run(png: Vec<u8>) -> Result<(), PipelineError> {
//! let painting = Pipeline::new(png, GenerationParams::default())
//!     .rasterize()?
//!     .threshold()
//!     .trace()
//!     .sample()
//!     .tessellate()
//!     .classify()
//!     .into_painting();
//! # Ok(())
//! # }
//! ```
//!
//! The silhouette branch (rasterize, threshold, trace) is the only part
//! that touches the source image. When no image is available, start from
//! [`Pipeline::without_source`] instead; when a silhouette has already
//! been traced, [`Pipeline::with_silhouette`] skips straight to sampling.
//!
//! Each stage method consumes `self` and returns the next state, carrying
//! the timing of every stage run so far.

use std::sync::Arc;

use log::{debug, warn};
use web_time::Instant;

use crate::diagnostics::{PipelineDiagnostics, PipelineSummary, StageDiagnostics, StageMetrics};
use crate::foreground::ForegroundMask;
use crate::types::{Cell, Contour, GenerationParams, Painting, PipelineError, Point, RgbaImage};

/// Entry points for the staged pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Start a run from encoded image bytes.
    ///
    /// The parameters are normalized so complexity is at least one.
    pub fn new(source: impl Into<Arc<[u8]>>, params: GenerationParams) -> Pending {
        Pending {
            params: params.normalized(),
            source: source.into(),
            started: Instant::now(),
        }
    }

    /// Start a run with no source image: the silhouette is empty.
    pub fn without_source(params: GenerationParams) -> Traced {
        Self::with_silhouette(params, Vec::new())
    }

    /// Start a run from an already traced silhouette.
    pub fn with_silhouette(params: GenerationParams, silhouette: Vec<Contour>) -> Traced {
        Traced {
            params: params.normalized(),
            silhouette,
            started: Instant::now(),
            log: SilhouetteLog::default(),
        }
    }
}

/// Timings of the silhouette branch; all `None` when it was skipped.
#[derive(Debug, Clone, Default)]
struct SilhouetteLog {
    rasterize: Option<StageDiagnostics>,
    threshold: Option<StageDiagnostics>,
    contour_tracing: Option<StageDiagnostics>,
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing, call .rasterize() to continue"]
pub struct Pending {
    params: GenerationParams,
    source: Arc<[u8]>,
    started: Instant,
}

impl Pending {
    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Decode and resample the source onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] for empty bytes,
    /// [`PipelineError::ImageDecode`] for unreadable data, and
    /// [`PipelineError::InvalidConfig`] for a zero-sized canvas.
    pub fn rasterize(self) -> Result<Rasterized, PipelineError> {
        let start = Instant::now();
        let raster = crate::raster::rasterize(&self.source, self.params.canvas)?;
        let rasterize = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Rasterize {
                input_bytes: self.source.len(),
                width: raster.width(),
                height: raster.height(),
            },
        };
        debug!(
            "rasterized {} bytes to {}x{}",
            self.source.len(),
            raster.width(),
            raster.height()
        );
        Ok(Rasterized {
            params: self.params,
            raster,
            started: self.started,
            rasterize,
        })
    }

    /// Run the whole silhouette branch, falling back to an empty
    /// silhouette when the source cannot be rasterized.
    pub fn trace_or_empty(self) -> Traced {
        let params = self.params;
        let started = self.started;
        match self.rasterize() {
            Ok(rasterized) => rasterized.threshold().trace(),
            Err(e) => {
                warn!("source unavailable, continuing without a silhouette: {e}");
                Traced {
                    params,
                    silhouette: Vec::new(),
                    started,
                    log: SilhouetteLog::default(),
                }
            }
        }
    }
}

// ───────────────────────── Stage 1: Rasterized ───────────────────────

/// Pipeline state after the source has been drawn onto the canvas.
#[must_use = "pipeline stages are consumed by advancing, call .threshold() to continue"]
pub struct Rasterized {
    params: GenerationParams,
    raster: RgbaImage,
    started: Instant,
    rasterize: StageDiagnostics,
}

impl Rasterized {
    /// The canvas-sized RGBA raster.
    #[must_use]
    pub const fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Threshold the raster into a foreground mask.
    pub fn threshold(self) -> Thresholded {
        let start = Instant::now();
        let mask = ForegroundMask::from_raster(&self.raster, self.params.threshold);
        let foreground_pixels = mask.count();
        let threshold = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Threshold {
                threshold: self.params.threshold,
                foreground_pixels,
                total_pixels: u64::from(mask.width()) * u64::from(mask.height()),
            },
        };
        debug!(
            "threshold {} selected {foreground_pixels} pixels",
            self.params.threshold
        );
        Thresholded {
            params: self.params,
            mask,
            started: self.started,
            rasterize: self.rasterize,
            threshold,
        }
    }
}

// ───────────────────────── Stage 2: Thresholded ──────────────────────

/// Pipeline state after luminance thresholding.
#[must_use = "pipeline stages are consumed by advancing, call .trace() to continue"]
pub struct Thresholded {
    params: GenerationParams,
    mask: ForegroundMask,
    started: Instant,
    rasterize: StageDiagnostics,
    threshold: StageDiagnostics,
}

impl Thresholded {
    /// The foreground mask.
    #[must_use]
    pub const fn mask(&self) -> &ForegroundMask {
        &self.mask
    }

    /// Trace the mask's boundaries into closed contours.
    pub fn trace(self) -> Traced {
        let start = Instant::now();
        let silhouette = crate::contour::trace_contours(&self.mask);
        let contour_tracing = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::ContourTracing {
                contour_count: silhouette.len(),
                total_point_count: silhouette.iter().map(Contour::len).sum(),
                max_contour_points: silhouette.iter().map(Contour::len).max().unwrap_or(0),
            },
        };
        Traced {
            params: self.params,
            silhouette,
            started: self.started,
            log: SilhouetteLog {
                rasterize: Some(self.rasterize),
                threshold: Some(self.threshold),
                contour_tracing: Some(contour_tracing),
            },
        }
    }
}

// ───────────────────────── Stage 3: Traced ───────────────────────────

/// Pipeline state once the silhouette is known.
#[must_use = "pipeline stages are consumed by advancing, call .sample() to continue"]
pub struct Traced {
    params: GenerationParams,
    silhouette: Vec<Contour>,
    started: Instant,
    log: SilhouetteLog,
}

impl Traced {
    /// The silhouette contours (empty without a source).
    #[must_use]
    pub fn silhouette(&self) -> &[Contour] {
        &self.silhouette
    }

    /// Consume the stage, keeping only the silhouette.
    #[must_use]
    pub fn into_silhouette(self) -> Vec<Contour> {
        self.silhouette
    }

    /// Draw the seeded sample points.
    pub fn sample(self) -> Sampled {
        let start = Instant::now();
        let points = crate::sampler::sample_points(
            self.params.seed,
            self.params.complexity,
            self.params.canvas,
        );
        let sampling = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Sampling {
                seed: self.params.seed,
                point_count: points.len(),
            },
        };
        Sampled {
            params: self.params,
            silhouette: self.silhouette,
            points,
            started: self.started,
            log: self.log,
            sampling,
        }
    }
}

// ───────────────────────── Stage 4: Sampled ──────────────────────────

/// Pipeline state after point sampling.
#[must_use = "pipeline stages are consumed by advancing, call .tessellate() to continue"]
pub struct Sampled {
    params: GenerationParams,
    silhouette: Vec<Contour>,
    points: Vec<Point>,
    started: Instant,
    log: SilhouetteLog,
    sampling: StageDiagnostics,
}

impl Sampled {
    /// The sample points in generation order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Grow one bounded Voronoi cell per point.
    pub fn tessellate(self) -> Tessellated {
        let start = Instant::now();
        let cells = crate::tessellate::tessellate(&self.points, self.params.canvas);
        let tessellation = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Tessellation {
                cell_count: cells.len(),
                dropped_count: self.points.len().saturating_sub(cells.len()),
            },
        };
        Tessellated {
            params: self.params,
            silhouette: self.silhouette,
            cells,
            started: self.started,
            log: self.log,
            sampling: self.sampling,
            tessellation,
        }
    }
}

// ───────────────────────── Stage 5: Tessellated ──────────────────────

/// Pipeline state after tessellation; cells are not yet labelled.
#[must_use = "pipeline stages are consumed by advancing, call .classify() to continue"]
pub struct Tessellated {
    params: GenerationParams,
    silhouette: Vec<Contour>,
    cells: Vec<Cell>,
    started: Instant,
    log: SilhouetteLog,
    sampling: StageDiagnostics,
    tessellation: StageDiagnostics,
}

impl Tessellated {
    /// The unlabelled cells.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Label each cell inside or outside the silhouette.
    pub fn classify(mut self) -> Classified {
        let start = Instant::now();
        crate::classify::classify(&mut self.cells, &self.silhouette);
        let inside_count = self.cells.iter().filter(|c| c.inside_silhouette).count();
        let classification = StageDiagnostics {
            duration: start.elapsed(),
            metrics: StageMetrics::Classification {
                inside_count,
                outside_count: self.cells.len() - inside_count,
            },
        };
        debug!(
            "classified {} cells against {} contours: {inside_count} inside",
            self.cells.len(),
            self.silhouette.len()
        );

        let summary = PipelineSummary {
            canvas_width: self.params.canvas.width,
            canvas_height: self.params.canvas.height,
            source_available: self.log.rasterize.is_some(),
            contour_count: self.silhouette.len(),
            cell_count: self.cells.len(),
            inside_count,
        };
        let diagnostics = PipelineDiagnostics {
            rasterize: self.log.rasterize,
            threshold: self.log.threshold,
            contour_tracing: self.log.contour_tracing,
            sampling: self.sampling,
            tessellation: self.tessellation,
            classification,
            total_duration: self.started.elapsed(),
            summary,
        };
        Classified {
            painting: Painting {
                params: self.params,
                silhouette: self.silhouette,
                cells: self.cells,
            },
            diagnostics,
        }
    }
}

// ───────────────────────── Stage 6: Classified ───────────────────────

/// Final pipeline state: the merged painting plus its diagnostics.
pub struct Classified {
    painting: Painting,
    diagnostics: PipelineDiagnostics,
}

impl Classified {
    /// The finished painting.
    #[must_use]
    pub const fn painting(&self) -> &Painting {
        &self.painting
    }

    /// Timing and counts for the run.
    #[must_use]
    pub const fn diagnostics(&self) -> &PipelineDiagnostics {
        &self.diagnostics
    }

    /// Consume the stage, keeping only the painting.
    #[must_use]
    pub fn into_painting(self) -> Painting {
        self.painting
    }

    /// Consume the stage into the painting and its diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Painting, PipelineDiagnostics) {
        (self.painting, self.diagnostics)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Dimensions;

    const SMALL: Dimensions = Dimensions {
        width: 40,
        height: 30,
    };

    fn params(complexity: u32) -> GenerationParams {
        GenerationParams {
            seed: 11,
            complexity,
            threshold: 130,
            canvas: SMALL,
        }
    }

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn stages_expose_intermediates() {
        // Dark square in the middle of a white canvas.
        let img = RgbaImage::from_fn(40, 30, |x, y| {
            if (10..30).contains(&x) && (5..25).contains(&y) {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let rasterized = Pipeline::new(png(&img), params(12)).rasterize().unwrap();
        assert_eq!(rasterized.raster().dimensions(), (40, 30));

        let thresholded = rasterized.threshold();
        assert_eq!(thresholded.mask().count(), 400);

        let traced = thresholded.trace();
        assert_eq!(traced.silhouette().len(), 1);

        let sampled = traced.sample();
        assert_eq!(sampled.points().len(), 12);

        let tessellated = sampled.tessellate();
        assert!(tessellated.cells().iter().all(|c| !c.inside_silhouette));

        let classified = tessellated.classify();
        let diagnostics = classified.diagnostics();
        assert!(diagnostics.summary.source_available);
        assert_eq!(diagnostics.summary.contour_count, 1);
        assert!(diagnostics.rasterize.is_some());

        let painting = classified.into_painting();
        assert_eq!(painting.silhouette.len(), 1);
        for cell in &painting.cells {
            let c = cell.centroid;
            let expected = (10.0..30.0).contains(&c.x) && (5.0..25.0).contains(&c.y);
            assert_eq!(cell.inside_silhouette, expected, "cell {}", cell.id);
        }
    }

    #[test]
    fn without_source_has_empty_silhouette() {
        let (painting, diagnostics) = Pipeline::without_source(params(5))
            .sample()
            .tessellate()
            .classify()
            .into_parts();
        assert!(painting.silhouette.is_empty());
        assert_eq!(painting.inside_count(), 0);
        assert!(!diagnostics.summary.source_available);
        assert!(diagnostics.rasterize.is_none());
        assert_eq!(diagnostics.summary.cell_count, painting.cells.len());
    }

    #[test]
    fn zero_complexity_is_normalized() {
        let painting = Pipeline::without_source(params(0))
            .sample()
            .tessellate()
            .classify()
            .into_painting();
        assert_eq!(painting.params.complexity, 1);
        assert_eq!(painting.cells.len(), 1);
    }

    #[test]
    fn trace_or_empty_falls_back() {
        let traced = Pipeline::new(vec![1, 2, 3], params(3)).trace_or_empty();
        assert!(traced.silhouette().is_empty());
        let classified = traced.sample().tessellate().classify();
        assert!(!classified.diagnostics().summary.source_available);
    }

    #[test]
    fn undecodable_source_fails_at_rasterize() {
        let result = Pipeline::new(vec![1, 2, 3], params(3)).rasterize();
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }
}
