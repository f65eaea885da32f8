//! Interactive regeneration with last-writer-wins silhouette updates.
//!
//! Rasterizing a new source (or re-thresholding it) is the only slow
//! step, so it is handed out as a [`SilhouetteJob`] that can run on any
//! thread. Every change to the source or threshold bumps a generation
//! counter; [`Session::apply`] installs a finished job only if its
//! generation is still the latest, so an old image that finishes decoding
//! late can never overwrite a newer one.
//!
//! Seed and complexity changes only affect the tessellation and are
//! recomputed synchronously against the current silhouette.

use std::sync::Arc;

use log::debug;

use crate::pipeline::Pipeline;
use crate::types::{Contour, GenerationParams, Painting, clamp_complexity, clamp_threshold};

/// Owns the current inputs and the painting derived from them.
#[derive(Debug, Clone)]
pub struct Session {
    params: GenerationParams,
    source: Option<Arc<[u8]>>,
    generation: u64,
    painting: Painting,
}

impl Session {
    /// Start a session with no source image.
    #[must_use]
    pub fn new(params: GenerationParams) -> Self {
        let params = params.normalized();
        Self {
            params,
            source: None,
            generation: 0,
            painting: build(params, Vec::new()),
        }
    }

    /// Current parameters, including changes whose silhouette is still
    /// pending.
    #[must_use]
    pub const fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// The most recently installed painting.
    #[must_use]
    pub const fn painting(&self) -> &Painting {
        &self.painting
    }

    /// Generation of the latest source/threshold change.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The current source bytes, if any.
    #[must_use]
    pub fn source(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    /// Replace the source image. Any job still in flight becomes stale.
    pub fn set_source(&mut self, bytes: impl Into<Arc<[u8]>>) -> SilhouetteJob {
        let source: Arc<[u8]> = bytes.into();
        self.source = Some(Arc::clone(&source));
        self.next_job(source)
    }

    /// Drop the source image; the silhouette becomes empty immediately.
    pub fn clear_source(&mut self) {
        self.source = None;
        self.generation += 1;
        self.painting = build(self.params, Vec::new());
    }

    /// Change the threshold (clamped to `0..=255`).
    ///
    /// Returns a job to re-trace the silhouette when a source is loaded.
    /// Without a source the silhouette is empty at any threshold, so the
    /// change is applied directly.
    pub fn set_threshold(&mut self, raw: i64) -> Option<SilhouetteJob> {
        self.params.threshold = clamp_threshold(raw);
        match self.source.clone() {
            Some(source) => Some(self.next_job(source)),
            None => {
                self.generation += 1;
                self.painting.params.threshold = self.params.threshold;
                None
            }
        }
    }

    /// Change the seed and rebuild the cells synchronously.
    pub fn set_seed(&mut self, seed: i64) {
        self.params.seed = seed;
        self.rebuild_cells();
    }

    /// Change the complexity (clamped to at least 1) and rebuild the
    /// cells synchronously.
    pub fn set_complexity(&mut self, raw: i64) {
        self.params.complexity = clamp_complexity(raw);
        self.rebuild_cells();
    }

    /// Install a finished silhouette if it is still current.
    ///
    /// Returns `false` (and changes nothing) for a stale result.
    pub fn apply(&mut self, ready: SilhouetteReady) -> bool {
        if ready.generation != self.generation {
            debug!(
                "discarding stale silhouette from generation {} (current {})",
                ready.generation, self.generation
            );
            return false;
        }
        let params = GenerationParams {
            threshold: ready.threshold,
            ..self.params
        };
        self.painting = build(params, ready.silhouette);
        true
    }

    fn next_job(&mut self, source: Arc<[u8]>) -> SilhouetteJob {
        self.generation += 1;
        SilhouetteJob {
            generation: self.generation,
            source,
            params: self.params,
        }
    }

    fn rebuild_cells(&mut self) {
        // Keep the threshold the installed silhouette was traced at.
        let params = GenerationParams {
            threshold: self.painting.params.threshold,
            ..self.params
        };
        let silhouette = std::mem::take(&mut self.painting.silhouette);
        self.painting = build(params, silhouette);
    }
}

fn build(params: GenerationParams, silhouette: Vec<Contour>) -> Painting {
    Pipeline::with_silhouette(params, silhouette)
        .sample()
        .tessellate()
        .classify()
        .into_painting()
}

/// A pending silhouette computation for one generation.
#[derive(Debug, Clone)]
#[must_use = "a silhouette job does nothing until it is run and applied"]
pub struct SilhouetteJob {
    generation: u64,
    source: Arc<[u8]>,
    params: GenerationParams,
}

impl SilhouetteJob {
    /// The generation this job was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Rasterize, threshold, and trace the source.
    ///
    /// An unreadable source yields an empty silhouette.
    pub fn run(self) -> SilhouetteReady {
        let silhouette = Pipeline::new(self.source, self.params)
            .trace_or_empty()
            .into_silhouette();
        SilhouetteReady {
            generation: self.generation,
            threshold: self.params.threshold,
            silhouette,
        }
    }
}

/// The output of a [`SilhouetteJob`], ready for [`Session::apply`].
#[derive(Debug, Clone)]
pub struct SilhouetteReady {
    generation: u64,
    threshold: u8,
    silhouette: Vec<Contour>,
}

impl SilhouetteReady {
    /// The generation the job was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The traced contours.
    #[must_use]
    pub fn silhouette(&self) -> &[Contour] {
        &self.silhouette
    }
}
