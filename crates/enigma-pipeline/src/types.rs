//! Shared types for the enigma geometry pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference the
/// rasterized source without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }
}

/// A lattice point on the pixel-corner grid.
///
/// `(0, 0)` is the top-left corner of the top-left pixel and
/// `(width, height)` the bottom-right corner of the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column of the lattice point.
    pub x: u32,
    /// Row of the lattice point.
    pub y: u32,
}

impl GridPoint {
    /// Create a new lattice point.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<GridPoint> for Point {
    fn from(p: GridPoint) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// One closed boundary of the thresholded silhouette.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Contours produced by the tracer always hold at least three vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour(Vec<GridPoint>);

impl Contour {
    /// Create a contour from its vertex list.
    #[must_use]
    pub const fn new(points: Vec<GridPoint>) -> Self {
        Self(points)
    }

    /// Number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the contour has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The vertices in traversal order.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.0
    }

    /// Consumes the contour and returns its vertices.
    #[must_use]
    pub fn into_points(self) -> Vec<GridPoint> {
        self.0
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// The default 800x800 canvas.
    pub const CANVAS: Self = Self {
        width: 800,
        height: 800,
    };
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::CANVAS
    }
}

/// Parameters that fully determine a painting's geometry.
///
/// Display options (colour, outlines, labels) are deliberately absent:
/// they live with the export encoders and never influence geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Seed for the deterministic point sampler.
    pub seed: i64,
    /// Number of sample points (one cell per point). Always at least 1.
    pub complexity: u32,
    /// Luminance threshold; pixels strictly darker are foreground.
    pub threshold: u8,
    /// Canvas the source image is resampled into and cells are clipped to.
    #[serde(default)]
    pub canvas: Dimensions,
}

impl GenerationParams {
    /// Default sampler seed.
    pub const DEFAULT_SEED: i64 = 7;
    /// Default number of cells.
    pub const DEFAULT_COMPLEXITY: u32 = 150;
    /// Default luminance threshold.
    pub const DEFAULT_THRESHOLD: u8 = 130;

    /// Build parameters from unchecked user input.
    ///
    /// `threshold` is clamped to `0..=255` and `complexity` to at least 1.
    #[must_use]
    pub fn clamped(seed: i64, complexity: i64, threshold: i64, canvas: Dimensions) -> Self {
        Self {
            seed,
            complexity: clamp_complexity(complexity),
            threshold: clamp_threshold(threshold),
            canvas,
        }
    }

    /// Re-apply the clamping rules to a value that may have been
    /// deserialized from untrusted input.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            complexity: self.complexity.max(1),
            ..self
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            complexity: Self::DEFAULT_COMPLEXITY,
            threshold: Self::DEFAULT_THRESHOLD,
            canvas: Dimensions::CANVAS,
        }
    }
}

/// Clamp a raw threshold into the valid luminance range.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_threshold(raw: i64) -> u8 {
    if raw < 0 {
        0
    } else if raw > 255 {
        255
    } else {
        raw as u8
    }
}

/// Clamp a raw complexity to at least one cell.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_complexity(raw: i64) -> u32 {
    if raw < 1 {
        1
    } else if raw > u32::MAX as i64 {
        u32::MAX
    } else {
        raw as u32
    }
}

/// One region of the tessellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Index of the sample point this cell was grown from.
    pub id: usize,
    /// Convex polygon, at least three vertices, inside the canvas.
    pub polygon: Vec<Point>,
    /// Arithmetic mean of the polygon vertices.
    pub centroid: Point,
    /// Whether the centroid falls inside any silhouette contour.
    pub inside_silhouette: bool,
}

impl Cell {
    /// 1-based display number.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.id + 1
    }

    /// Binary region label: 1 inside the silhouette, 0 outside.
    #[must_use]
    pub const fn region_id(&self) -> u8 {
        if self.inside_silhouette { 1 } else { 0 }
    }
}

/// The merged pipeline result consumed by exporters and the puzzle layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    /// Parameters the painting was generated from.
    pub params: GenerationParams,
    /// Silhouette contours in grid coordinates. Empty when no source
    /// image was available.
    pub silhouette: Vec<Contour>,
    /// Surviving tessellation cells in id order.
    pub cells: Vec<Cell>,
}

impl Painting {
    /// Canvas dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.params.canvas
    }

    /// Number of cells classified inside the silhouette.
    #[must_use]
    pub fn inside_count(&self) -> usize {
        self.cells.iter().filter(|c| c.inside_silhouette).count()
    }
}

/// Errors that can occur while producing a raster from a source image.
///
/// The pipeline never surfaces these to its callers as failures: an
/// unavailable raster collapses to an empty silhouette.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
