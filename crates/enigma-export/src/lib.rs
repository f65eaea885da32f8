//! enigma-export: Pure format serializers for paintings (sans-IO)
//!
//! Converts a [`Painting`](enigma_pipeline::Painting) into output
//! formats: an SVG document, a structured JSON document, and a raster
//! preview. Every function here is pure and returns an in-memory value.

pub mod json;
pub mod preview;
pub mod svg;

use serde::{Deserialize, Serialize};

pub use json::{DocumentParams, PaintingDocument, ShapeRecord, to_json};
pub use preview::render_preview;
pub use svg::{SvgMetadata, to_svg};

/// Stroke for cell edges in colour mode.
pub const CELL_STROKE: &str = "#9a7b00";
/// Stroke for cell edges in monochrome mode.
pub const MONOCHROME_STROKE: &str = "#000";
/// Stroke for silhouette outlines.
pub const OUTLINE_STROKE: &str = "darkgoldenrod";
/// Fill for cell number labels.
pub const LABEL_FILL: &str = "#111";

/// Display options. These never affect geometry, only how the encoders
/// draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Fill cells with the brass palette; otherwise draw black outlines
    /// only.
    pub color_mode: bool,
    /// Draw the silhouette contours on top of the cells.
    pub show_outline: bool,
    /// Draw each cell's number at its centroid (SVG only).
    pub show_numbers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            color_mode: true,
            show_outline: true,
            show_numbers: true,
        }
    }
}

/// Errors from the export encoders.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// JSON serialization failed.
    #[error("failed to serialize painting: {0}")]
    Json(#[from] serde_json::Error),

    /// The preview canvas could not be allocated.
    #[error("cannot allocate a {width}x{height} preview")]
    PreviewSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Colour-mode fill of a cell, as HSL with integer components.
///
/// Hue cycles over 5 values from 45 and lightness over 4 values from 45%
/// in steps of 2, keyed on the cell id, so neighbouring ids differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellColor {
    /// Hue in degrees.
    pub hue: u32,
    /// Saturation in percent.
    pub saturation: u32,
    /// Lightness in percent.
    pub lightness: u32,
}

impl CellColor {
    /// The colour for cell `id`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn for_cell(id: usize) -> Self {
        Self {
            hue: 45 + (id % 5) as u32,
            saturation: 80,
            lightness: 45 + (id % 4) as u32 * 2,
        }
    }

    /// CSS functional notation, e.g. `hsl(47,80%,51%)`.
    #[must_use]
    pub fn css(self) -> String {
        format!("hsl({},{}%,{}%)", self.hue, self.saturation, self.lightness)
    }

    /// Convert to 8-bit sRGB.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb(self) -> [u8; 3] {
        let h = f64::from(self.hue % 360) / 60.0;
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let chroma = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}
