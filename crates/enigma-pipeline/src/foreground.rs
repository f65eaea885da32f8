//! Luminance thresholding: which raster pixels belong to the silhouette.

use image::{Rgba, RgbaImage};

/// Perceived luminance of a pixel: `0.299*R + 0.587*G + 0.114*B`.
///
/// Alpha is ignored; the rasterizer has already composited it away.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn luminance(pixel: Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    // Unfused, left to right: pixels exactly at a threshold must land on
    // the same side in every implementation.
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Binary foreground map of a raster at one threshold.
///
/// A pixel is "on" iff its luminance is strictly below the threshold,
/// so threshold 0 selects nothing and raising the threshold never
/// removes a pixel. Coordinates outside the raster read as "off".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    width: u32,
    height: u32,
    on: Vec<bool>,
}

impl ForegroundMask {
    /// Threshold `raster` at `threshold`.
    #[must_use]
    pub fn from_raster(raster: &RgbaImage, threshold: u8) -> Self {
        let limit = f64::from(threshold);
        Self {
            width: raster.width(),
            height: raster.height(),
            on: raster.pixels().map(|p| luminance(*p) < limit).collect(),
        }
    }

    /// Build a mask directly from rows of booleans (row-major).
    ///
    /// Returns `None` if the rows are ragged.
    #[must_use]
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width: u32::try_from(width).ok()?,
            height: u32::try_from(rows.len()).ok()?,
            on: rows.iter().flatten().copied().collect(),
        })
    }

    /// Mask width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether pixel `(x, y)` is foreground. Out-of-range pixels are off.
    #[must_use]
    pub fn is_on(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        usize::try_from(y * i64::from(self.width) + x)
            .ok()
            .and_then(|i| self.on.get(i).copied())
            .unwrap_or(false)
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.on.iter().filter(|&&on| on).count()
    }
}
