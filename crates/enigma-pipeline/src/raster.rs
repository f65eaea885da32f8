//! Image decoding and resampling onto the fixed-size canvas.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGBA
//! raster of exactly the canvas dimensions, stretched like a 2D canvas
//! `drawImage` call. This is the first step in the pipeline and the only
//! one that can fail; callers treat a failure as "no silhouette".

use image::RgbaImage;
use image::imageops::FilterType;

use crate::types::{Dimensions, PipelineError};

/// Decode raw image bytes and resample them to `canvas`.
///
/// The source is stretched to fill the canvas (aspect ratio is not
/// preserved) with bilinear filtering, then composited over transparent
/// black so that fully transparent pixels read as RGB `(0, 0, 0)`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
/// Returns [`PipelineError::InvalidConfig`] if `canvas` has a zero side.
pub fn rasterize(bytes: &[u8], canvas: Dimensions) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PipelineError::InvalidConfig(format!(
            "canvas must be non-empty, got {}x{}",
            canvas.width, canvas.height
        )));
    }

    let decoded = image::load_from_memory(bytes)?;
    let rgba = if decoded.width() == canvas.width && decoded.height() == canvas.height {
        decoded.to_rgba8()
    } else {
        decoded
            .resize_exact(canvas.width, canvas.height, FilterType::Triangle)
            .to_rgba8()
    };
    Ok(composite_over_transparent_black(rgba))
}

/// Premultiply every pixel's colour by its alpha.
///
/// A drawing surface that starts out transparent black stores exactly
/// this after an image is drawn onto it.
#[allow(clippy::cast_possible_truncation)]
fn composite_over_transparent_black(mut image: RgbaImage) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let alpha = u16::from(pixel[3]);
        if alpha == 255 {
            continue;
        }
        for channel in &mut pixel.0[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
    image
}
