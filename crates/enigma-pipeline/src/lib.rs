//! enigma-pipeline: pure geometry core for paint-by-region puzzles (sans-IO).
//!
//! Turns an optional source image and a few parameters into a
//! [`Painting`]: a set of convex cells tiling the canvas, each labelled
//! inside or outside the image's dark silhouette.
//!
//! Two independent branches feed the final merge:
//!
//! - rasterize -> threshold -> trace contours (the silhouette)
//! - sample points -> bounded Voronoi tessellation (the cells)
//!
//! followed by centroid classification. Every stage is deterministic: the
//! same bytes and parameters always produce an identical painting.
//!
//! This crate does no file or network I/O. Image bytes come in as
//! slices; encoders for SVG, JSON, and raster previews live in
//! `enigma-export`.

pub mod classify;
pub mod contour;
pub mod diagnostics;
pub mod foreground;
pub mod path;
pub mod pipeline;
pub mod raster;
pub mod sampler;
pub mod session;
pub mod tessellate;
pub mod types;

pub use diagnostics::PipelineDiagnostics;
pub use foreground::ForegroundMask;
pub use path::{PathError, cell_path, contour_path, parse_contour, parse_path};
pub use pipeline::Pipeline;
pub use sampler::{Mulberry32, sample_points};
pub use session::{Session, SilhouetteJob, SilhouetteReady};
pub use types::{
    Cell, Contour, Dimensions, GenerationParams, GridPoint, Painting, PipelineError, Point,
    RgbaImage,
};

/// Run the full pipeline.
///
/// `source` is the encoded image (PNG, JPEG, BMP, WebP). When it is
/// `None`, empty, or cannot be decoded, the silhouette is empty and
/// every cell is classified outside; this is logged, not returned as an
/// error.
#[must_use]
pub fn process(source: Option<&[u8]>, params: &GenerationParams) -> Painting {
    process_with_diagnostics(source, params).0
}

/// Run the full pipeline and collect per-stage diagnostics.
#[must_use]
pub fn process_with_diagnostics(
    source: Option<&[u8]>,
    params: &GenerationParams,
) -> (Painting, PipelineDiagnostics) {
    let traced = match source {
        Some(bytes) => Pipeline::new(bytes, *params).trace_or_empty(),
        None => Pipeline::without_source(*params),
    };
    traced.sample().tessellate().classify().into_parts()
}

/// Rasterize, threshold, and trace a source image.
///
/// # Errors
///
/// Returns the rasterizer's error if the image cannot be read. Use
/// [`process`] to get the empty-silhouette fallback instead.
pub fn extract_silhouette(
    bytes: &[u8],
    params: &GenerationParams,
) -> Result<Vec<Contour>, PipelineError> {
    Ok(Pipeline::new(bytes, *params)
        .rasterize()?
        .threshold()
        .trace()
        .into_silhouette())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(complexity: u32) -> GenerationParams {
        GenerationParams {
            seed: 5,
            complexity,
            threshold: 130,
            canvas: Dimensions {
                width: 64,
                height: 48,
            },
        }
    }

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn process_without_source() {
        let painting = process(None, &params(20));
        assert!(painting.silhouette.is_empty());
        assert!(painting.cells.len() <= 20);
        assert!(!painting.cells.is_empty());
        assert!(painting.cells.iter().all(|c| !c.inside_silhouette));
    }

    #[test]
    fn process_with_corrupt_source_degrades() {
        let painting = process(Some([0xde, 0xad].as_slice()), &params(20));
        assert!(painting.silhouette.is_empty());
        assert_eq!(painting, process(None, &params(20)));
    }

    #[test]
    fn process_with_empty_source_degrades() {
        let painting = process(Some([].as_slice()), &params(4));
        assert!(painting.silhouette.is_empty());
    }

    #[test]
    fn extract_silhouette_surfaces_errors() {
        assert!(matches!(
            extract_silhouette(&[], &params(1)),
            Err(PipelineError::EmptyInput)
        ));
    }

    #[test]
    fn source_is_resampled_to_canvas() {
        // A small all-dark image stretches over the whole canvas.
        let dark = RgbaImage::from_pixel(5, 7, image::Rgba([10, 10, 10, 255]));
        let silhouette = extract_silhouette(&png(&dark), &params(1)).unwrap();
        assert_eq!(
            silhouette,
            vec![Contour::new(vec![
                GridPoint::new(0, 0),
                GridPoint::new(0, 48),
                GridPoint::new(64, 48),
                GridPoint::new(64, 0),
            ])]
        );
    }

    #[test]
    fn diagnostics_match_painting() {
        let dark = RgbaImage::from_pixel(64, 48, image::Rgba([0, 0, 0, 255]));
        let (painting, diagnostics) =
            process_with_diagnostics(Some(png(&dark).as_slice()), &params(30));
        assert_eq!(diagnostics.summary.cell_count, painting.cells.len());
        assert_eq!(diagnostics.summary.inside_count, painting.inside_count());
        assert_eq!(diagnostics.summary.contour_count, 1);
        assert!(diagnostics.summary.source_available);
    }

    #[test]
    fn threshold_raises_silhouette_coverage() {
        // Horizontal gradient: darker on the left.
        let gradient = RgbaImage::from_fn(64, 48, |x, _| {
            let v = u8::try_from(x * 4).unwrap();
            image::Rgba([v, v, v, 255])
        });
        let bytes = png(&gradient);
        let mut previous = 0;
        for threshold in [0, 40, 80, 160, 255] {
            let p = GenerationParams {
                threshold,
                ..params(60)
            };
            let inside = process(Some(bytes.as_slice()), &p).inside_count();
            assert!(inside >= previous, "threshold {threshold}: {inside} < {previous}");
            previous = inside;
        }
    }
}
