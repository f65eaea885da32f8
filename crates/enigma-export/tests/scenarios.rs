//! End-to-end scenarios: image bytes through the pipeline into every
//! export format.

#![allow(clippy::unwrap_used)]

use enigma_export::{ExportOptions, PaintingDocument, SvgMetadata, render_preview, to_json, to_svg};
use enigma_pipeline::{Dimensions, GenerationParams, process};
use image::{ImageFormat, Rgba, RgbaImage};

fn png(fill: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(800, 800, Rgba(fill));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn reference_params() -> GenerationParams {
    GenerationParams {
        seed: 7,
        complexity: 150,
        threshold: 130,
        canvas: Dimensions::CANVAS,
    }
}

#[test]
fn all_black_source_is_one_canvas_contour() {
    let painting = process(Some(png([0, 0, 0, 255]).as_slice()), &reference_params());
    let doc = PaintingDocument::from_painting(&painting);

    assert_eq!(doc.silhouette_paths, vec!["M 0 0 L 0 800 L 800 800 L 800 0 Z"]);
    assert_eq!(doc.shapes.len(), 150);
    assert!(doc.shapes.iter().all(|s| s.inside_silhouette && s.region_id == 1));
}

#[test]
fn all_white_source_has_no_silhouette() {
    for threshold in [0, 130, 255] {
        let params = GenerationParams {
            threshold,
            ..reference_params()
        };
        let painting = process(Some(png([255, 255, 255, 255]).as_slice()), &params);
        let doc = PaintingDocument::from_painting(&painting);
        assert!(doc.silhouette_paths.is_empty(), "threshold {threshold}");
        assert!(doc.shapes.iter().all(|s| !s.inside_silhouette && s.region_id == 0));
    }
}

#[test]
fn single_sample_covers_the_canvas() {
    let params = GenerationParams {
        complexity: 1,
        ..reference_params()
    };
    let painting = process(None, &params);
    let doc = PaintingDocument::from_painting(&painting);
    assert_eq!(doc.shapes.len(), 1);
    assert_eq!(
        doc.shapes[0].path,
        "M 0.0 0.0 L 800.0 0.0 L 800.0 800.0 L 0.0 800.0 Z"
    );
    assert_eq!(doc.shapes[0].center, [400.0, 400.0]);
    assert_eq!(doc.shapes[0].number, 1);
}

#[test]
fn identical_inputs_give_identical_exports() {
    let bytes = png([40, 40, 40, 255]);
    let a = process(Some(bytes.as_slice()), &reference_params());
    let b = process(Some(bytes.as_slice()), &reference_params());
    assert_eq!(to_json(&a).unwrap(), to_json(&b).unwrap());

    let options = ExportOptions::default();
    let meta = SvgMetadata::default();
    assert_eq!(to_svg(&a, &options, &meta), to_svg(&b, &options, &meta));
}

#[test]
fn reference_seed_is_stable() {
    let painting = process(None, &reference_params());
    let doc = PaintingDocument::from_painting(&painting);
    assert_eq!(doc.painting_id, "key_7");
    assert_eq!(doc.dimensions, [800, 800]);
    assert_eq!(doc.shapes.len(), 150);

    let first = &doc.shapes[0];
    assert!((first.center[0] - 20.823_968_047_775_494).abs() < 1e-6);
    assert!((first.center[1] - 83.281_084_969_207_09).abs() < 1e-6);
    for (i, shape) in doc.shapes.iter().enumerate() {
        assert_eq!(shape.id, i);
        assert_eq!(shape.number, i + 1);
    }
}

#[test]
fn undecodable_source_exports_like_no_source() {
    let broken = process(Some(b"not an image".as_slice()), &reference_params());
    let missing = process(None, &reference_params());
    assert_eq!(to_json(&broken).unwrap(), to_json(&missing).unwrap());
}

#[test]
fn svg_for_dark_source() {
    let painting = process(Some(png([0, 0, 0, 255]).as_slice()), &reference_params());
    let svg = to_svg(&painting, &ExportOptions::default(), &SvgMetadata::default());
    assert!(svg.contains(r#"viewBox="0 0 800 800""#));
    // 1 clip path + 150 cells + 1 outline.
    assert_eq!(svg.matches("<path").count(), 152);
    assert_eq!(svg.matches("<text").count(), 150);
    assert!(svg.contains(">150</text>"));
}

#[test]
fn preview_for_dark_source_is_fully_painted() {
    let painting = process(Some(png([0, 0, 0, 255]).as_slice()), &reference_params());
    let options = ExportOptions {
        show_outline: false,
        ..ExportOptions::default()
    };
    let img = render_preview(&painting, &options).unwrap();
    assert_eq!(img.dimensions(), (800, 800));
    // The silhouette covers the canvas, so no background shows through.
    let white = img
        .pixels()
        .filter(|p| p.0 == [255, 255, 255, 255])
        .count();
    assert_eq!(white, 0);
}
