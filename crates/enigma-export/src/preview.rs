//! Raster preview of a painting.
//!
//! Renders the same picture as the SVG export (cells clipped to the
//! silhouette, optional outlines) into an [`RgbaImage`] with `tiny-skia`.
//! Number labels are not drawn; use the SVG for a labelled sheet.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, FillRule, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use enigma_pipeline::{Contour, Painting, Point};

use crate::{CellColor, ExportError, ExportOptions};

/// `darkgoldenrod`.
const OUTLINE_RGB: [u8; 3] = [184, 134, 11];
/// `#9a7b00`.
const CELL_STROKE_RGB: [u8; 3] = [0x9a, 0x7b, 0x00];

/// Render `painting` onto a white canvas of its own dimensions.
///
/// # Errors
///
/// Returns [`ExportError::PreviewSize`] if the canvas has a zero side or
/// is too large to allocate.
pub fn render_preview(painting: &Painting, options: &ExportOptions) -> Result<RgbaImage, ExportError> {
    let dims = painting.dimensions();
    let size_error = || ExportError::PreviewSize {
        width: dims.width,
        height: dims.height,
    };

    let mut canvas = Pixmap::new(dims.width, dims.height).ok_or_else(size_error)?;
    canvas.fill(Color::WHITE);

    let mut cells = Pixmap::new(dims.width, dims.height).ok_or_else(size_error)?;
    draw_cells(&mut cells, painting, options);

    let mut clip = Mask::new(dims.width, dims.height).ok_or_else(size_error)?;
    for contour in &painting.silhouette {
        if let Some(path) = contour_path(contour) {
            // Each contour is filled on its own, so holes stay covered.
            clip.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
    }
    canvas.draw_pixmap(
        0,
        0,
        cells.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        Some(&clip),
    );

    if options.show_outline {
        let paint = solid(OUTLINE_RGB);
        let stroke = Stroke {
            width: 1.2,
            line_join: LineJoin::Miter,
            ..Stroke::default()
        };
        for contour in &painting.silhouette {
            if let Some(path) = contour_path(contour) {
                canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    Ok(to_rgba_image(&canvas))
}

fn draw_cells(pixmap: &mut Pixmap, painting: &Painting, options: &ExportOptions) {
    let (stroke_rgb, stroke_width) = if options.color_mode {
        (CELL_STROKE_RGB, 0.5)
    } else {
        ([0, 0, 0], 1.0)
    };
    let stroke_paint = solid(stroke_rgb);
    let stroke = Stroke {
        width: stroke_width,
        ..Stroke::default()
    };

    for cell in &painting.cells {
        let Some(path) = polygon_path(cell.polygon.iter().copied()) else {
            continue;
        };
        if options.color_mode {
            let fill = solid(CellColor::for_cell(cell.id).to_rgb());
            pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        }
        pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
    }
}

fn contour_path(contour: &Contour) -> Option<tiny_skia::Path> {
    polygon_path(contour.points().iter().map(|&p| Point::from(p)))
}

/// Closed path through `points`; `None` when degenerate.
#[allow(clippy::cast_possible_truncation)]
fn polygon_path(mut points: impl Iterator<Item = Point>) -> Option<tiny_skia::Path> {
    let first = points.next()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in points {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

fn solid([r, g, b]: [u8; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    paint
}

/// Convert a premultiplied pixmap into a straight-alpha image.
#[allow(clippy::cast_possible_truncation)]
fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap.data();
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(data.chunks_exact(4)) {
        let a = src[3];
        *pixel = if a == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            let un = |c: u8| (u16::from(c) * 255 / u16::from(a)) as u8;
            Rgba([un(src[0]), un(src[1]), un(src[2]), a])
        };
    }
    img
}
