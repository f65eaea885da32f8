//! Bounded Voronoi tessellation of the canvas.
//!
//! Each sample point owns the convex region of the canvas closer to it
//! than to any other sample. The Delaunay triangulation supplies each
//! site's natural neighbours; the canvas rectangle is then cut by the
//! perpendicular-bisector half-plane of every neighbour.
//!
//! Half-planes are closed: a point equidistant from two sites belongs to
//! both cells' boundaries. Coincident sites share a single triangulation
//! vertex and therefore an identical cell.

use std::collections::HashMap;

use log::{debug, warn};
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::types::{Cell, Dimensions, Point};

/// Vertices closer than this are merged after clipping.
const VERTEX_EPSILON: f64 = 1e-9;

/// Build one cell per sample point, clipped to `canvas`.
///
/// Cells are returned in sample order with `inside_silhouette` unset.
/// Degenerate cells (fewer than three distinct vertices) and points the
/// triangulation rejects are omitted, so the result may be shorter than
/// `points`.
#[must_use]
pub fn tessellate(points: &[Point], canvas: Dimensions) -> Vec<Cell> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut handles: Vec<Option<FixedVertexHandle>> = Vec::with_capacity(points.len());
    let mut owner: HashMap<FixedVertexHandle, usize> = HashMap::with_capacity(points.len());

    for (id, p) in points.iter().enumerate() {
        match triangulation.insert(Point2::new(p.x, p.y)) {
            Ok(handle) => {
                owner.entry(handle).or_insert(id);
                handles.push(Some(handle));
            }
            Err(e) => {
                warn!("sample {id} at ({}, {}) rejected: {e:?}", p.x, p.y);
                handles.push(None);
            }
        }
    }

    let bounds = canvas_rectangle(canvas);
    let cells: Vec<Cell> = handles
        .iter()
        .enumerate()
        .filter_map(|(id, handle)| {
            let handle = (*handle)?;
            let vertex = triangulation.vertex(handle);
            let site = vertex.position();

            let mut neighbours: Vec<(usize, Point2<f64>)> = vertex
                .out_edges()
                .map(|edge| {
                    let to = edge.to();
                    (owner.get(&to.fix()).copied().unwrap_or(usize::MAX), to.position())
                })
                .collect();
            neighbours.sort_by_key(|&(index, _)| index);

            let mut polygon = bounds.clone();
            for (_, neighbour) in neighbours {
                polygon = clip_to_bisector(&polygon, site, neighbour);
                if polygon.is_empty() {
                    break;
                }
            }
            let polygon = dedup_vertices(polygon);
            if polygon.len() < 3 {
                return None;
            }
            Some(Cell {
                id,
                centroid: vertex_mean(&polygon),
                polygon,
                inside_silhouette: false,
            })
        })
        .collect();

    debug!(
        "tessellated {} sites into {} cells ({} vertices in triangulation)",
        points.len(),
        cells.len(),
        triangulation.num_vertices()
    );
    cells
}

fn canvas_rectangle(canvas: Dimensions) -> Vec<Point> {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    vec![
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
}

/// Sutherland-Hodgman step against the half-plane of points at least as
/// close to `site` as to `neighbour`.
fn clip_to_bisector(polygon: &[Point], site: Point2<f64>, neighbour: Point2<f64>) -> Vec<Point> {
    let a = neighbour.x - site.x;
    let b = neighbour.y - site.y;
    let c = (neighbour.x * neighbour.x + neighbour.y * neighbour.y
        - site.x * site.x
        - site.y * site.y)
        / 2.0;
    let side = |p: Point| a.mul_add(p.x, b * p.y) - c;

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        let fp = side(p);
        let fq = side(q);
        if fp <= 0.0 {
            out.push(p);
        }
        if (fp < 0.0 && fq > 0.0) || (fp > 0.0 && fq < 0.0) {
            let t = fp / (fp - fq);
            out.push(Point::new(
                t.mul_add(q.x - p.x, p.x),
                t.mul_add(q.y - p.y, p.y),
            ));
        }
    }
    out
}

/// Drop consecutive (and wrap-around) near-duplicate vertices.
fn dedup_vertices(mut polygon: Vec<Point>) -> Vec<Point> {
    let eps2 = VERTEX_EPSILON * VERTEX_EPSILON;
    polygon.dedup_by(|b, a| a.distance_squared(*b) <= eps2);
    while polygon.len() > 1 {
        let (Some(&first), Some(&last)) = (polygon.first(), polygon.last()) else {
            break;
        };
        if first.distance_squared(last) > eps2 {
            break;
        }
        polygon.pop();
    }
    polygon
}

/// Arithmetic mean of a polygon's vertices.
#[allow(clippy::cast_precision_loss)]
fn vertex_mean(polygon: &[Point]) -> Point {
    let n = polygon.len() as f64;
    let (sx, sy) = polygon
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_points;

    fn area(polygon: &[Point]) -> f64 {
        let twice: f64 = polygon
            .iter()
            .zip(polygon.iter().cycle().skip(1))
            .map(|(p, q)| p.x * q.y - q.x * p.y)
            .sum();
        (twice / 2.0).abs()
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn single_point_fills_canvas() {
        let cells = tessellate(&[Point::new(123.0, 456.0)], Dimensions::CANVAS);
        assert_eq!(cells.len(), 1);
        assert_eq!(
            cells[0].polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(800.0, 0.0),
                Point::new(800.0, 800.0),
                Point::new(0.0, 800.0),
            ]
        );
        assert!(close(cells[0].centroid, Point::new(400.0, 400.0)));
    }

    #[test]
    fn two_points_split_at_bisector() {
        let cells = tessellate(
            &[Point::new(200.0, 400.0), Point::new(600.0, 400.0)],
            Dimensions::CANVAS,
        );
        assert_eq!(cells.len(), 2);
        for p in &cells[0].polygon {
            assert!(p.x <= 400.0 + 1e-9);
        }
        for p in &cells[1].polygon {
            assert!(p.x >= 400.0 - 1e-9);
        }
        assert!((area(&cells[0].polygon) - 320_000.0).abs() < 1e-6);
        assert!((area(&cells[1].polygon) - 320_000.0).abs() < 1e-6);
    }

    #[test]
    fn duplicate_points_share_a_cell() {
        let points = [
            Point::new(100.0, 100.0),
            Point::new(700.0, 700.0),
            Point::new(100.0, 100.0),
        ];
        let cells = tessellate(&points, Dimensions::CANVAS);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].polygon, cells[2].polygon);
        assert_eq!(cells[2].id, 2);
    }

    #[test]
    fn collinear_points_make_strips() {
        let points: Vec<Point> = (0..5)
            .map(|i| Point::new(80.0 + 160.0 * f64::from(i), 400.0))
            .collect();
        let cells = tessellate(&points, Dimensions::CANVAS);
        assert_eq!(cells.len(), 5);
        let total: f64 = cells.iter().map(|c| area(&c.polygon)).sum();
        assert!((total - 640_000.0).abs() < 1e-6);
    }

    #[test]
    fn seed_7_partitions_the_canvas() {
        let points = sample_points(7, 150, Dimensions::CANVAS);
        let cells = tessellate(&points, Dimensions::CANVAS);
        assert_eq!(cells.len(), 150);

        let total: f64 = cells.iter().map(|c| area(&c.polygon)).sum();
        assert!((total - 640_000.0).abs() < 1e-4, "total area {total}");

        for cell in &cells {
            assert!(cell.polygon.len() >= 3);
            for p in &cell.polygon {
                assert!((0.0..=800.0).contains(&p.x) && (0.0..=800.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn seed_7_first_cell_is_pinned() {
        let points = sample_points(7, 150, Dimensions::CANVAS);
        let cells = tessellate(&points, Dimensions::CANVAS);
        let expected = [
            Point::new(31.008_416_891_018_2, 127.701_532_367_097_33),
            Point::new(0.0, 138.835_630_122_856_63),
            Point::new(0.0, 34.942_818_254_175_62),
            Point::new(52.287_455_300_083_77, 31.644_359_132_698_767),
        ];
        assert_eq!(cells[0].polygon.len(), expected.len());
        for e in expected {
            assert!(
                cells[0].polygon.iter().any(|p| close(*p, e)),
                "missing vertex {e:?} in {:?}",
                cells[0].polygon
            );
        }
        assert!(close(
            cells[0].centroid,
            Point::new(20.823_968_047_775_494, 83.281_084_969_207_09)
        ));
    }

    #[test]
    fn cell_count_never_exceeds_sample_count() {
        for complexity in [1, 2, 3, 17, 64] {
            let points = sample_points(3, complexity, Dimensions::CANVAS);
            let cells = tessellate(&points, Dimensions::CANVAS);
            assert!(cells.len() <= points.len());
        }
    }

    #[test]
    fn rejected_points_are_skipped() {
        let points = [Point::new(f64::NAN, 10.0), Point::new(400.0, 400.0)];
        let cells = tessellate(&points, Dimensions::CANVAS);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].id, 1);
    }

    #[test]
    fn dedup_removes_wraparound_duplicate() {
        let polygon = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(dedup_vertices(polygon).len(), 3);
    }
}
