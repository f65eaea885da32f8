//! Inside/outside labelling of cells against the silhouette.

use crate::types::{Cell, Contour, Point};

/// Even-odd ray cast of `point` against one closed vertex list.
///
/// Casts a ray towards +x and counts edge crossings. Points exactly on a
/// horizontal edge are resolved by the half-open `(yi > y) != (yj > y)`
/// rule, so shared edges are never counted twice.
#[must_use]
pub fn point_in_contour(point: Point, contour: &Contour) -> bool {
    let vertices = contour.points();
    let Some(&last) = vertices.last() else {
        return false;
    };

    let mut inside = false;
    let mut j: Point = last.into();
    for &v in vertices {
        let i: Point = v.into();
        if (i.y > point.y) != (j.y > point.y) {
            let x_cross = (j.x - i.x) * (point.y - i.y) / (j.y - i.y) + i.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `point` lies inside any contour.
///
/// Contours are tested independently, so a point inside a hole contour
/// still counts as inside.
#[must_use]
pub fn point_in_silhouette(point: Point, silhouette: &[Contour]) -> bool {
    silhouette.iter().any(|c| point_in_contour(point, c))
}

/// Label every cell by testing its centroid against the silhouette.
pub fn classify(cells: &mut [Cell], silhouette: &[Contour]) {
    for cell in cells {
        cell.inside_silhouette = point_in_silhouette(cell.centroid, silhouette);
    }
}
