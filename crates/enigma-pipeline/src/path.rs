//! Vector path descriptors for contours and cells.
//!
//! Both use the same shape: `M x0 y0 L x1 y1 ... Z`, space separated.
//! Contours carry integer lattice coordinates and serialize losslessly;
//! cells are rounded to one decimal place for compact export.
//!
//! Parsing goes through the [`svg`] crate's path-data parser, so any
//! well-formed move/line/close sequence is accepted (commas, implicit
//! line-to after a move, relative commands).

use std::fmt::Write;

use svg::node::element::path::{Command, Data, Position};

use crate::types::{Contour, GridPoint, Point};

/// Errors from parsing a path descriptor.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The path data is not valid SVG path syntax.
    #[error("malformed path data: {0}")]
    Syntax(String),

    /// The path uses a command other than move, line, or close.
    #[error("unsupported path command in {0:?}")]
    UnsupportedCommand(String),

    /// A contour coordinate is negative or fractional.
    #[error("contour coordinate {0} is not a non-negative integer")]
    NotOnGrid(f64),

    /// Fewer than three vertices were found.
    #[error("path has {0} vertices, a closed polygon needs at least 3")]
    TooFewVertices(usize),
}

/// Serialize a contour as `M x y L x y ... Z`.
///
/// Returns an empty string for an empty contour.
#[must_use]
pub fn contour_path(contour: &Contour) -> String {
    let mut out = String::new();
    for (i, p) in contour.points().iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(out, "{cmd} {} {}", p.x, p.y);
    }
    if !out.is_empty() {
        out.push_str(" Z");
    }
    out
}

/// Serialize a cell polygon as `M x.x y.y L x.x y.y ... Z`.
///
/// Returns an empty string for an empty polygon.
#[must_use]
pub fn cell_path(polygon: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in polygon.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(out, "{cmd} {:.1} {:.1}", p.x, p.y);
    }
    if !out.is_empty() {
        out.push_str(" Z");
    }
    out
}

/// Parse a move/line/close path into its vertex list.
///
/// Relative coordinates are resolved against the current point. A
/// trailing close command does not repeat the first vertex.
///
/// # Errors
///
/// Returns [`PathError::Syntax`] for malformed data and
/// [`PathError::UnsupportedCommand`] for curves, arcs, or
/// horizontal/vertical shorthands.
pub fn parse_path(d: &str) -> Result<Vec<Point>, PathError> {
    let data = Data::parse(d).map_err(|e| PathError::Syntax(e.to_string()))?;

    let mut points: Vec<Point> = Vec::new();
    let mut current = Point::new(0.0, 0.0);
    for command in data.iter() {
        let (position, params) = match command {
            Command::Move(position, params) | Command::Line(position, params) => {
                (position, params)
            }
            Command::Close => continue,
            _ => return Err(PathError::UnsupportedCommand(d.to_owned())),
        };
        for pair in params.chunks(2) {
            let [x, y] = pair else {
                return Err(PathError::Syntax(format!(
                    "odd number of coordinates in {d:?}"
                )));
            };
            let (x, y) = (f64::from(*x), f64::from(*y));
            current = match position {
                Position::Absolute => Point::new(x, y),
                Position::Relative => Point::new(current.x + x, current.y + y),
            };
            points.push(current);
        }
    }
    Ok(points)
}

/// Parse a contour path back into lattice coordinates.
///
/// Inverse of [`contour_path`].
///
/// # Errors
///
/// Everything [`parse_path`] rejects, plus [`PathError::NotOnGrid`] for
/// negative or fractional coordinates and [`PathError::TooFewVertices`]
/// for fewer than three vertices.
pub fn parse_contour(d: &str) -> Result<Contour, PathError> {
    let points = parse_path(d)?;
    if points.len() < 3 {
        return Err(PathError::TooFewVertices(points.len()));
    }
    points
        .into_iter()
        .map(|p| Ok(GridPoint::new(grid_coord(p.x)?, grid_coord(p.y)?)))
        .collect::<Result<Vec<_>, _>>()
        .map(Contour::new)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grid_coord(v: f64) -> Result<u32, PathError> {
    if v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return Err(PathError::NotOnGrid(v));
    }
    Ok(v as u32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contour(list: &[(u32, u32)]) -> Contour {
        Contour::new(list.iter().map(|&(x, y)| GridPoint::new(x, y)).collect())
    }

    #[test]
    fn contour_path_format() {
        let c = contour(&[(0, 0), (0, 800), (800, 800), (800, 0)]);
        assert_eq!(contour_path(&c), "M 0 0 L 0 800 L 800 800 L 800 0 Z");
    }

    #[test]
    fn empty_contour_serializes_to_empty_string() {
        assert_eq!(contour_path(&Contour::new(vec![])), "");
    }

    #[test]
    fn cell_path_rounds_to_one_decimal() {
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(31.008_416_891, 127.701_532_367),
            Point::new(52.26, 0.04),
        ];
        assert_eq!(cell_path(&polygon), "M 0.0 0.0 L 31.0 127.7 L 52.3 0.0 Z");
    }

    #[test]
    fn contour_round_trips_through_its_path() {
        let c = contour(&[(1, 1), (1, 2), (2, 2), (2, 1), (5, 799), (800, 3)]);
        let parsed = parse_contour(&contour_path(&c)).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn parse_accepts_commas_and_relative_lines() {
        let points = parse_path("M10,20 l5,0 L15,30 z").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(10.0, 20.0),
                Point::new(15.0, 20.0),
                Point::new(15.0, 30.0)
            ]
        );
    }

    #[test]
    fn parse_rejects_curves() {
        let result = parse_path("M 0 0 C 1 1 2 2 3 3 Z");
        assert!(matches!(result, Err(PathError::UnsupportedCommand(_))));
    }

    #[test]
    fn parse_contour_rejects_fractional_coordinates() {
        let result = parse_contour("M 0 0 L 0.5 1 L 2 2 Z");
        assert!(matches!(result, Err(PathError::NotOnGrid(_))));
    }

    #[test]
    fn parse_contour_rejects_degenerate_paths() {
        let result = parse_contour("M 0 0 L 1 1 Z");
        assert!(matches!(result, Err(PathError::TooFewVertices(2))));
    }
}
