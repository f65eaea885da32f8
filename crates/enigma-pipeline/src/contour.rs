//! Marching-squares boundary tracing of a thresholded raster.
//!
//! The tracer walks the pixel-corner lattice. Each lattice point is the
//! centre of a 2×2 block of pixels whose on/off states form a 4-bit
//! configuration (top-left, top-right, bottom-left, bottom-right as bits
//! 3..0). Boundaries run along pixel edges, keeping foreground on the
//! left of the direction of travel, so outer boundaries come out
//! counter-clockwise on screen and holes clockwise.
//!
//! At every block the walk looks up `(configuration, heading)` in
//! [`transition`] and emits the block's lattice point when the heading
//! changes. Straight runs emit nothing, so a filled rectangle traces to
//! exactly its four corners.
//!
//! Pixels outside the raster read as background. Every foreground region
//! therefore has a closed boundary, including one touching the raster
//! edge: an all-foreground raster traces to the raster rectangle itself.

use log::{debug, warn};

use crate::foreground::ForegroundMask;
use crate::types::{Contour, GridPoint};

/// Upper bound on the vertices emitted for a single trace.
///
/// Reaching it stops the trace early; the partial trace is still kept
/// when it has at least three points.
pub const MAX_TRACE_VERTICES: usize = 200_000;

/// Direction of travel along the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Heading {
    /// Towards increasing x.
    East = 0,
    /// Towards increasing y (down the screen).
    South = 1,
    /// Towards decreasing x.
    West = 2,
    /// Towards decreasing y.
    North = 3,
}

impl Heading {
    const ALL: [Self; 4] = [Self::East, Self::South, Self::West, Self::North];

    /// Unit step `(dx, dy)` for this heading.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::North => (0, -1),
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// 4-bit block configuration from its corner states.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn configuration(
    top_left: bool,
    top_right: bool,
    bottom_left: bool,
    bottom_right: bool,
) -> u8 {
    ((top_left as u8) << 3)
        | ((top_right as u8) << 2)
        | ((bottom_left as u8) << 1)
        | (bottom_right as u8)
}

/// Heading to leave a block with, given its configuration and the
/// heading the walk arrived with.
///
/// Configurations 0 and 15 hold no boundary and keep the current
/// heading. Every other non-saddle configuration has exactly one exit.
/// The saddles 6 and 9 (diagonal corners agree, adjacent corners
/// disagree) have two; the fixed rule turns East↔South and West↔North,
/// which joins the foreground diagonal of configuration 9 and separates
/// that of configuration 6.
#[must_use]
pub const fn transition(config: u8, heading: Heading) -> Heading {
    match config & 0xF {
        1 | 5 | 13 => Heading::South,
        8 | 10 | 11 => Heading::North,
        4 | 12 | 14 => Heading::East,
        2 | 3 | 7 => Heading::West,
        6 | 9 => match heading {
            Heading::East => Heading::South,
            Heading::South => Heading::East,
            Heading::West => Heading::North,
            Heading::North => Heading::West,
        },
        _ => heading,
    }
}

/// Headings a trace may start with from a block of this configuration.
fn exits(config: u8) -> &'static [Heading] {
    match config & 0xF {
        0 | 15 => &[],
        6 => &[Heading::East, Heading::West],
        9 => &[Heading::South, Heading::North],
        1 | 5 | 13 => &[Heading::South],
        8 | 10 | 11 => &[Heading::North],
        4 | 12 | 14 => &[Heading::East],
        _ => &[Heading::West],
    }
}

/// Per-block record of the headings a trace has already left it with.
struct Visited {
    stride: i64,
    bits: Vec<u8>,
}

impl Visited {
    fn new(mask: &ForegroundMask) -> Self {
        let stride = i64::from(mask.width()) + 1;
        let rows = i64::from(mask.height()) + 1;
        Self {
            stride,
            bits: vec![0; usize::try_from(stride * rows).unwrap_or(0)],
        }
    }

    /// Blocks are addressed by their top-left pixel, from `(-1, -1)`.
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < -1 || y < -1 || x + 1 >= self.stride {
            return None;
        }
        usize::try_from((y + 1) * self.stride + (x + 1))
            .ok()
            .filter(|&i| i < self.bits.len())
    }

    fn contains(&self, x: i64, y: i64, heading: Heading) -> bool {
        self.index(x, y)
            .is_some_and(|i| self.bits[i] & heading.bit() != 0)
    }

    /// Marks the pair, returning `false` if the block is off the lattice.
    fn insert(&mut self, x: i64, y: i64, heading: Heading) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.bits[i] |= heading.bit();
                true
            }
            None => false,
        }
    }
}

fn block_configuration(mask: &ForegroundMask, x: i64, y: i64) -> u8 {
    configuration(
        mask.is_on(x, y),
        mask.is_on(x + 1, y),
        mask.is_on(x, y + 1),
        mask.is_on(x + 1, y + 1),
    )
}

/// Lattice point at the centre of block `(x, y)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn lattice_point(x: i64, y: i64) -> GridPoint {
    // Blocks start at (-1, -1), so both coordinates are non-negative and
    // bounded by the mask size.
    GridPoint::new((x + 1) as u32, (y + 1) as u32)
}

/// Trace every boundary of the foreground in `mask`.
///
/// Blocks are scanned in row-major order (y outer, x inner); each block
/// edge not yet walked seeds a new trace. Traces with fewer than three
/// vertices are discarded.
#[must_use = "returns the traced contours"]
pub fn trace_contours(mask: &ForegroundMask) -> Vec<Contour> {
    trace_contours_with_limit(mask, MAX_TRACE_VERTICES)
}

/// [`trace_contours`] with `limit` as the per-trace vertex bound.
fn trace_contours_with_limit(mask: &ForegroundMask, limit: usize) -> Vec<Contour> {
    let mut visited = Visited::new(mask);
    let mut contours = Vec::new();

    for y in -1..i64::from(mask.height()) {
        for x in -1..i64::from(mask.width()) {
            for &exit in exits(block_configuration(mask, x, y)) {
                if visited.contains(x, y, exit) {
                    continue;
                }
                let points = trace_from(mask, &mut visited, (x, y), exit, limit);
                if points.len() >= 3 {
                    contours.push(Contour::new(points));
                }
            }
        }
    }

    debug!(
        "traced {} contours ({} vertices) on a {}x{} mask",
        contours.len(),
        contours.iter().map(Contour::len).sum::<usize>(),
        mask.width(),
        mask.height(),
    );
    contours
}

/// Follow one boundary from `start`, leaving it with `start_heading`.
///
/// The walk ends when it closes, leaves the lattice, emits `limit`
/// vertices, or reaches a block edge an earlier trace already walked.
fn trace_from(
    mask: &ForegroundMask,
    visited: &mut Visited,
    start: (i64, i64),
    start_heading: Heading,
    limit: usize,
) -> Vec<GridPoint> {
    // Every block edge is walked at most once, which bounds any walk
    // that never revisits its start.
    let max_steps = visited.bits.len() * Heading::ALL.len();

    visited.insert(start.0, start.1, start_heading);
    let mut points = Vec::new();
    let mut heading = start_heading;
    let (dx, dy) = heading.delta();
    let mut pos = (start.0 + dx, start.1 + dy);
    let mut closed = false;

    for _ in 0..max_steps {
        let next = transition(block_configuration(mask, pos.0, pos.1), heading);
        if pos == start && next == start_heading {
            closed = true;
            break;
        }
        if visited.contains(pos.0, pos.1, next) {
            debug!(
                "contour trace from block ({}, {}) joined a walked edge at ({}, {})",
                start.0, start.1, pos.0, pos.1
            );
            break;
        }
        if next != heading {
            points.push(lattice_point(pos.0, pos.1));
            if points.len() >= limit {
                warn!(
                    "contour trace from block ({}, {}) hit the {limit} vertex bound",
                    start.0, start.1
                );
                break;
            }
        }
        if !visited.insert(pos.0, pos.1, next) {
            break;
        }
        heading = next;
        let (dx, dy) = heading.delta();
        pos = (pos.0 + dx, pos.1 + dy);
    }

    // The start block is a corner unless the walk came back into it
    // already travelling in the start heading.
    if !closed || heading != start_heading {
        points.insert(0, lattice_point(start.0, start.1));
    }
    points
}
