//! Progress map: the painting's cells coloured by puzzle state.

use std::collections::BTreeMap;

use svg::Document;
use svg::node::element::{Element, Path, Rectangle, Title};
use svg::node::{Node, Text};

use enigma_pipeline::{Cell, Painting, cell_path, contour_path};

use crate::board::{SlotBoard, SlotStatus};
use crate::store::DeductionStore;
use crate::types::ClueNode;

const BACKGROUND_FILL: &str = "#f8fafc";
const INSIDE_STROKE: &str = "#9a7b00";
const OUTSIDE_STROKE: &str = "#94a3b8";
const OUTLINE_STROKE: &str = "darkgoldenrod";
const LABEL_FILL: &str = "#1f2937";

/// How a cell is shaded on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFill {
    /// The cell has a clue that has not been found.
    Hidden,
    /// The cell's clue is found but not placed.
    Discovered,
    /// The cell's clue sits in the slot that expects it.
    Correct,
    /// The cell's clue sits in some other slot.
    Incorrect,
    /// No clue covers this cell and it lies inside the silhouette.
    Silhouette,
}

impl MapFill {
    /// CSS colour of the fill.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Hidden => "#e2e8f0",
            Self::Discovered => "#bfdbfe",
            Self::Correct => "#bbf7d0",
            Self::Incorrect => "#fecaca",
            Self::Silhouette => "#fef3c7",
        }
    }
}

/// Which overlays to draw on top of the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    /// Draw the silhouette contours.
    pub show_outline: bool,
    /// Draw cell numbers at the centroids.
    pub show_numbers: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            show_outline: true,
            show_numbers: true,
        }
    }
}

/// Clue and slot lookups for one render, keyed by cell and clue.
struct MapIndex<'a> {
    clues: BTreeMap<usize, &'a ClueNode>,
    statuses: BTreeMap<&'a str, SlotStatus>,
}

impl<'a> MapIndex<'a> {
    fn new(store: &'a DeductionStore, board: &'a SlotBoard) -> Self {
        Self {
            clues: store.clues_by_shape(),
            statuses: board.statuses_by_clue(),
        }
    }

    fn fill(&self, cell: &Cell) -> MapFill {
        let Some(clue) = self.clues.get(&cell.id) else {
            return if cell.inside_silhouette {
                MapFill::Silhouette
            } else {
                MapFill::Hidden
            };
        };
        match self.statuses.get(clue.id.as_str()) {
            Some(SlotStatus::Correct) => MapFill::Correct,
            Some(SlotStatus::Incorrect) => MapFill::Incorrect,
            _ if clue.discovered => MapFill::Discovered,
            _ => MapFill::Hidden,
        }
    }

    /// Hover text for `cell`.
    fn title(&self, cell: &Cell) -> String {
        let head = self.clues.get(&cell.id).map_or_else(
            || format!("Region {}", cell.ordinal()),
            |clue| {
                let state = if clue.discovered { "discovered" } else { "hidden" };
                format!("{} ({state})", clue.title)
            },
        );
        let region = if cell.inside_silhouette {
            "Inside silhouette"
        } else {
            "Background"
        };
        format!("{head} - {region}")
    }
}

/// The shading of `cell` given the current store and board.
#[must_use]
pub fn map_fill(cell: &Cell, store: &DeductionStore, board: &SlotBoard) -> MapFill {
    MapIndex::new(store, board).fill(cell)
}

/// Render the progress map as a standalone SVG document.
#[must_use]
pub fn to_map_svg(
    painting: &Painting,
    store: &DeductionStore,
    board: &SlotBoard,
    options: &MapOptions,
) -> String {
    let dims = painting.dimensions();
    let mut doc = Document::new()
        .set("width", dims.width)
        .set("height", dims.height)
        .set("viewBox", (0, 0, dims.width, dims.height))
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", dims.width)
                .set("height", dims.height)
                .set("fill", BACKGROUND_FILL),
        );

    let index = MapIndex::new(store, board);
    for cell in &painting.cells {
        let stroke = if cell.inside_silhouette {
            INSIDE_STROKE
        } else {
            OUTSIDE_STROKE
        };
        let path = Path::new()
            .set("d", cell_path(&cell.polygon))
            .set("fill", index.fill(cell).css())
            .set("stroke", stroke)
            .set("stroke-width", 0.6)
            .add(Title::new(index.title(cell)));
        doc = doc.add(path);
    }

    if options.show_outline {
        for contour in &painting.silhouette {
            let d = contour_path(contour);
            if d.is_empty() {
                continue;
            }
            doc = doc.add(
                Path::new()
                    .set("d", d)
                    .set("fill", "none")
                    .set("stroke", OUTLINE_STROKE)
                    .set("stroke-width", 0.8),
            );
        }
    }

    if options.show_numbers {
        for cell in &painting.cells {
            let mut label = Element::new("text");
            label.assign("x", format!("{:.1}", cell.centroid.x));
            label.assign("y", format!("{:.1}", cell.centroid.y));
            label.assign("font-size", 6);
            label.assign("text-anchor", "middle");
            label.assign("dominant-baseline", "middle");
            label.assign("fill", LABEL_FILL);
            label.append(Text::new(cell.ordinal().to_string()));
            doc = doc.add(label);
        }
    }

    format!("{doc}\n")
}
