//! Structured JSON export.
//!
//! The document carries everything needed to redraw or score a painting
//! without re-running the pipeline: cell paths and centres, their
//! inside/outside labels, the silhouette paths, and the generating
//! parameters.

use serde::{Deserialize, Serialize};

use enigma_pipeline::{Cell, Painting, cell_path, contour_path};

use crate::ExportError;

/// One cell as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    /// Cell id (sample index).
    pub id: usize,
    /// Polygon path, one decimal place.
    pub path: String,
    /// Vertex-mean centroid `[x, y]`.
    pub center: [f64; 2],
    /// 1-based display number.
    pub number: usize,
    /// Whether the centroid lies inside the silhouette.
    pub inside_silhouette: bool,
    /// `1` inside the silhouette, `0` outside.
    pub region_id: u8,
}

impl ShapeRecord {
    /// Build the record for one cell.
    #[must_use]
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            id: cell.id,
            path: cell_path(&cell.polygon),
            center: [cell.centroid.x, cell.centroid.y],
            number: cell.ordinal(),
            inside_silhouette: cell.inside_silhouette,
            region_id: cell.region_id(),
        }
    }
}

/// Generating parameters as recorded in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentParams {
    /// Sampler seed.
    pub seed: i64,
    /// Requested number of cells.
    pub complexity: u32,
    /// Luminance threshold.
    pub threshold: u8,
}

/// The complete exported painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingDocument {
    /// `key_<seed>`.
    pub painting_id: String,
    /// `[width, height]` of the canvas.
    pub dimensions: [u32; 2],
    /// Cells in id order.
    pub shapes: Vec<ShapeRecord>,
    /// One path per silhouette contour, integer coordinates.
    pub silhouette_paths: Vec<String>,
    /// Generating parameters.
    pub params: DocumentParams,
}

impl PaintingDocument {
    /// Assemble the document for `painting`.
    #[must_use]
    pub fn from_painting(painting: &Painting) -> Self {
        let dims = painting.dimensions();
        Self {
            painting_id: format!("key_{}", painting.params.seed),
            dimensions: [dims.width, dims.height],
            shapes: painting.cells.iter().map(ShapeRecord::from_cell).collect(),
            silhouette_paths: painting.silhouette.iter().map(contour_path).collect(),
            params: DocumentParams {
                seed: painting.params.seed,
                complexity: painting.params.complexity,
                threshold: painting.params.threshold,
            },
        }
    }
}

/// Serialize `painting` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json(painting: &Painting) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&PaintingDocument::from_painting(
        painting,
    ))?)
}
