//! Clue and sentence records.
//!
//! These are serialized with camelCase keys so a saved deduction book
//! reads the same as the painting document's shape records.

use serde::{Deserialize, Serialize};

/// Reference from a clue back to the cell it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    /// Cell id.
    pub shape_id: usize,
    /// 1-based display number of the cell.
    pub number: usize,
    /// `1` inside the silhouette, `0` outside.
    pub region_id: u8,
}

/// A discoverable fact about one or more cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueNode {
    /// Stable id, `cell-<id>` for derived clues.
    pub id: String,
    /// Display title.
    pub title: String,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Cells this clue is about.
    pub cell_refs: Vec<CellRef>,
    /// Whether the player has found this clue.
    #[serde(default)]
    pub discovered: bool,
}

impl ClueNode {
    /// Display number of the first referenced cell, `0` if none.
    #[must_use]
    pub fn number(&self) -> usize {
        self.cell_refs.first().map_or(0, |r| r.number)
    }

    /// Whether any referenced cell lies inside the silhouette.
    #[must_use]
    pub fn touches_silhouette(&self) -> bool {
        self.cell_refs.iter().any(|r| r.region_id == 1)
    }

    /// Whether every referenced cell lies outside the silhouette.
    ///
    /// A clue with no cell references counts as background.
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.cell_refs.iter().all(|r| r.region_id == 0)
    }
}

/// A blank in a sentence that expects one particular clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionSlot {
    /// Slot id, unique across all sentences.
    pub id: String,
    /// Id of the clue that belongs here.
    pub clue_id: String,
    /// Prompt shown next to the blank.
    pub label: String,
}

/// A composite requirement: solved when every slot holds its clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionSentence {
    /// Stable id.
    pub id: String,
    /// Sentence text.
    pub text: String,
    /// Blanks to fill.
    pub slots: Vec<DeductionSlot>,
    /// Whether the sentence has been proven.
    #[serde(default)]
    pub validated: bool,
}
