//! Build clues and sentences from a tessellation.
//!
//! Every cell yields one clue. Two sentences are derived from them: one
//! binding the first few clues inside the silhouette and one binding the
//! first few background clues. A sentence with no candidate clues is
//! omitted.

use enigma_pipeline::Cell;

use crate::types::{CellRef, ClueNode, DeductionSentence, DeductionSlot};

/// Id of the sentence about cells inside the silhouette.
pub const KEY_SENTENCE_ID: &str = "deduction-key-region";
/// Id of the sentence about background cells.
pub const BACKGROUND_SENTENCE_ID: &str = "deduction-background";

const KEY_SENTENCE_TEXT: &str = "Key region cells align with the silhouette.";
const BACKGROUND_SENTENCE_TEXT: &str = "Background cells remain outside the silhouette.";

/// Maximum number of slots in one sentence.
pub const SLOTS_PER_SENTENCE: usize = 3;

/// The clue describing a single cell. Never discovered.
#[must_use]
pub fn clue_for_cell(cell: &Cell) -> ClueNode {
    let summary = if cell.inside_silhouette {
        "Located within the silhouette."
    } else {
        "Outside the silhouette."
    };
    ClueNode {
        id: format!("cell-{}", cell.id),
        title: format!("Cell {}", cell.ordinal()),
        summary: Some(summary.to_owned()),
        cell_refs: vec![CellRef {
            shape_id: cell.id,
            number: cell.ordinal(),
            region_id: cell.region_id(),
        }],
        discovered: false,
    }
}

/// One clue per cell, in cell order.
#[must_use]
pub fn clues_from_cells(cells: &[Cell]) -> Vec<ClueNode> {
    cells.iter().map(clue_for_cell).collect()
}

/// Derive the sentences for `clues`.
///
/// Slots are filled in clue order, so the result depends on the order
/// of `clues`.
#[must_use]
pub fn sentences_from_clues(clues: &[ClueNode]) -> Vec<DeductionSentence> {
    let key_slots: Vec<DeductionSlot> = clues
        .iter()
        .filter(|c| c.touches_silhouette())
        .take(SLOTS_PER_SENTENCE)
        .enumerate()
        .map(|(i, clue)| {
            let region = clue.cell_refs.first().map_or(1, |r| r.region_id);
            DeductionSlot {
                id: format!("{}-key-{i}", clue.id),
                clue_id: clue.id.clone(),
                label: format!("Confirm {} belongs to region {region}", clue.title),
            }
        })
        .collect();

    let background_slots: Vec<DeductionSlot> = clues
        .iter()
        .filter(|c| c.is_background())
        .take(SLOTS_PER_SENTENCE)
        .enumerate()
        .map(|(i, clue)| DeductionSlot {
            id: format!("{}-background-{i}", clue.id),
            clue_id: clue.id.clone(),
            label: format!("Confirm {} remains outside the silhouette", clue.title),
        })
        .collect();

    let mut sentences = Vec::with_capacity(2);
    if !key_slots.is_empty() {
        sentences.push(DeductionSentence {
            id: KEY_SENTENCE_ID.to_owned(),
            text: KEY_SENTENCE_TEXT.to_owned(),
            slots: key_slots,
            validated: false,
        });
    }
    if !background_slots.is_empty() {
        sentences.push(DeductionSentence {
            id: BACKGROUND_SENTENCE_ID.to_owned(),
            text: BACKGROUND_SENTENCE_TEXT.to_owned(),
            slots: background_slots,
            validated: false,
        });
    }
    sentences
}
