//! enigma-deduction: clue and sentence bookkeeping for paintings
//!
//! The puzzle layer reads a painting's cells and never changes them. Each
//! cell becomes a [`ClueNode`]; clues are grouped into
//! [`DeductionSentence`]s whose slots each expect one clue.
//!
//! State lives in two places:
//!
//! - [`DeductionStore`] holds the records and their `discovered` /
//!   `validated` flags. It is driven by [`DeductionAction`]s and can be
//!   re-hydrated from a regenerated cell list without losing the flags of
//!   ids that survive.
//! - [`SlotBoard`] holds which clue the player placed in which slot.
//!
//! [`to_map_svg`] draws the painting shaded by that progress.

pub mod board;
pub mod derive;
pub mod map;
pub mod store;
pub mod types;

pub use board::{SlotBoard, SlotStatus};
pub use derive::{
    BACKGROUND_SENTENCE_ID, KEY_SENTENCE_ID, clue_for_cell, clues_from_cells, sentences_from_clues,
};
pub use map::{MapFill, MapOptions, map_fill, to_map_svg};
pub use store::{DeductionAction, DeductionBook, DeductionStore};
pub use types::{CellRef, ClueNode, DeductionSentence, DeductionSlot};

/// Errors from slot assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeductionError {
    /// No slot with this id is on the board.
    #[error("no slot with id {0:?}")]
    UnknownSlot(String),

    /// No clue with this id is in the store.
    #[error("no clue with id {0:?}")]
    UnknownClue(String),

    /// The clue exists but has not been discovered yet.
    #[error("clue {0:?} has not been discovered")]
    ClueNotDiscovered(String),
}
