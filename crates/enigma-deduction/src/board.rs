//! Slot assignments: which clue the player has put in which blank.
//!
//! The board is kept separate from the [`DeductionStore`] because
//! assignments are per-attempt scratch state, while the store's flags
//! survive regeneration. [`SlotBoard::apply_validation`] is the only
//! bridge between them.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::DeductionError;
use crate::store::DeductionStore;
use crate::types::DeductionSentence;

/// State of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Nothing assigned.
    Empty,
    /// Holds the clue it expects.
    Correct,
    /// Holds some other clue.
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SlotState {
    expected: String,
    assigned: Option<String>,
}

/// Slot id to assigned clue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBoard {
    slots: BTreeMap<String, SlotState>,
}

impl SlotBoard {
    /// An empty board with the slots of every sentence in `store`.
    #[must_use]
    pub fn new(store: &DeductionStore) -> Self {
        let mut board = Self::default();
        board.sync(store);
        board
    }

    /// Rebuild the slot list from `store`, keeping assignments for slot
    /// ids that still exist.
    pub fn sync(&mut self, store: &DeductionStore) {
        let mut previous = std::mem::take(&mut self.slots);
        for sentence in store.sentences() {
            for slot in &sentence.slots {
                let assigned = previous.remove(&slot.id).and_then(|s| s.assigned);
                self.slots.insert(
                    slot.id.clone(),
                    SlotState {
                        expected: slot.clue_id.clone(),
                        assigned,
                    },
                );
            }
        }
        if !previous.is_empty() {
            debug!("dropped {} vanished slots", previous.len());
        }
    }

    /// Put `clue_id` into `slot_id`, removing it from any other slot.
    ///
    /// # Errors
    ///
    /// Fails if the slot is not on the board, the clue is not in
    /// `store`, or the clue has not been discovered.
    pub fn assign(
        &mut self,
        store: &DeductionStore,
        slot_id: &str,
        clue_id: &str,
    ) -> Result<(), DeductionError> {
        if !self.slots.contains_key(slot_id) {
            return Err(DeductionError::UnknownSlot(slot_id.to_owned()));
        }
        let clue = store
            .clue(clue_id)
            .ok_or_else(|| DeductionError::UnknownClue(clue_id.to_owned()))?;
        if !clue.discovered {
            return Err(DeductionError::ClueNotDiscovered(clue_id.to_owned()));
        }

        for state in self.slots.values_mut() {
            if state.assigned.as_deref() == Some(clue_id) {
                state.assigned = None;
            }
        }
        if let Some(state) = self.slots.get_mut(slot_id) {
            state.assigned = Some(clue_id.to_owned());
        }
        Ok(())
    }

    /// Empty a slot, returning what it held.
    pub fn clear(&mut self, slot_id: &str) -> Option<String> {
        self.slots.get_mut(slot_id).and_then(|s| s.assigned.take())
    }

    /// The clue currently in `slot_id`.
    #[must_use]
    pub fn assignment(&self, slot_id: &str) -> Option<&str> {
        self.slots.get(slot_id).and_then(|s| s.assigned.as_deref())
    }

    /// The slot currently holding `clue_id`.
    #[must_use]
    pub fn slot_for_clue(&self, clue_id: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(_, s)| s.assigned.as_deref() == Some(clue_id))
            .map(|(id, _)| id.as_str())
    }

    /// Status of the slot [`Self::slot_for_clue`] finds, for every
    /// assigned clue.
    #[must_use]
    pub fn statuses_by_clue(&self) -> BTreeMap<&str, SlotStatus> {
        let mut statuses = BTreeMap::new();
        for state in self.slots.values() {
            if let Some(clue) = state.assigned.as_deref() {
                let status = if clue == state.expected {
                    SlotStatus::Correct
                } else {
                    SlotStatus::Incorrect
                };
                statuses.entry(clue).or_insert(status);
            }
        }
        statuses
    }

    /// The clue `slot_id` expects.
    #[must_use]
    pub fn expected(&self, slot_id: &str) -> Option<&str> {
        self.slots.get(slot_id).map(|s| s.expected.as_str())
    }

    /// Status of `slot_id`, `None` if it is not on the board.
    #[must_use]
    pub fn status(&self, slot_id: &str) -> Option<SlotStatus> {
        self.slots.get(slot_id).map(|s| match &s.assigned {
            None => SlotStatus::Empty,
            Some(clue) if *clue == s.expected => SlotStatus::Correct,
            Some(_) => SlotStatus::Incorrect,
        })
    }

    /// Whether every slot of `sentence` holds its expected clue.
    #[must_use]
    pub fn is_solved(&self, sentence: &DeductionSentence) -> bool {
        sentence
            .slots
            .iter()
            .all(|slot| self.assignment(&slot.id) == Some(slot.clue_id.as_str()))
    }

    /// Write each sentence's solved state into the store's `validated`
    /// flag. Returns the number of sentences whose flag changed.
    pub fn apply_validation(&self, store: &mut DeductionStore) -> usize {
        let changes: Vec<(String, bool)> = store
            .sentences()
            .into_iter()
            .filter_map(|sentence| {
                let solved = self.is_solved(sentence);
                (sentence.validated != solved).then(|| (sentence.id.clone(), solved))
            })
            .collect();
        for (id, solved) in &changes {
            store.set_sentence_validated(id, *solved);
        }
        changes.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use enigma_pipeline::{Cell, Point};

    use super::*;
    use crate::derive::{BACKGROUND_SENTENCE_ID, KEY_SENTENCE_ID};

    fn cell(id: usize, inside: bool) -> Cell {
        Cell {
            id,
            polygon: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ],
            centroid: Point::new(0.5, 0.5),
            inside_silhouette: inside,
        }
    }

    /// Cells 0 and 1 inside, 2 and 3 outside; every clue discovered.
    fn setup() -> (DeductionStore, SlotBoard) {
        let cells = vec![cell(0, true), cell(1, true), cell(2, false), cell(3, false)];
        let mut store = DeductionStore::from_cells(&cells);
        for id in ["cell-0", "cell-1", "cell-2", "cell-3"] {
            store.set_clue_discovered(id, true);
        }
        let board = SlotBoard::new(&store);
        (store, board)
    }

    #[test]
    fn new_board_is_empty() {
        let (_, board) = setup();
        assert_eq!(board.status("cell-0-key-0"), Some(SlotStatus::Empty));
        assert_eq!(board.expected("cell-1-key-1"), Some("cell-1"));
        assert_eq!(board.status("missing"), None);
    }

    #[test]
    fn assign_reports_status() {
        let (store, mut board) = setup();
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        board.assign(&store, "cell-1-key-1", "cell-2").unwrap();
        assert_eq!(board.status("cell-0-key-0"), Some(SlotStatus::Correct));
        assert_eq!(board.status("cell-1-key-1"), Some(SlotStatus::Incorrect));
        assert_eq!(board.slot_for_clue("cell-2"), Some("cell-1-key-1"));
    }

    #[test]
    fn statuses_are_indexed_by_clue() {
        let (store, mut board) = setup();
        assert!(board.statuses_by_clue().is_empty());
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        board.assign(&store, "cell-1-key-1", "cell-2").unwrap();

        let statuses = board.statuses_by_clue();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses["cell-0"], SlotStatus::Correct);
        assert_eq!(statuses["cell-2"], SlotStatus::Incorrect);
        for (clue, status) in &statuses {
            let slot = board.slot_for_clue(clue).unwrap();
            assert_eq!(board.status(slot), Some(*status));
        }
    }

    #[test]
    fn a_clue_occupies_one_slot() {
        let (store, mut board) = setup();
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        board.assign(&store, "cell-2-background-0", "cell-0").unwrap();
        assert_eq!(board.assignment("cell-0-key-0"), None);
        assert_eq!(board.assignment("cell-2-background-0"), Some("cell-0"));
    }

    #[test]
    fn assign_rejects_bad_input() {
        let (mut store, mut board) = setup();
        store.set_clue_discovered("cell-3", false);
        assert_eq!(
            board.assign(&store, "nope", "cell-0"),
            Err(DeductionError::UnknownSlot("nope".to_owned()))
        );
        assert_eq!(
            board.assign(&store, "cell-0-key-0", "cell-9"),
            Err(DeductionError::UnknownClue("cell-9".to_owned()))
        );
        assert_eq!(
            board.assign(&store, "cell-3-background-1", "cell-3"),
            Err(DeductionError::ClueNotDiscovered("cell-3".to_owned()))
        );
        assert_eq!(board.assignment("cell-3-background-1"), None);
    }

    #[test]
    fn clear_returns_previous() {
        let (store, mut board) = setup();
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        assert_eq!(board.clear("cell-0-key-0"), Some("cell-0".to_owned()));
        assert_eq!(board.clear("cell-0-key-0"), None);
        assert_eq!(board.status("cell-0-key-0"), Some(SlotStatus::Empty));
    }

    #[test]
    fn solving_validates_sentences() {
        let (mut store, mut board) = setup();
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        board.assign(&store, "cell-1-key-1", "cell-1").unwrap();

        assert_eq!(board.apply_validation(&mut store), 1);
        assert!(store.sentence(KEY_SENTENCE_ID).unwrap().validated);
        assert!(!store.sentence(BACKGROUND_SENTENCE_ID).unwrap().validated);
        assert_eq!(board.apply_validation(&mut store), 0);

        board.clear("cell-1-key-1");
        assert_eq!(board.apply_validation(&mut store), 1);
        assert!(!store.sentence(KEY_SENTENCE_ID).unwrap().validated);
    }

    #[test]
    fn sync_keeps_surviving_assignments() {
        let (mut store, mut board) = setup();
        board.assign(&store, "cell-0-key-0", "cell-0").unwrap();
        board.assign(&store, "cell-2-background-0", "cell-2").unwrap();

        // Cell 2 moves inside; its background slot disappears.
        store.hydrate_cells(&[cell(0, true), cell(1, true), cell(2, true), cell(3, false)]);
        board.sync(&store);
        assert_eq!(board.assignment("cell-0-key-0"), Some("cell-0"));
        assert_eq!(board.status("cell-2-background-0"), None);
        assert_eq!(board.status("cell-2-key-2"), Some(SlotStatus::Empty));
    }
}
