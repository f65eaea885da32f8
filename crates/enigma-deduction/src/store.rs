//! Keyed clue/sentence store driven by [`DeductionAction`]s.
//!
//! The store survives regeneration: hydrating it with a new clue and
//! sentence list keeps the `discovered` and `validated` flags of every
//! id that is still present and forgets ids that are gone. Everything
//! else about a surviving record is replaced by the incoming copy.

use std::collections::BTreeMap;

use enigma_pipeline::Cell;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::derive::{clues_from_cells, sentences_from_clues};
use crate::types::{ClueNode, DeductionSentence};

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductionAction {
    /// Replace the records, merging flags by id.
    Hydrate {
        /// Incoming clues.
        clues: Vec<ClueNode>,
        /// Incoming sentences.
        sentences: Vec<DeductionSentence>,
    },
    /// Set a clue's `discovered` flag.
    SetClueDiscovered {
        /// Clue id.
        id: String,
        /// New value.
        discovered: bool,
    },
    /// Set a sentence's `validated` flag.
    SetSentenceValidated {
        /// Sentence id.
        id: String,
        /// New value.
        validated: bool,
    },
}

/// Serializable snapshot of the store, in query order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBook {
    /// Clues ordered by cell number.
    pub clues: Vec<ClueNode>,
    /// Sentences ordered by text.
    pub sentences: Vec<DeductionSentence>,
}

/// Clue and sentence records keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeductionStore {
    clues: BTreeMap<String, ClueNode>,
    sentences: BTreeMap<String, DeductionSentence>,
}

impl DeductionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store hydrated from `cells`.
    #[must_use]
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut store = Self::new();
        store.hydrate_cells(cells);
        store
    }

    /// Apply `action`. Returns `false` if it named an unknown id and
    /// left the store untouched.
    pub fn dispatch(&mut self, action: DeductionAction) -> bool {
        match action {
            DeductionAction::Hydrate { clues, sentences } => {
                self.merge(clues, sentences);
                true
            }
            DeductionAction::SetClueDiscovered { id, discovered } => {
                if let Some(clue) = self.clues.get_mut(&id) {
                    clue.discovered = discovered;
                    true
                } else {
                    debug!("ignoring discovered={discovered} for unknown clue {id:?}");
                    false
                }
            }
            DeductionAction::SetSentenceValidated { id, validated } => {
                if let Some(sentence) = self.sentences.get_mut(&id) {
                    sentence.validated = validated;
                    true
                } else {
                    debug!("ignoring validated={validated} for unknown sentence {id:?}");
                    false
                }
            }
        }
    }

    /// Merge in a new clue and sentence list.
    pub fn hydrate(&mut self, clues: Vec<ClueNode>, sentences: Vec<DeductionSentence>) {
        self.dispatch(DeductionAction::Hydrate { clues, sentences });
    }

    /// Re-derive clues and sentences from a (possibly regenerated) cell
    /// list and merge them in.
    pub fn hydrate_cells(&mut self, cells: &[Cell]) {
        let clues = clues_from_cells(cells);
        let sentences = sentences_from_clues(&clues);
        self.hydrate(clues, sentences);
    }

    /// Mark a clue found or hidden. Unknown ids are ignored.
    pub fn set_clue_discovered(&mut self, id: &str, discovered: bool) -> bool {
        self.dispatch(DeductionAction::SetClueDiscovered {
            id: id.to_owned(),
            discovered,
        })
    }

    /// Mark a sentence proven or not. Unknown ids are ignored.
    pub fn set_sentence_validated(&mut self, id: &str, validated: bool) -> bool {
        self.dispatch(DeductionAction::SetSentenceValidated {
            id: id.to_owned(),
            validated,
        })
    }

    /// Look up a clue.
    #[must_use]
    pub fn clue(&self, id: &str) -> Option<&ClueNode> {
        self.clues.get(id)
    }

    /// Look up a sentence.
    #[must_use]
    pub fn sentence(&self, id: &str) -> Option<&DeductionSentence> {
        self.sentences.get(id)
    }

    /// The clue referencing cell `shape_id`, if any. When several do,
    /// the last one in query order wins.
    #[must_use]
    pub fn clue_for_shape(&self, shape_id: usize) -> Option<&ClueNode> {
        self.clues()
            .into_iter()
            .rev()
            .find(|c| c.cell_refs.iter().any(|r| r.shape_id == shape_id))
    }

    /// Every referenced cell mapped to the clue [`Self::clue_for_shape`]
    /// would return for it, built in one pass.
    #[must_use]
    pub fn clues_by_shape(&self) -> BTreeMap<usize, &ClueNode> {
        let mut by_shape = BTreeMap::new();
        for clue in self.clues() {
            for r in &clue.cell_refs {
                by_shape.insert(r.shape_id, clue);
            }
        }
        by_shape
    }

    /// All clues, ordered by the number of their first cell.
    #[must_use]
    pub fn clues(&self) -> Vec<&ClueNode> {
        let mut clues: Vec<&ClueNode> = self.clues.values().collect();
        clues.sort_by_key(|c| c.number());
        clues
    }

    /// All sentences, ordered by text.
    #[must_use]
    pub fn sentences(&self) -> Vec<&DeductionSentence> {
        let mut sentences: Vec<&DeductionSentence> = self.sentences.values().collect();
        sentences.sort_by(|a, b| a.text.cmp(&b.text));
        sentences
    }

    /// Number of clues.
    #[must_use]
    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// Number of sentences.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Owned snapshot in query order.
    #[must_use]
    pub fn book(&self) -> DeductionBook {
        DeductionBook {
            clues: self.clues().into_iter().cloned().collect(),
            sentences: self.sentences().into_iter().cloned().collect(),
        }
    }

    fn merge(&mut self, clues: Vec<ClueNode>, sentences: Vec<DeductionSentence>) {
        let previous_clues = std::mem::take(&mut self.clues);
        for clue in clues {
            let discovered = previous_clues
                .get(&clue.id)
                .map_or(clue.discovered, |c| c.discovered);
            self.clues
                .insert(clue.id.clone(), ClueNode { discovered, ..clue });
        }

        let previous_sentences = std::mem::take(&mut self.sentences);
        for sentence in sentences {
            let validated = previous_sentences
                .get(&sentence.id)
                .map_or(sentence.validated, |s| s.validated);
            self.sentences.insert(
                sentence.id.clone(),
                DeductionSentence {
                    validated,
                    ..sentence
                },
            );
        }

        let dropped_clues = previous_clues
            .keys()
            .filter(|id| !self.clues.contains_key(*id))
            .count();
        debug!(
            "hydrated {} clues and {} sentences, dropped {dropped_clues} clues",
            self.clues.len(),
            self.sentences.len(),
        );
    }
}
