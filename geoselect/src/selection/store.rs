//! The selection set and its active level.

use crate::region::{Code, Level};

/// Point-in-time copy of the selection state.
///
/// `generation` changes whenever the selection is invalidated wholesale
/// (level change or clear). Asynchronous work tags itself with the
/// generation it was issued under and is discarded when it no longer matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSnapshot {
    pub level: Level,
    pub items: Vec<Code>,
    pub generation: u64,
}

impl SelectionSnapshot {
    /// Returns true if `code` is selected.
    pub fn contains(&self, code: &Code) -> bool {
        self.items.contains(code)
    }
}

/// Mutable selection state: the chosen codes plus the active level.
///
/// Items keep insertion order for display. Code format is not validated.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    level: Level,
    items: Vec<Code>,
    generation: u64,
}

impl SelectionStore {
    /// Create an empty store at the given level.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            items: Vec::new(),
            generation: 0,
        }
    }

    /// Flip membership of `code`.
    ///
    /// Returns `true` if the code is selected after the call.
    pub fn toggle(&mut self, code: Code) -> bool {
        match self.items.iter().position(|c| *c == code) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(code);
                true
            }
        }
    }

    /// Switch level. Always clears the selection, even when the level is unchanged.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
        self.items.clear();
        self.generation += 1;
    }

    /// Empty the selection, keeping the level.
    pub fn clear(&mut self) {
        self.items.clear();
        self.generation += 1;
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            level: self.level,
            items: self.items.clone(),
            generation: self.generation,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.items.contains(code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
