//! Linear undo/redo history.
//!
//! Two stacks over recorded entries. The bottom of the undo stack is a
//! sentinel that can never be undone past, and recording a new entry always
//! discards the redo stack: history is a line, never a tree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when there is nothing left to move across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Undo/redo stacks over recorded entries.
///
/// # Example
///
/// ```rust
/// use backgammon_clock::core::ActionHistory;
///
/// let mut history = ActionHistory::new("sentinel");
/// history.push("start");
/// history.push("roll");
///
/// assert_eq!(history.undo(), Ok(&"start"));
/// assert_eq!(history.redo(), Ok(&"roll"));
///
/// history.undo().unwrap();
/// history.push("double");
/// assert!(!history.can_redo());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionHistory<A> {
    undo: Vec<A>,
    redo: Vec<A>,
}

impl<A> ActionHistory<A> {
    /// Create a history whose only entry is `sentinel`.
    pub fn new(sentinel: A) -> Self {
        Self {
            undo: vec![sentinel],
            redo: Vec::new(),
        }
    }

    /// Record an entry. Anything that could have been redone is dropped.
    pub fn push(&mut self, entry: A) {
        self.undo.push(entry);
        self.redo.clear();
    }

    /// True while something other than the sentinel is on the undo stack.
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Move the newest entry onto the redo stack and return the entry that
    /// is current afterwards.
    pub fn undo(&mut self) -> Result<&A, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        if let Some(entry) = self.undo.pop() {
            self.redo.push(entry);
        }
        self.undo.last().ok_or(HistoryError::NothingToUndo)
    }

    /// Move the most recently undone entry back and return it.
    pub fn redo(&mut self) -> Result<&A, HistoryError> {
        let entry = self.redo.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo.push(entry);
        self.undo.last().ok_or(HistoryError::NothingToRedo)
    }

    /// The entry at the top of the undo stack.
    pub fn current(&self) -> Option<&A> {
        self.undo.last()
    }

    /// Number of entries that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len().saturating_sub(1)
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// All entries from the sentinel up to the current one.
    pub fn entries(&self) -> &[A] {
        &self.undo
    }
}
