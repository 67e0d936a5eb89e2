//! Undo Log
//!
//! Each edit leaves exactly one [`UndoRecord`]: the chain-index range the edit produced
//! and the pieces that were there before. Undoing splices them back.

use std::ops::Range;

use crate::piece::{Piece, PieceChain};

/// Reverses one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    /// Chain indices occupied by the edit's result
    pub range: Range<usize>,
    /// Pieces to put back in place of `range`
    pub restore: Vec<Piece>,
}

impl UndoRecord {
    /// Create a new record.
    pub fn new(range: Range<usize>, restore: Vec<Piece>) -> Self {
        Self { range, restore }
    }

    /// Splice the saved pieces back into `chain`, returning the pieces they replace.
    pub fn apply(self, chain: &mut PieceChain) -> Vec<Piece> {
        chain.splice(self.range, self.restore)
    }
}

/// LIFO stack of undo records.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit.
    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    /// Take the most recent record.
    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop()
    }

    /// Number of edits that can be undone.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &UndoRecord> {
        self.records.iter()
    }
}
