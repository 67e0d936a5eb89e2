//! Piece Chain
//!
//! An ordered list of pieces whose spans, concatenated, are the current document. Edits
//! only ever replace pieces through [`PieceChain::splice`]; piece contents never change.

use std::ops::Range;

use crate::store::{BufferId, DualBuffer};

/// Piece structure: references a fragment in one of the two buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Buffer the fragment lives in
    pub buffer: BufferId,
    /// Start position in the buffer (byte offset)
    pub start: usize,
    /// Byte length of the fragment
    pub byte_len: usize,
    /// Character count of the fragment
    pub char_len: usize,
}

impl Piece {
    /// Create a new Piece
    pub fn new(buffer: BufferId, start: usize, byte_len: usize, char_len: usize) -> Self {
        Self {
            buffer,
            start,
            byte_len,
            char_len,
        }
    }

    /// Describe `text`, stored at byte offset `start` of `buffer`.
    pub fn covering(buffer: BufferId, start: usize, text: &str) -> Self {
        Self::new(buffer, start, text.len(), text.chars().count())
    }

    /// Length of the piece in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    /// Whether the piece covers no text.
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Byte offset one past the end of the fragment in its buffer.
    pub fn end(&self) -> usize {
        self.start + self.byte_len
    }

    /// The text this piece refers to.
    pub fn text<'a>(&self, store: &'a DualBuffer) -> &'a str {
        store.slice(self.buffer, self.start, self.byte_len)
    }

    /// This piece grown by `text`, which must sit directly after it in the same buffer.
    pub(crate) fn extended_by(&self, text: &str) -> Self {
        Self::new(
            self.buffer,
            self.start,
            self.byte_len + text.len(),
            self.char_len + text.chars().count(),
        )
    }
}

/// A global character position resolved against the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    /// The piece containing the position
    pub piece: Piece,
    /// Index of that piece in the chain
    pub index: usize,
    /// Character offset of the position within the piece
    pub offset: usize,
}

impl Coordinate {
    /// Whether the position sits on the first or one-past-last character of its piece.
    pub fn is_boundary(&self) -> bool {
        self.offset == 0 || self.offset == self.piece.len()
    }
}

/// Convert a character offset within `text` to a byte offset.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Split `piece` at `char_offset`, returning (prefix, suffix).
pub fn split_piece(store: &DualBuffer, piece: &Piece, char_offset: usize) -> (Piece, Piece) {
    let byte_offset = byte_offset(piece.text(store), char_offset);

    let prefix = Piece::new(piece.buffer, piece.start, byte_offset, char_offset);
    let suffix = Piece::new(
        piece.buffer,
        piece.start + byte_offset,
        piece.byte_len - byte_offset,
        piece.char_len - char_offset,
    );

    (prefix, suffix)
}

/// Ordered sequence of pieces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceChain {
    pieces: Vec<Piece>,
    /// Sum of the pieces' character counts
    char_len: usize,
}

impl PieceChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain holding the whole of `piece`, or nothing if it is empty.
    pub fn with_piece(piece: Piece) -> Self {
        if piece.is_empty() {
            return Self::new();
        }
        Self {
            pieces: vec![piece],
            char_len: piece.len(),
        }
    }

    /// Document length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    /// Document length in bytes.
    pub fn byte_len(&self) -> usize {
        self.pieces.iter().map(|p| p.byte_len).sum()
    }

    /// Whether the chain holds no text.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Number of pieces in the chain.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// The pieces, in document order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Character offset at which the piece at `index` starts.
    ///
    /// `index == piece_count()` gives the document length.
    pub fn offset_of_index(&self, index: usize) -> usize {
        self.pieces[..index].iter().map(Piece::len).sum()
    }

    /// Resolve a character position to the piece containing it.
    ///
    /// A position on a piece boundary resolves to the piece that starts there. The
    /// document length resolves to the end of the last piece. Returns `None` for
    /// positions past the end, and for every position of an empty chain.
    pub fn find_coordinate(&self, position: usize) -> Option<Coordinate> {
        let mut piece_start = 0;

        for (index, piece) in self.pieces.iter().enumerate() {
            let piece_end = piece_start + piece.len();
            if position < piece_end {
                return Some(Coordinate {
                    piece: *piece,
                    index,
                    offset: position - piece_start,
                });
            }
            piece_start = piece_end;
        }

        match self.pieces.last() {
            Some(last) if position == piece_start => Some(Coordinate {
                piece: *last,
                index: self.pieces.len() - 1,
                offset: last.len(),
            }),
            _ => None,
        }
    }

    /// Split the piece under `coordinate` in two, in place.
    ///
    /// The coordinate must be strictly inside its piece; callers handle boundaries
    /// themselves.
    pub fn split(&mut self, store: &DualBuffer, coordinate: &Coordinate) -> (Piece, Piece) {
        debug_assert!(
            !coordinate.is_boundary(),
            "split requested at a piece boundary: {coordinate:?}"
        );

        let (prefix, suffix) = split_piece(store, &coordinate.piece, coordinate.offset);
        self.splice(coordinate.index..coordinate.index + 1, [prefix, suffix]);
        (prefix, suffix)
    }

    /// Replace the pieces in `range` with `replacement`, returning the removed pieces.
    pub fn splice(
        &mut self,
        range: Range<usize>,
        replacement: impl IntoIterator<Item = Piece>,
    ) -> Vec<Piece> {
        let replacement: Vec<Piece> = replacement.into_iter().collect();
        let added: usize = replacement.iter().map(Piece::len).sum();

        let removed: Vec<Piece> = self.pieces.splice(range, replacement).collect();
        let dropped: usize = removed.iter().map(Piece::len).sum();

        self.char_len = self.char_len + added - dropped;
        removed
    }
}
