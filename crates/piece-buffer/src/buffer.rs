//! Editable Buffer
//!
//! Ties the dual buffer store, the piece chain, the undo log and the line index together
//! behind the editing API.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, trace};

use crate::config::{BufferConfig, invariant};
use crate::error::BufferError;
use crate::line_index::LineIndex;
use crate::piece::{Coordinate, Piece, PieceChain};
use crate::reader::{Lines, Spans};
use crate::store::{BufferId, DualBuffer};
use crate::undo::{UndoLog, UndoRecord};

/// An editable text buffer backed by a piece chain.
///
/// Positions and lengths are counted in characters (Unicode scalar values).
///
/// A `Buffer` is not thread-safe in the sense that reading lines updates its line cache;
/// share it between threads behind a lock.
#[derive(Debug, Clone)]
pub struct Buffer {
    store: DualBuffer,
    chain: PieceChain,
    undo: UndoLog,
    lines: LineIndex,
    config: BufferConfig,
}

impl Buffer {
    /// Create a buffer over `text` with the default configuration.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::with_config(text, BufferConfig::default())
    }

    /// Create a buffer over `text`.
    pub fn with_config(text: impl Into<String>, config: BufferConfig) -> Self {
        let source = text.into();
        let chain = PieceChain::with_piece(Piece::covering(BufferId::Source, 0, &source));
        debug!(
            chars = chain.len(),
            bytes = source.len(),
            "created buffer"
        );

        let buffer = Self {
            store: DualBuffer::new(source),
            chain,
            undo: UndoLog::new(),
            lines: LineIndex::new(),
            config,
        };
        buffer.check_invariants();
        buffer
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_string(String::new())
    }

    /// Read all of `reader` (UTF-8) into a new buffer.
    pub fn from_reader(reader: impl Read) -> Result<Self, BufferError> {
        Self::from_reader_with_config(reader, BufferConfig::default())
    }

    /// Read all of `reader` (UTF-8) into a new buffer with the given configuration.
    pub fn from_reader_with_config(
        mut reader: impl Read,
        config: BufferConfig,
    ) -> Result<Self, BufferError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::with_config(text, config))
    }

    /// Load the file at `path` into a new buffer.
    pub fn from_file(path: impl AsRef<Path>, config: BufferConfig) -> Result<Self, BufferError> {
        Self::from_reader_with_config(File::open(path)?, config)
    }

    /// The buffer's configuration.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Document length in characters.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Document length in bytes.
    pub fn byte_len(&self) -> usize {
        self.chain.byte_len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of pieces currently in the chain.
    pub fn piece_count(&self) -> usize {
        self.chain.piece_count()
    }

    /// The pieces currently in the chain, in document order.
    pub fn pieces(&self) -> &[Piece] {
        self.chain.pieces()
    }

    /// Size of the append buffer in bytes.
    pub fn append_buffer_size(&self) -> usize {
        self.store.append_len()
    }

    /// Number of edits that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// The line-start cache, as filled in so far by [`lazy_lines`](Self::lazy_lines).
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Resolve a character position to a piece and an offset within it.
    pub fn find_coordinate(&self, position: usize) -> Option<Coordinate> {
        self.chain.find_coordinate(position)
    }

    /// Insert `text` at character position `at`.
    pub fn insert(&mut self, text: &str, at: usize) -> Result<(), BufferError> {
        let len = self.chain.len();
        if at > len {
            return Err(BufferError::OutOfRange { position: at, len });
        }
        if text.is_empty() {
            return Ok(());
        }

        let record = match self.chain.find_coordinate(at) {
            // Empty document
            None => {
                let piece = self.append(text);
                self.chain.splice(0..0, [piece]);
                UndoRecord::new(0..1, Vec::new())
            }
            Some(coordinate) if coordinate.offset == 0 => {
                let before = coordinate.index.checked_sub(1);
                match before.filter(|&i| self.extends_append_tail(&self.chain.pieces()[i])) {
                    Some(i) => self.extend_piece(i, text),
                    None => {
                        let piece = self.append(text);
                        let index = coordinate.index;
                        self.chain.splice(index..index, [piece]);
                        UndoRecord::new(index..index + 1, Vec::new())
                    }
                }
            }
            Some(coordinate) if coordinate.offset == coordinate.piece.len() => {
                let index = coordinate.index;
                if self.extends_append_tail(&coordinate.piece) {
                    self.extend_piece(index, text)
                } else {
                    let piece = self.append(text);
                    self.chain.splice(index + 1..index + 1, [piece]);
                    UndoRecord::new(index + 1..index + 2, Vec::new())
                }
            }
            Some(coordinate) => {
                let piece = self.append(text);
                let index = coordinate.index;
                self.chain.split(&self.store, &coordinate);
                self.chain.splice(index + 1..index + 1, [piece]);
                UndoRecord::new(index..index + 3, vec![coordinate.piece])
            }
        };

        trace!(at, chars = text.chars().count(), range = ?record.range, "insert");
        self.undo.push(record);
        self.lines.invalidate_after(at);
        self.check_invariants();
        Ok(())
    }

    /// Delete `length` characters starting at character position `from`.
    pub fn delete(&mut self, from: usize, length: usize) -> Result<(), BufferError> {
        let len = self.chain.len();
        let to = match from.checked_add(length) {
            Some(to) if to <= len => to,
            _ => return Err(BufferError::RangeOutOfBounds { from, length, len }),
        };
        if length == 0 {
            return Ok(());
        }

        let (Some(start), Some(mut end)) =
            (self.chain.find_coordinate(from), self.chain.find_coordinate(to))
        else {
            return Err(BufferError::RangeOutOfBounds { from, length, len });
        };

        let lo = start.index;
        let hi = if end.offset == 0 { end.index } else { end.index + 1 };
        let restore = self.chain.pieces()[lo..hi].to_vec();

        // Cut at the start, shifting the end coordinate onto the split-off suffix.
        let mut first = start.index;
        let mut kept = 0;
        if start.offset > 0 {
            let (_, suffix) = self.chain.split(&self.store, &start);
            first += 1;
            kept += 1;
            if end.index == start.index {
                end = Coordinate {
                    piece: suffix,
                    index: start.index + 1,
                    offset: end.offset - start.offset,
                };
            } else {
                end.index += 1;
            }
        }

        // Cut at the end.
        let last = if end.offset == 0 {
            end.index
        } else if end.offset == end.piece.len() {
            end.index + 1
        } else {
            self.chain.split(&self.store, &end);
            kept += 1;
            end.index + 1
        };

        self.chain.splice(first..last, []);
        let record = UndoRecord::new(lo..lo + kept, restore);

        trace!(from, length, range = ?record.range, "delete");
        self.undo.push(record);
        self.lines.invalidate_after(from);
        self.check_invariants();
        Ok(())
    }

    /// Revert the most recent insert or delete. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo.pop() else {
            return false;
        };

        let changed_at = self.chain.offset_of_index(record.range.start);
        trace!(range = ?record.range, restore = record.restore.len(), "undo");
        record.apply(&mut self.chain);

        self.lines.invalidate_after(changed_at);
        self.check_invariants();
        true
    }

    /// The whole document.
    pub fn contents(&self) -> String {
        let mut result = String::with_capacity(self.byte_len());
        for span in self.lazy_spans(0) {
            result.push_str(span);
        }
        result
    }

    /// The characters in `range`.
    pub fn text_range(&self, range: Range<usize>) -> Result<String, BufferError> {
        let len = self.chain.len();
        if range.start > range.end || range.end > len {
            return Err(BufferError::RangeOutOfBounds {
                from: range.start,
                length: range.end.saturating_sub(range.start),
                len,
            });
        }

        Ok(self
            .lazy_spans(range.start)
            .flat_map(str::chars)
            .take(range.len())
            .collect())
    }

    /// Stream the document as chunks of text, starting at character position `from`.
    ///
    /// A position past the end yields nothing.
    pub fn lazy_spans(&self, from: usize) -> Spans<'_> {
        Spans::new(&self.store, &self.chain, from)
    }

    /// Stream the document line by line, starting at line `from_line` (0-based).
    ///
    /// Lines keep their trailing `'\n'`. Reading extends the line-start cache, so later
    /// calls can start closer to the requested line.
    pub fn lazy_lines(&mut self, from_line: usize) -> Lines<'_> {
        Lines::new(&self.store, &self.chain, &mut self.lines, from_line)
    }

    /// Create a piece for `text` at the end of the append buffer.
    fn append(&mut self, text: &str) -> Piece {
        let start = self.store.append(text);
        Piece::covering(BufferId::Append, start, text)
    }

    /// Whether text appended now would land directly after `piece`.
    fn extends_append_tail(&self, piece: &Piece) -> bool {
        self.config.coalesce_appends
            && piece.buffer == BufferId::Append
            && piece.end() == self.store.append_len()
    }

    /// Append `text` and grow the piece at `index` over it.
    fn extend_piece(&mut self, index: usize, text: &str) -> UndoRecord {
        let piece = self.chain.pieces()[index];
        self.store.append(text);
        self.chain.splice(index..index + 1, [piece.extended_by(text)]);
        UndoRecord::new(index..index + 1, vec![piece])
    }

    fn check_invariants(&self) {
        if !self.config.check_invariants {
            return;
        }

        let mut total = 0;
        for (index, piece) in self.chain.pieces().iter().enumerate() {
            invariant!(self.config, !piece.is_empty(), "piece {index} is empty");
            invariant!(
                self.config,
                piece.end() <= self.store.len_of(piece.buffer),
                "piece {index} ({piece:?}) exceeds its buffer"
            );
            invariant!(
                self.config,
                self.store.is_char_boundary(piece.buffer, piece.start)
                    && self.store.is_char_boundary(piece.buffer, piece.end()),
                "piece {index} ({piece:?}) does not fall on char boundaries"
            );
            invariant!(
                self.config,
                piece.text(&self.store).chars().count() == piece.len(),
                "piece {index} ({piece:?}) has a stale character count"
            );
            total += piece.len();
        }

        invariant!(
            self.config,
            total == self.chain.len(),
            "chain length {} does not match its pieces ({total})",
            self.chain.len()
        );
        invariant!(
            self.config,
            self.lines.is_well_formed(),
            "line index is not strictly increasing: {:?}",
            self.lines.as_slice()
        );
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for Buffer {
    fn from(text: &str) -> Self {
        Self::from_string(text)
    }
}

impl From<String> for Buffer {
    fn from(text: String) -> Self {
        Self::from_string(text)
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lazy_spans(0).try_for_each(|span| f.write_str(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn checked(text: &str) -> Buffer {
        Buffer::with_config(text, BufferConfig::default().with_check_invariants(true))
    }

    #[test]
    fn test_new_buffer() {
        let buffer = checked("Hello, World!");
        assert_eq!(buffer.contents(), "Hello, World!");
        assert_eq!(buffer.len(), 13);
        assert_eq!(buffer.piece_count(), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = Buffer::empty();
        assert_eq!(buffer.contents(), "");
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.piece_count(), 0);
    }

    #[test]
    fn test_insert_into_empty_buffer() {
        let mut buffer = checked("");
        buffer.insert("abc", 0).unwrap();
        assert_eq!(buffer.contents(), "abc");
        assert!(buffer.undo());
        assert_eq!(buffer.contents(), "");
        assert_eq!(buffer.piece_count(), 0);
    }

    #[test]
    fn test_insert_at_start_adds_piece_before() {
        let mut buffer = checked("World");
        buffer.insert("Hello, ", 0).unwrap();
        assert_eq!(buffer.contents(), "Hello, World");
        assert_eq!(buffer.pieces()[0].buffer, BufferId::Append);
        assert_eq!(buffer.piece_count(), 2);
    }

    #[test]
    fn test_insert_in_middle_splits() {
        let mut buffer = checked("Hlo");
        buffer.insert("el", 1).unwrap();
        assert_eq!(buffer.contents(), "Hello");
        assert_eq!(buffer.piece_count(), 3);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut buffer = checked("abc");
        let err = buffer.insert("x", 4).unwrap_err();
        assert!(matches!(err, BufferError::OutOfRange { position: 4, len: 3 }));
        assert_eq!(buffer.contents(), "abc");
        assert_eq!(buffer.append_buffer_size(), 0);
        assert_eq!(buffer.undo_depth(), 0);
    }

    #[test]
    fn test_empty_insert_records_nothing() {
        let mut buffer = checked("abc");
        buffer.insert("", 1).unwrap();
        assert_eq!(buffer.undo_depth(), 0);
        assert_eq!(buffer.piece_count(), 1);
    }

    #[test]
    fn test_typing_at_end_coalesces() {
        let mut buffer = checked("Hello");
        buffer.insert(" ", 5).unwrap();
        buffer.insert("World", 6).unwrap();
        assert_eq!(buffer.contents(), "Hello World");
        assert_eq!(buffer.piece_count(), 2);
        assert_eq!(buffer.undo_depth(), 2);

        assert!(buffer.undo());
        assert_eq!(buffer.contents(), "Hello ");
        assert!(buffer.undo());
        assert_eq!(buffer.contents(), "Hello");
    }

    #[test]
    fn test_typing_in_middle_coalesces() {
        let mut buffer = checked("ad");
        buffer.insert("b", 1).unwrap();
        buffer.insert("c", 2).unwrap();
        assert_eq!(buffer.contents(), "abcd");
        assert_eq!(buffer.piece_count(), 3);

        assert!(buffer.undo());
        assert_eq!(buffer.contents(), "abd");
        assert_eq!(buffer.piece_count(), 3);
    }

    #[test]
    fn test_coalescing_can_be_disabled() {
        let config = BufferConfig::default()
            .with_check_invariants(true)
            .with_coalesce_appends(false);
        let mut buffer = Buffer::with_config("Hello", config);
        buffer.insert(" ", 5).unwrap();
        buffer.insert("World", 6).unwrap();
        assert_eq!(buffer.contents(), "Hello World");
        assert_eq!(buffer.piece_count(), 3);
    }

    #[test]
    fn test_no_coalescing_after_undo() {
        let mut buffer = checked("ab");
        buffer.insert("X", 2).unwrap();
        buffer.insert("Y", 3).unwrap();
        assert!(buffer.undo());
        assert!(buffer.undo());
        buffer.insert("Z", 2).unwrap();
        assert_eq!(buffer.contents(), "abZ");
        assert_eq!(buffer.pieces()[1].start, 2);
    }

    #[test]
    fn test_delete_within_one_piece() {
        let mut buffer = checked("Hello, World");
        buffer.delete(5, 2).unwrap();
        assert_eq!(buffer.contents(), "HelloWorld");
        assert_eq!(buffer.piece_count(), 2);
    }

    #[test]
    fn test_delete_whole_document() {
        let mut buffer = checked("Hello");
        buffer.insert(", World", 5).unwrap();
        buffer.delete(0, 12).unwrap();
        assert_eq!(buffer.contents(), "");
        assert_eq!(buffer.piece_count(), 0);

        assert!(buffer.undo());
        assert_eq!(buffer.contents(), "Hello, World");
    }

    #[test]
    fn test_delete_across_pieces() {
        let mut buffer = checked("abcdef");
        buffer.insert("XYZ", 3).unwrap();
        assert_eq!(buffer.contents(), "abcXYZdef");

        buffer.delete(2, 5).unwrap();
        assert_eq!(buffer.contents(), "abef");
        assert_eq!(buffer.piece_count(), 2);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut buffer = checked("abc");
        assert!(matches!(
            buffer.delete(2, 2),
            Err(BufferError::RangeOutOfBounds { from: 2, length: 2, len: 3 })
        ));
        assert!(matches!(
            buffer.delete(1, usize::MAX),
            Err(BufferError::RangeOutOfBounds { .. })
        ));
        assert_eq!(buffer.contents(), "abc");
        assert_eq!(buffer.undo_depth(), 0);
    }

    #[test]
    fn test_zero_length_delete() {
        let mut buffer = checked("abc");
        buffer.delete(1, 0).unwrap();
        buffer.delete(3, 0).unwrap();
        assert_eq!(buffer.contents(), "abc");
        assert_eq!(buffer.undo_depth(), 0);
        assert!(!buffer.undo());
    }

    #[test]
    fn test_undo_restores_exact_pieces() {
        let mut buffer = checked("one two three");
        buffer.insert("and a ", 4).unwrap();
        let before = buffer.pieces().to_vec();

        buffer.delete(2, 9).unwrap();
        assert!(buffer.undo());
        assert_eq!(buffer.pieces(), before.as_slice());
    }

    #[test]
    fn test_text_range() {
        let mut buffer = checked("Hello, World!");
        buffer.insert("你好 ", 7).unwrap();
        assert_eq!(buffer.text_range(0..5).unwrap(), "Hello");
        assert_eq!(buffer.text_range(7..10).unwrap(), "你好 ");
        assert_eq!(buffer.text_range(9..15).unwrap(), " World");
        assert_eq!(buffer.text_range(16..16).unwrap(), "");
        assert!(buffer.text_range(10..17).is_err());
    }

    #[test]
    fn test_display_matches_contents() {
        let mut buffer = checked("b");
        buffer.insert("a", 0).unwrap();
        buffer.insert("c", 2).unwrap();
        assert_eq!(buffer.to_string(), buffer.contents());
    }

    #[test]
    fn test_from_reader() {
        let buffer = Buffer::from_reader("line one\nline two\n".as_bytes()).unwrap();
        assert_eq!(buffer.contents(), "line one\nline two\n");
    }

    #[test]
    fn test_from_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0x66, 0x6f, 0xff];
        assert!(matches!(
            Buffer::from_reader(bytes),
            Err(BufferError::Io(_))
        ));
    }

    #[test]
    fn test_edit_truncates_line_index() {
        let mut buffer = checked("a\nb\nc\nd\n");
        assert_eq!(buffer.lazy_lines(0).count(), 4);
        assert_eq!(buffer.line_index().as_slice(), &[0, 2, 4, 6, 8]);

        buffer.insert("x\n", 3).unwrap();
        assert_eq!(buffer.line_index().as_slice(), &[0, 2]);
        assert_eq!(
            buffer.lazy_lines(2).collect::<Vec<_>>(),
            vec!["\n", "c\n", "d\n"]
        );

        assert!(buffer.undo());
        assert_eq!(buffer.line_index().as_slice(), &[0]);
        assert_eq!(buffer.lazy_lines(2).collect::<Vec<_>>(), vec!["c\n", "d\n"]);
    }
}
