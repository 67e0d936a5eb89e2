//! Lazy Readers
//!
//! Iterators that walk the piece chain without materializing the document. Both borrow
//! the buffer for their whole lifetime, so it cannot be edited while one is in use.

use std::slice;
use std::str::Chars;

use crate::line_index::LineIndex;
use crate::piece::{Piece, PieceChain, byte_offset};
use crate::store::DualBuffer;

const NO_PIECES: &[Piece] = &[];

/// Text chunks from a character position to the end of the document.
///
/// Created by [`Buffer::lazy_spans`](crate::Buffer::lazy_spans).
pub struct Spans<'a> {
    store: &'a DualBuffer,
    head: Option<&'a str>,
    rest: slice::Iter<'a, Piece>,
}

impl<'a> Spans<'a> {
    pub(crate) fn new(store: &'a DualBuffer, chain: &'a PieceChain, from: usize) -> Self {
        match chain.find_coordinate(from) {
            Some(coordinate) => {
                let text = coordinate.piece.text(store);
                Self {
                    store,
                    head: Some(&text[byte_offset(text, coordinate.offset)..]),
                    rest: chain.pieces()[coordinate.index + 1..].iter(),
                }
            }
            None => Self {
                store,
                head: None,
                rest: NO_PIECES.iter(),
            },
        }
    }
}

impl<'a> Iterator for Spans<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(head) = self.head.take().filter(|head| !head.is_empty()) {
            return Some(head);
        }
        self.rest.next().map(|piece| piece.text(self.store))
    }
}

/// Lines from a given line number to the end of the document.
///
/// Each line keeps its trailing `'\n'`; a final line without one is yielded as is. Line
/// starts crossed for the first time are added to the buffer's [`LineIndex`].
///
/// Created by [`Buffer::lazy_lines`](crate::Buffer::lazy_lines).
pub struct Lines<'a> {
    store: &'a DualBuffer,
    chars: Chars<'a>,
    rest: slice::Iter<'a, Piece>,
    line_index: &'a mut LineIndex,
    /// Line number of the next line to be scanned
    line: usize,
    /// Character offset of the next character to be scanned
    offset: usize,
    from_line: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(
        store: &'a DualBuffer,
        chain: &'a PieceChain,
        line_index: &'a mut LineIndex,
        from_line: usize,
    ) -> Self {
        let (line, offset) = line_index.seek(from_line);

        let (chars, rest) = match chain.find_coordinate(offset) {
            Some(coordinate) => {
                let text = coordinate.piece.text(store);
                (
                    text[byte_offset(text, coordinate.offset)..].chars(),
                    chain.pieces()[coordinate.index + 1..].iter(),
                )
            }
            None => ("".chars(), NO_PIECES.iter()),
        };

        Self {
            store,
            chars,
            rest,
            line_index,
            line,
            offset,
            from_line,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.chars.next() {
                self.offset += 1;
                return Some(c);
            }
            self.chars = self.rest.next()?.text(self.store).chars();
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let wanted = self.line >= self.from_line;
            let mut text = String::new();
            let mut scanned = 0;
            let mut ended = false;

            while let Some(c) = self.next_char() {
                scanned += 1;
                if wanted {
                    text.push(c);
                }
                if c == '\n' {
                    ended = true;
                    break;
                }
            }

            if scanned == 0 {
                return None;
            }

            if ended {
                self.line += 1;
                self.line_index.record(self.line, self.offset);
            }

            if wanted {
                return Some(text);
            }
        }
    }
}
