#![warn(missing_docs)]
//! Piece Buffer - An Editable Text Buffer on a Piece Chain
//!
//! # Overview
//!
//! `piece-buffer` keeps a document as two texts and a list of references into them:
//! the read-only source the buffer was created from, an append-only buffer holding every
//! inserted string, and a chain of pieces that says which spans, in which order, make up
//! the current document. Edits splice the chain; they never copy or rewrite text.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Buffer (insert / delete / undo / read)     │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Undo Log            │  Lazy Readers        │
//! │  (splice records)    │  + Line Index cache  │
//! ├──────────────────────┴──────────────────────┤
//! │  Piece Chain (lookup, split, splice)        │
//! ├─────────────────────────────────────────────┤
//! │  Dual Buffer Store (source + append)        │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use piece_buffer::Buffer;
//!
//! let mut buffer = Buffer::from_string("one two three");
//! buffer.insert("zero ", 0).unwrap();
//! buffer.delete(9, 4).unwrap();
//! assert_eq!(buffer.contents(), "zero one three");
//!
//! assert!(buffer.undo());
//! assert_eq!(buffer.contents(), "zero one two three");
//! ```
//!
//! ## Reading lines lazily
//!
//! ```rust
//! use piece_buffer::Buffer;
//!
//! let mut buffer = Buffer::from_string("a\nb\nc\n");
//! let lines: Vec<String> = buffer.lazy_lines(1).collect();
//! assert_eq!(lines, ["b\n", "c\n"]);
//! ```
//!
//! # Module Description
//!
//! - [`store`] - source and append buffers
//! - [`piece`] - pieces, coordinates and the piece chain
//! - [`undo`] - undo records and the undo log
//! - [`line_index`] - lazily filled line-start cache
//! - [`reader`] - span and line iterators
//! - [`config`] - per-buffer settings and invariant checks
//!
//! # Threading
//!
//! Everything is synchronous. Reading lines updates the line cache, so
//! [`Buffer::lazy_lines`] needs `&mut Buffer`; share a buffer across threads behind a
//! lock. A reader borrows the buffer until it is dropped, which keeps edits from
//! happening mid-iteration.

mod buffer;
pub mod config;
mod error;
pub mod line_index;
pub mod piece;
pub mod reader;
pub mod store;
pub mod undo;

pub use buffer::Buffer;
pub use config::BufferConfig;
pub use error::BufferError;
pub use line_index::LineIndex;
pub use piece::{Coordinate, Piece, PieceChain};
pub use reader::{Lines, Spans};
pub use store::{BufferId, DualBuffer};
pub use undo::{UndoLog, UndoRecord};
