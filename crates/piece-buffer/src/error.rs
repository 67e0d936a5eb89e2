use thiserror::Error;

#[derive(Debug, Error)]
/// Errors reported by [`Buffer`](crate::Buffer) operations.
pub enum BufferError {
    #[error("position {position} is outside the document (length {len})")]
    /// A position past the end of the document.
    OutOfRange {
        /// The requested character position.
        position: usize,
        /// Document length in characters.
        len: usize,
    },

    #[error("range {from}+{length} is outside the document (length {len})")]
    /// A range that ends past the end of the document.
    RangeOutOfBounds {
        /// Start character position.
        from: usize,
        /// Requested length in characters.
        length: usize,
        /// Document length in characters.
        len: usize,
    },

    #[error("I/O error: {0}")]
    /// Reading the initial text failed.
    Io(#[from] std::io::Error),
}
