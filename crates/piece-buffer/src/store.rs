//! Dual Buffer Store
//!
//! Holds the two texts every piece points into: the read-only source the buffer was
//! created from, and the append-only buffer that collects all inserted text.

/// Buffer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    /// Read-only source buffer
    Source,
    /// Append-only buffer
    Append,
}

/// The source and append buffers.
///
/// Offsets are UTF-8 byte offsets. Neither buffer is ever truncated or rewritten, so a
/// span that was valid once stays valid for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct DualBuffer {
    source: String,
    append: String,
}

impl DualBuffer {
    /// Create a store over `source` with an empty append buffer.
    pub fn new(source: String) -> Self {
        Self {
            source,
            append: String::new(),
        }
    }

    /// Read `byte_len` bytes starting at `start` from the given buffer.
    ///
    /// # Panics
    ///
    /// Panics if the span is out of bounds or does not fall on `char` boundaries. Pieces
    /// never describe such spans, so this is a programming error.
    pub fn slice(&self, buffer: BufferId, start: usize, byte_len: usize) -> &str {
        &self.buffer(buffer)[start..start + byte_len]
    }

    /// Append `text` to the append buffer, returning the offset it was written at.
    pub fn append(&mut self, text: &str) -> usize {
        let offset = self.append.len();
        self.append.push_str(text);
        offset
    }

    /// Byte length of the source buffer.
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Byte length of the append buffer (for memory accounting).
    pub fn append_len(&self) -> usize {
        self.append.len()
    }

    /// Byte length of the given buffer.
    pub fn len_of(&self, buffer: BufferId) -> usize {
        self.buffer(buffer).len()
    }

    /// Whether `offset` is a `char` boundary in the given buffer.
    pub(crate) fn is_char_boundary(&self, buffer: BufferId, offset: usize) -> bool {
        self.buffer(buffer).is_char_boundary(offset)
    }

    fn buffer(&self, buffer: BufferId) -> &str {
        match buffer {
            BufferId::Source => &self.source,
            BufferId::Append => &self.append,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_previous_length() {
        let mut store = DualBuffer::new("source".to_string());
        assert_eq!(store.append("abc"), 0);
        assert_eq!(store.append("你好"), 3);
        assert_eq!(store.append_len(), 9);
        assert_eq!(store.source_len(), 6);
    }

    #[test]
    fn test_slice_reads_both_buffers() {
        let mut store = DualBuffer::new("Hello, World".to_string());
        store.append("👋 there");

        assert_eq!(store.slice(BufferId::Source, 7, 5), "World");
        assert_eq!(store.slice(BufferId::Append, 0, 4), "👋");
        assert_eq!(store.slice(BufferId::Append, 4, 6), " there");
    }

    #[test]
    fn test_appending_keeps_earlier_spans_valid() {
        let mut store = DualBuffer::default();
        let first = store.append("one");
        let second = store.append("two");
        assert_eq!(store.slice(BufferId::Append, first, 3), "one");
        assert_eq!(store.slice(BufferId::Append, second, 3), "two");
    }

    #[test]
    #[should_panic]
    fn test_slice_out_of_bounds_panics() {
        let store = DualBuffer::new("abc".to_string());
        let _ = store.slice(BufferId::Source, 2, 5);
    }
}
