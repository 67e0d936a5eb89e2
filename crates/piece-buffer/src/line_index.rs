//! Logical Line Index
//!
//! A cache of line-start character offsets, filled in lazily by [`Lines`](crate::Lines)
//! as it scans text it has not seen before.

use tracing::trace;

/// Cached line starts, in document order.
///
/// Entry `i` is the character offset just after the `i`-th newline; entry 0 is always 0.
/// Entries are strictly increasing. The cache only grows while the document is unchanged;
/// an edit cuts it back to the entries that are still known to be correct.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Create an index that knows only the first line.
    pub fn new() -> Self {
        Self { starts: vec![0] }
    }

    /// Number of known line starts (always at least 1).
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Always false: line 0 is always known.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Character offset of `line`, if cached.
    pub fn get(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Known line starts, in order.
    pub fn as_slice(&self) -> &[usize] {
        &self.starts
    }

    /// The cached line closest to `line` without passing it, as (line, offset).
    pub fn seek(&self, line: usize) -> (usize, usize) {
        let known = line.min(self.starts.len() - 1);
        (known, self.starts[known])
    }

    /// Record that `line` starts at `offset`.
    ///
    /// Only the line directly after the last known one is accepted, and only if its
    /// offset is past the last known start. Returns whether the index grew.
    pub fn record(&mut self, line: usize, offset: usize) -> bool {
        let last = self.starts[self.starts.len() - 1];
        if line != self.starts.len() || offset <= last {
            return false;
        }

        self.starts.push(offset);
        trace!(line, offset, "line index grew");
        true
    }

    /// Drop every cached start after character offset `offset`.
    ///
    /// Called on each edit with the offset where the document first changed: starts up
    /// to and including that offset are unaffected by the edit.
    pub fn invalidate_after(&mut self, offset: usize) {
        let keep = self.starts.partition_point(|&start| start <= offset);
        if keep < self.starts.len() {
            trace!(offset, dropped = self.starts.len() - keep, "line index truncated");
            self.starts.truncate(keep.max(1));
        }
    }

    /// Whether the entries are strictly increasing and start at 0.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.starts.first() == Some(&0) && self.starts.windows(2).all(|w| w[0] < w[1])
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_knows_first_line() {
        let index = LineIndex::new();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0), Some(0));
        assert_eq!(index.get(1), None);
        assert_eq!(index.seek(10), (0, 0));
    }

    #[test]
    fn test_record_only_extends_by_one() {
        let mut index = LineIndex::new();
        assert!(!index.record(2, 8));
        assert!(index.record(1, 4));
        assert!(!index.record(1, 4));
        assert!(!index.record(2, 4));
        assert!(index.record(2, 8));
        assert_eq!(index.as_slice(), &[0, 4, 8]);
        assert!(index.is_well_formed());
    }

    #[test]
    fn test_seek_returns_closest_known_line() {
        let mut index = LineIndex::new();
        index.record(1, 3);
        index.record(2, 7);

        assert_eq!(index.seek(1), (1, 3));
        assert_eq!(index.seek(2), (2, 7));
        assert_eq!(index.seek(40), (2, 7));
    }

    #[test]
    fn test_invalidate_keeps_starts_up_to_offset() {
        let mut index = LineIndex::new();
        index.record(1, 3);
        index.record(2, 7);
        index.record(3, 12);

        index.invalidate_after(7);
        assert_eq!(index.as_slice(), &[0, 3, 7]);

        index.invalidate_after(0);
        assert_eq!(index.as_slice(), &[0]);
    }
}
