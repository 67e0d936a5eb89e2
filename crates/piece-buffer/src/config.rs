//! Per-buffer configuration and invariant checking.

/// Settings owned by a [`Buffer`](crate::Buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Verify the chain, buffers and line index after every mutation.
    ///
    /// Defaults to on in debug builds and off in release builds. A failed check panics.
    pub check_invariants: bool,
    /// Grow the piece just before an insertion instead of adding a new one, when that
    /// piece ends exactly at the tail of the append buffer.
    pub coalesce_appends: bool,
}

impl BufferConfig {
    /// Set [`check_invariants`](Self::check_invariants).
    pub fn with_check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Set [`coalesce_appends`](Self::coalesce_appends).
    pub fn with_coalesce_appends(mut self, enabled: bool) -> Self {
        self.coalesce_appends = enabled;
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            check_invariants: cfg!(debug_assertions),
            coalesce_appends: true,
        }
    }
}

/// Panic with `invariant violation: ...` if checks are enabled in `$config` and `$cond`
/// does not hold. With checks disabled, `$cond` is not evaluated.
macro_rules! invariant {
    ($config:expr, $cond:expr, $($arg:tt)+) => {
        if $config.check_invariants && !($cond) {
            panic!("invariant violation: {}", format_args!($($arg)+));
        }
    };
}

pub(crate) use invariant;
