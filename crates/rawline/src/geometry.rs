#![forbid(unsafe_code)]

//! Terminal geometry.

/// Terminal dimensions in character cells.
///
/// Transient by design: the main loop re-polls the size every iteration and
/// after a resize signal, so a stale value never survives more than one
/// input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl TermSize {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for TermSize {
    /// Conventional fallback when the terminal cannot be queried.
    fn default() -> Self {
        Self::new(80, 24)
    }
}
