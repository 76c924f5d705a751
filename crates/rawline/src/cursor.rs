#![forbid(unsafe_code)]

//! Screen cursor tracking: the pure half of the navigation model.
//!
//! Left moves and in-row right moves are plain arithmetic over the current
//! [`TermSize`]. A right move out of the bottom-right cell is *not* pure:
//! the terminal scrolls its viewport as a side effect of further output,
//! which no arithmetic model can observe. Callers detect that case with
//! [`CursorPos::at_last_cell`] and run the scroll-recovery protocol (emit a
//! newline, re-query the true position, re-anchor) before calling
//! [`CursorPos::advance`].

use crate::geometry::TermSize;

/// 1-indexed screen coordinates, as used by the terminal's own addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    /// Column, starting at 1.
    pub x: u16,
    /// Row, starting at 1.
    pub y: u16,
}

impl CursorPos {
    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(1, 1)
    }

    /// Move one cell left, wrapping to the last column of the previous row
    /// when at column 1 on a multi-row terminal.
    pub fn retreat(&mut self, size: TermSize) {
        if self.x <= 1 && size.height > 1 {
            self.x = size.width;
            self.y = self.y.saturating_sub(1).max(1);
            return;
        }
        self.x = self.x.saturating_sub(1).max(1);
    }

    /// True when a right move from here will make the terminal scroll.
    #[inline]
    #[must_use]
    pub const fn at_last_cell(&self, size: TermSize) -> bool {
        self.x >= size.width && self.y >= size.height
    }

    /// Move one cell right, wrapping to column 1 of the next row at the
    /// last column. Scroll recovery (if needed) must already have run.
    pub fn advance(&mut self, size: TermSize) {
        if self.x >= size.width {
            self.x = 1;
            self.y = self.y.saturating_add(1);
            return;
        }
        self.x += 1;
    }
}

impl Default for CursorPos {
    fn default() -> Self {
        Self::origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: TermSize = TermSize::new(10, 4);

    #[test]
    fn retreat_within_row_decrements_column() {
        let mut pos = CursorPos::new(5, 2);
        pos.retreat(SIZE);
        assert_eq!(pos, CursorPos::new(4, 2));
    }

    #[test]
    fn retreat_at_column_one_wraps_to_previous_row() {
        let mut pos = CursorPos::new(1, 2);
        pos.retreat(SIZE);
        assert_eq!(pos, CursorPos::new(10, 1));
    }

    #[test]
    fn retreat_on_single_row_terminal_never_wraps() {
        let one_row = TermSize::new(10, 1);
        let mut pos = CursorPos::new(1, 1);
        pos.retreat(one_row);
        assert_eq!(pos, CursorPos::new(1, 1));
    }

    #[test]
    fn advance_within_row_increments_column() {
        let mut pos = CursorPos::new(3, 1);
        pos.advance(SIZE);
        assert_eq!(pos, CursorPos::new(4, 1));
    }

    #[test]
    fn advance_at_last_column_wraps_to_next_row() {
        let mut pos = CursorPos::new(10, 2);
        pos.advance(SIZE);
        assert_eq!(pos, CursorPos::new(1, 3));
    }

    #[test]
    fn last_cell_detection() {
        assert!(CursorPos::new(10, 4).at_last_cell(SIZE));
        assert!(!CursorPos::new(10, 3).at_last_cell(SIZE));
        assert!(!CursorPos::new(9, 4).at_last_cell(SIZE));
    }
}
