#![forbid(unsafe_code)]

//! Decoded input events.

/// One decoded unit of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keystroke.
    Key(KeyCode),

    /// A cursor position report (`ESC [ row ; col R`), the reply half of
    /// the `ESC [ 6 n` status query. 1-indexed.
    CursorReport {
        /// Reported row.
        row: u16,
        /// Reported column.
        col: u16,
    },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A complete codepoint of printable input.
    Char(char),
    /// Line terminator.
    Enter,
    /// DEL (0x7F): delete the codepoint before the cursor.
    Backspace,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Jump to start of line.
    Home,
    /// Jump to end of line.
    End,
    /// Forward delete (`ESC [ 3 ~`).
    Delete,
}
