#![forbid(unsafe_code)]

//! Repaint logic and the emitted escape-sequence vocabulary.
//!
//! The rendered region is one short-lived input line, so the renderer uses
//! a full-repaint strategy: jump back to the saved prompt anchor, clear
//! everything below, re-emit prompt and buffer, then park the hardware
//! cursor at the tracked position. No diffing.

use std::io;

use crate::cursor::CursorPos;
use crate::line_buffer::LineBuffer;
use crate::terminal::Terminal;

/// DEC cursor save (DECSC): `ESC 7`. Anchors the prompt start.
pub(crate) const SAVE_CURSOR: &[u8] = b"\x1b7";

/// DEC cursor restore (DECRC): `ESC 8`. Returns to the prompt anchor.
pub(crate) const RESTORE_CURSOR: &[u8] = b"\x1b8";

/// Clear from the cursor to the end of the screen: `ESC [ J`.
pub(crate) const CLEAR_DOWN: &[u8] = b"\x1b[J";

/// Device status report request (DSR 6): `ESC [ 6 n`. The terminal replies
/// `ESC [ row ; col R`.
pub(crate) const CURSOR_POS_QUERY: &[u8] = b"\x1b[6n";

/// Move the hardware cursor to an absolute position: `ESC [ row ; col H`.
pub(crate) fn move_to(term: &mut impl Terminal, pos: CursorPos) -> io::Result<()> {
    let seq = format!("\x1b[{};{}H", pos.y, pos.x);
    term.write_all(seq.as_bytes())
}

/// Repaint prompt and buffer in place and park the cursor.
pub(crate) fn repaint(
    term: &mut impl Terminal,
    prompt: &str,
    buffer: &LineBuffer,
    cursor: CursorPos,
) -> io::Result<()> {
    term.write_all(RESTORE_CURSOR)?;
    term.write_all(CLEAR_DOWN)?;
    term.write_all(prompt.as_bytes())?;
    term.write_all(buffer.as_str().as_bytes())?;
    move_to(term, cursor)?;
    term.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TermSize;
    use crate::signal::SignalRelay;
    use crate::testing::FakeTerminal;

    #[test]
    fn repaint_emits_anchor_clear_content_and_cup() {
        let relay = SignalRelay::detached();
        let mut term = FakeTerminal::new(&relay, TermSize::new(80, 24));
        let mut buffer = LineBuffer::new();
        for ch in "abc".chars() {
            buffer.insert(ch).unwrap();
        }

        repaint(&mut term, "> ", &buffer, CursorPos::new(6, 3)).unwrap();

        assert_eq!(term.written, b"\x1b8\x1b[J> abc\x1b[3;6H");
    }
}
