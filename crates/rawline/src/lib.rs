#![forbid(unsafe_code)]

//! Raw-mode terminal line editing.
//!
//! `rawline` is a drop-in replacement for a blocking "read one line from the
//! terminal" primitive: cursor navigation, UTF-8-aware insertion and
//! deletion, and live adaptation to window resizes, all while the terminal
//! is in raw (non-canonical, non-echoing) input mode.
//!
//! The engine keeps the on-screen cursor consistent with the terminal's own
//! behavior — including true viewport scrolling past the last row, which no
//! arithmetic model can observe — by round-tripping cursor position reports
//! (`ESC [ 6 n` / `ESC [ row ; col R`) whenever its tracked state becomes
//! ambiguous.
//!
//! # Quick start
//!
//! ```no_run
//! let line = rawline::read_line(">> ")?;
//! println!("{line}");
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! For repeated reads, keep one [`Editor`] around; construction installs
//! the SIGINT/SIGWINCH handlers and opens the controlling terminal once:
//!
//! ```no_run
//! use rawline::Editor;
//!
//! let mut editor = Editor::new()?;
//! loop {
//!     let line = editor.read_line(">> ")?;
//!     if line == "exit" {
//!         break;
//!     }
//!     println!("{line}");
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Lifecycle guarantees
//!
//! - Raw mode is engaged for the duration of each read and released on
//!   every exit path: Enter, end of input, interrupt, and error. The
//!   backend's `Drop` restores the original mode even on panic.
//! - An interrupt (Ctrl-C) abandons the edit and yields an empty line,
//!   never partial content.
//! - A window resize mid-edit triggers a cursor resync and a full repaint;
//!   buffer content is untouched.

pub mod cursor;
pub mod editor;
pub mod event;
pub mod geometry;
pub mod input_parser;
pub mod line_buffer;
mod renderer;
pub mod signal;
pub mod terminal;

#[cfg(test)]
mod testing;

pub use cursor::CursorPos;
pub use editor::Editor;
#[cfg(unix)]
pub use editor::read_line;
pub use event::{Event, KeyCode};
pub use geometry::TermSize;
pub use input_parser::InputParser;
pub use line_buffer::LineBuffer;
pub use signal::SignalRelay;
pub use terminal::{PollRead, Terminal};
#[cfg(unix)]
pub use terminal::TtyTerminal;
