#![forbid(unsafe_code)]

//! The edit session: raw-mode lifecycle, main loop, and cursor resync.
//!
//! An [`Editor`] is constructed once (installing signal handlers and opening
//! the terminal) and then serves any number of [`Editor::read_line`] calls.
//! Each call engages raw mode for its duration and releases it on every
//! exit path — normal completion, interrupt, and error alike — with the
//! backend's `Drop` restoring the mode even on panic.
//!
//! The loop is single-threaded and synchronous: it re-polls the terminal
//! size, consumes the signal flags, and then processes at most one decoded
//! input unit per iteration. A resize iteration repaints without consuming
//! input.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::cursor::CursorPos;
use crate::event::{Event, KeyCode};
use crate::geometry::TermSize;
use crate::input_parser::InputParser;
use crate::line_buffer::LineBuffer;
use crate::renderer;
use crate::signal::SignalRelay;
use crate::terminal::{PollRead, Terminal};
#[cfg(unix)]
use crate::terminal::TtyTerminal;

/// How long one loop iteration waits for input before re-checking flags.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Per-attempt wait while a position report is outstanding.
const REPORT_POLL: Duration = Duration::from_millis(10);

/// Read attempts before giving up on a position report.
const MAX_REPORT_READS: usize = 32;

/// Outcome of one input-acquisition step.
enum Step {
    Event(Event),
    Idle,
    Eof,
}

/// A line-editing session over a [`Terminal`].
pub struct Editor<T: Terminal> {
    term: T,
    signals: SignalRelay,
    parser: InputParser,
    /// Events decoded ahead of the loop (type-ahead drained while waiting
    /// for a position report).
    events: VecDeque<Event>,
    cursor: CursorPos,
    size: TermSize,
}

#[cfg(unix)]
impl Editor<TtyTerminal> {
    /// Open the controlling terminal and install signal handlers.
    ///
    /// # Errors
    ///
    /// Fails when there is no controlling terminal or handler registration
    /// is rejected.
    pub fn new() -> io::Result<Self> {
        Ok(Self::with_terminal(
            TtyTerminal::open()?,
            SignalRelay::install()?,
        ))
    }
}

impl<T: Terminal> Editor<T> {
    /// Build a session over an arbitrary backend and relay.
    pub fn with_terminal(term: T, signals: SignalRelay) -> Self {
        Self {
            term,
            signals,
            parser: InputParser::new(),
            events: VecDeque::new(),
            cursor: CursorPos::origin(),
            size: TermSize::default(),
        }
    }

    /// Read one line of input, blocking until Enter, end of input, or
    /// interrupt.
    ///
    /// The prompt is re-emitted on every repaint. An interrupt yields an
    /// empty string, never partial content. Ownership of the returned text
    /// passes to the caller.
    ///
    /// # Errors
    ///
    /// Terminal I/O failures and buffer allocation failure are fatal to the
    /// call; raw mode is still released.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.term.enter_raw()?;
        let result = self.edit_loop(prompt);
        let restored = self.term.leave_raw();
        let line = result?;
        restored?;
        Ok(line)
    }

    fn edit_loop(&mut self, prompt: &str) -> io::Result<String> {
        let prompt_cells = prompt.chars().count();
        let mut buffer = LineBuffer::new();

        // Any parser state or queued events from a previous call are stale.
        self.parser = InputParser::new();
        self.events.clear();
        self.size = self.term.size();

        self.term.write_all(renderer::SAVE_CURSOR)?;
        self.term.write_all(prompt.as_bytes())?;
        self.term.flush()?;
        self.cursor = self.query_cursor()?;

        loop {
            self.size = self.term.size();

            if self.signals.take_interrupted() {
                #[cfg(feature = "tracing")]
                tracing::debug!("interrupt observed, abandoning edit");
                self.term.write_all(b"^C")?;
                self.term.flush()?;
                buffer.clear();
                break;
            }

            if self.signals.take_resized() {
                self.resync_after_resize(prompt_cells + buffer.len_codepoints())?;
                renderer::repaint(&mut self.term, prompt, &buffer, self.cursor)?;
                // No input byte is consumed on a resize iteration.
                continue;
            }

            match self.next_step()? {
                Step::Idle => continue,
                Step::Eof => break,
                Step::Event(Event::Key(KeyCode::Enter)) => break,
                Step::Event(Event::Key(key)) => {
                    self.dispatch_key(key, prompt, &mut buffer)?;
                }
                // A report from an abandoned query window; nothing waits
                // for it anymore.
                Step::Event(Event::CursorReport { .. }) => continue,
            }
        }

        self.term.write_all(b"\n")?;
        self.term.flush()?;
        Ok(buffer.into_string())
    }

    /// Pop a queued event or decode at most one fresh input byte.
    fn next_step(&mut self) -> io::Result<Step> {
        if let Some(event) = self.events.pop_front() {
            return Ok(Step::Event(event));
        }
        match self.term.poll_byte(POLL_INTERVAL)? {
            PollRead::Byte(byte) => Ok(match self.parser.process_byte(byte) {
                Some(event) => Step::Event(event),
                None => Step::Idle,
            }),
            PollRead::Empty => Ok(Step::Idle),
            PollRead::Closed => Ok(Step::Eof),
        }
    }

    fn dispatch_key(
        &mut self,
        key: KeyCode,
        prompt: &str,
        buffer: &mut LineBuffer,
    ) -> io::Result<()> {
        match key {
            KeyCode::Char(ch) => {
                buffer.insert(ch)?;
                self.advance_cursor()?;
                renderer::repaint(&mut self.term, prompt, buffer, self.cursor)?;
            }
            KeyCode::Backspace => {
                if buffer.delete_before_cursor() {
                    self.cursor.retreat(self.size);
                    renderer::repaint(&mut self.term, prompt, buffer, self.cursor)?;
                }
            }
            KeyCode::Delete => {
                if buffer.delete_at_cursor() {
                    renderer::repaint(&mut self.term, prompt, buffer, self.cursor)?;
                }
            }
            KeyCode::Left => {
                if buffer.cursor_left() {
                    self.cursor.retreat(self.size);
                    self.place_cursor()?;
                }
            }
            KeyCode::Right => {
                if buffer.cursor_right() {
                    self.advance_cursor()?;
                    self.place_cursor()?;
                }
            }
            KeyCode::Home => {
                let mut moved = false;
                while buffer.cursor_left() {
                    self.cursor.retreat(self.size);
                    moved = true;
                }
                if moved {
                    self.place_cursor()?;
                }
            }
            KeyCode::End => {
                let mut moved = false;
                while buffer.cursor_right() {
                    self.advance_cursor()?;
                    moved = true;
                }
                if moved {
                    self.place_cursor()?;
                }
            }
            KeyCode::Enter => {}
        }
        Ok(())
    }

    /// Move the hardware cursor to the tracked position.
    fn place_cursor(&mut self) -> io::Result<()> {
        renderer::move_to(&mut self.term, self.cursor)?;
        self.term.flush()
    }

    /// One tracked-cursor step right, running scroll recovery first when
    /// the move leaves the bottom-right cell.
    ///
    /// The terminal scrolls its viewport as a side effect of output past
    /// the last row, which no arithmetic model can see. Recovery: emit the
    /// newline, jump to the (now stale) prompt anchor, ask the terminal
    /// where that really is, re-save the anchor one row up, and drop the
    /// tracked row by one before the ordinary wrap.
    fn advance_cursor(&mut self) -> io::Result<()> {
        if self.cursor.at_last_cell(self.size) {
            self.term.write_all(b"\n")?;
            self.term.write_all(renderer::RESTORE_CURSOR)?;
            self.term.flush()?;
            let anchor = self.query_cursor()?;
            let re_anchored = CursorPos::new(anchor.x, anchor.y.saturating_sub(1).max(1));
            renderer::move_to(&mut self.term, re_anchored)?;
            self.term.write_all(renderer::SAVE_CURSOR)?;
            self.term.flush()?;
            self.cursor.y = self.cursor.y.saturating_sub(1).max(1);
            #[cfg(feature = "tracing")]
            tracing::trace!(row = self.cursor.y, "re-anchored after viewport scroll");
        }
        self.cursor.advance(self.size);
        Ok(())
    }

    /// Recompute the tracked cursor after a window resize: re-poll the
    /// geometry, restore to the prompt anchor, ask the terminal where the
    /// anchor is, then walk the navigation model forward over the prompt
    /// and the buffer's full codepoint count.
    fn resync_after_resize(&mut self, cells: usize) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!(cells, "resize observed, resyncing cursor");
        self.size = self.term.size();
        self.term.write_all(renderer::RESTORE_CURSOR)?;
        self.term.flush()?;
        self.cursor = self.query_cursor()?;
        for _ in 0..cells {
            self.advance_cursor()?;
        }
        Ok(())
    }

    /// Cursor position oracle: round-trip `ESC [ 6 n` for the terminal's
    /// true cursor coordinates.
    ///
    /// The reply is decoded by the same state machine as keystrokes, so
    /// type-ahead racing the report is queued as ordinary events rather
    /// than corrupting the parse. The wait is bounded; if no report
    /// arrives, the last tracked position stands (best effort, no error).
    fn query_cursor(&mut self) -> io::Result<CursorPos> {
        self.term.write_all(renderer::CURSOR_POS_QUERY)?;
        self.term.flush()?;
        for _ in 0..MAX_REPORT_READS {
            match self.term.poll_byte(REPORT_POLL)? {
                PollRead::Byte(byte) => {
                    if let Some(event) = self.parser.process_byte(byte) {
                        if let Event::CursorReport { row, col } = event {
                            return Ok(CursorPos::new(col.max(1), row.max(1)));
                        }
                        self.events.push_back(event);
                    }
                }
                PollRead::Empty => {}
                PollRead::Closed => break,
            }
        }
        #[cfg(feature = "tracing")]
        tracing::warn!("cursor position report missing or malformed");
        Ok(self.cursor)
    }
}

/// One-shot convenience: open a session, read a single line, tear down.
///
/// # Errors
///
/// See [`Editor::new`] and [`Editor::read_line`].
#[cfg(unix)]
pub fn read_line(prompt: &str) -> io::Result<String> {
    Editor::new()?.read_line(prompt)
}
