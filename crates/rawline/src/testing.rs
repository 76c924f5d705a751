#![forbid(unsafe_code)]

//! Scripted terminal double for session tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::geometry::TermSize;
use crate::renderer::CURSOR_POS_QUERY;
use crate::signal::SignalRelay;
use crate::terminal::{PollRead, Terminal};

/// One item of a scripted input stream. Signal trips are script items so a
/// test can raise a flag at an exact point between keystrokes.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Raw bytes as the terminal would deliver them.
    Bytes(Vec<u8>),
    /// Trip the interrupt flag, as SIGINT delivery would.
    Interrupt,
    /// Trip the resize flag and change the reported size.
    Resize(TermSize),
}

/// In-memory [`Terminal`]: consumes a script, records all output, and
/// answers `ESC [ 6 n` queries from a queue of canned reports.
pub(crate) struct FakeTerminal {
    script: VecDeque<Step>,
    /// Bytes ready to be read (typed-ahead input and query replies).
    pending: VecDeque<u8>,
    /// Canned `(row, col)` replies, one per position query.
    reports: VecDeque<(u16, u16)>,
    /// When set, position queries go unanswered.
    mute_reports: bool,
    pub written: Vec<u8>,
    pub size: TermSize,
    pub query_count: usize,
    pub raw_enters: usize,
    pub raw_leaves: usize,
    interrupted: Arc<AtomicBool>,
    resized: Arc<AtomicBool>,
}

impl FakeTerminal {
    pub fn new(relay: &SignalRelay, size: TermSize) -> Self {
        Self {
            script: VecDeque::new(),
            pending: VecDeque::new(),
            reports: VecDeque::new(),
            mute_reports: false,
            written: Vec::new(),
            size,
            query_count: 0,
            raw_enters: 0,
            raw_leaves: 0,
            interrupted: relay.interrupted_flag(),
            resized: relay.resized_flag(),
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.script.push_back(step);
        self
    }

    pub fn bytes(self, bytes: &[u8]) -> Self {
        self.step(Step::Bytes(bytes.to_vec()))
    }

    /// Queue a canned reply for the next position query.
    pub fn report(mut self, row: u16, col: u16) -> Self {
        self.reports.push_back((row, col));
        self
    }

    /// Seed bytes that are already buffered before the session starts, as
    /// type-ahead racing a position query would be.
    pub fn preload(mut self, bytes: &[u8]) -> Self {
        self.pending.extend(bytes);
        self
    }

    /// Stop answering position queries, as a terminal without DSR support
    /// (or a starved reply) would.
    pub fn mute(mut self) -> Self {
        self.mute_reports = true;
        self
    }
}

impl Terminal for FakeTerminal {
    fn enter_raw(&mut self) -> io::Result<()> {
        self.raw_enters += 1;
        Ok(())
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        self.raw_leaves += 1;
        Ok(())
    }

    fn size(&mut self) -> TermSize {
        self.size
    }

    fn poll_byte(&mut self, _timeout: Duration) -> io::Result<PollRead> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(PollRead::Byte(byte));
        }
        match self.script.pop_front() {
            Some(Step::Bytes(bytes)) => {
                self.pending.extend(bytes);
                match self.pending.pop_front() {
                    Some(byte) => Ok(PollRead::Byte(byte)),
                    None => Ok(PollRead::Empty),
                }
            }
            Some(Step::Interrupt) => {
                self.interrupted.store(true, Ordering::SeqCst);
                Ok(PollRead::Empty)
            }
            Some(Step::Resize(size)) => {
                self.size = size;
                self.resized.store(true, Ordering::SeqCst);
                Ok(PollRead::Empty)
            }
            None => Ok(PollRead::Closed),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        if bytes == CURSOR_POS_QUERY {
            self.query_count += 1;
            if !self.mute_reports {
                let (row, col) = self.reports.pop_front().unwrap_or((1, 1));
                self.pending.extend(format!("\x1b[{row};{col}R").bytes());
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
