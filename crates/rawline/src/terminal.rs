#![forbid(unsafe_code)]

//! Terminal platform seam and the native Unix backend.
//!
//! The engine talks to the terminal exclusively through the [`Terminal`]
//! trait: raw-mode entry/exit, size queries, bounded single-byte reads, and
//! writes. Keeping the seam this narrow lets the session logic run against
//! a scripted double in tests and keeps it signal- and termios-agnostic.
//!
//! # Raw mode
//!
//! [`TtyTerminal`] clears only `ICANON` and `ECHO`: input arrives unbuffered
//! and unechoed, while `ISIG` keeps Ctrl-C delivering SIGINT (consumed as a
//! flag by the session) and `ICRNL` keeps Enter arriving as `\n`. The
//! original attributes are captured on entry and restored on [`leave_raw`],
//! with a `Drop` backstop so no exit path leaves the terminal raw.
//!
//! [`leave_raw`]: Terminal::leave_raw

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::geometry::TermSize;

/// Outcome of a bounded read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollRead {
    /// One input byte.
    Byte(u8),
    /// Nothing arrived within the timeout (or the wait was interrupted).
    Empty,
    /// End of input; no further bytes will arrive.
    Closed,
}

/// The engine's view of a terminal.
pub trait Terminal {
    /// Switch to raw (non-canonical, non-echoing) input mode, capturing the
    /// previous mode.
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Restore the mode captured by [`enter_raw`](Terminal::enter_raw).
    /// Idempotent.
    fn leave_raw(&mut self) -> io::Result<()>;

    /// Current terminal dimensions. Falls back to a conventional default
    /// when the query fails; never errors.
    fn size(&mut self) -> TermSize;

    /// Wait up to `timeout` for one input byte.
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<PollRead>;

    /// Queue output bytes.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Push queued output to the terminal.
    fn flush(&mut self) -> io::Result<()>;
}

/// Native Unix terminal: reads `/dev/tty`, writes stdout.
#[cfg(unix)]
pub struct TtyTerminal {
    tty: std::fs::File,
    out: io::Stdout,
    /// Original termios, held while raw mode is engaged.
    saved: Option<nix::sys::termios::Termios>,
}

#[cfg(unix)]
impl TtyTerminal {
    /// Open the controlling terminal.
    ///
    /// # Errors
    ///
    /// Fails when `/dev/tty` cannot be opened (no controlling terminal).
    pub fn open() -> io::Result<Self> {
        let tty = std::fs::File::open("/dev/tty")?;
        Ok(Self {
            tty,
            out: io::stdout(),
            saved: None,
        })
    }
}

#[cfg(unix)]
impl Terminal for TtyTerminal {
    fn enter_raw(&mut self) -> io::Result<()> {
        use nix::sys::termios::{self, LocalFlags, SetArg};

        if self.saved.is_some() {
            return Ok(());
        }
        let original = termios::tcgetattr(&self.tty).map_err(io::Error::other)?;
        let mut raw = original.clone();
        raw.local_flags
            .remove(LocalFlags::ICANON | LocalFlags::ECHO);
        termios::tcsetattr(&self.tty, SetArg::TCSADRAIN, &raw).map_err(io::Error::other)?;
        self.saved = Some(original);
        #[cfg(feature = "tracing")]
        tracing::debug!("terminal raw mode enabled");
        Ok(())
    }

    fn leave_raw(&mut self) -> io::Result<()> {
        use nix::sys::termios::{self, SetArg};

        if let Some(original) = self.saved.take() {
            termios::tcsetattr(&self.tty, SetArg::TCSANOW, &original)
                .map_err(io::Error::other)?;
            #[cfg(feature = "tracing")]
            tracing::debug!("terminal raw mode disabled");
        }
        Ok(())
    }

    fn size(&mut self) -> TermSize {
        if let Ok(ws) = rustix::termios::tcgetwinsize(&self.tty) {
            if ws.ws_col > 0 && ws.ws_row > 0 {
                return TermSize::new(ws.ws_col, ws.ws_row);
            }
        }
        TermSize::default()
    }

    fn poll_byte(&mut self, timeout: Duration) -> io::Result<PollRead> {
        use std::os::fd::AsFd;

        let ready = {
            let mut poll_fds = [nix::poll::PollFd::new(
                self.tty.as_fd(),
                nix::poll::PollFlags::POLLIN,
            )];
            let timeout_ms: u16 = timeout.as_millis().try_into().unwrap_or(u16::MAX);
            match nix::poll::poll(&mut poll_fds, nix::poll::PollTimeout::from(timeout_ms)) {
                Ok(n) => n,
                // poll(2) is not restarted by SA_RESTART; a signal landing
                // here wakes the loop so it can consume the relay flags.
                Err(nix::errno::Errno::EINTR) => return Ok(PollRead::Empty),
                Err(e) => return Err(io::Error::other(e)),
            }
        };
        if ready == 0 {
            return Ok(PollRead::Empty);
        }

        let mut buf = [0u8; 1];
        match self.tty.read(&mut buf) {
            Ok(0) => Ok(PollRead::Closed),
            Ok(_) => Ok(PollRead::Byte(buf[0])),
            Err(ref e)
                if e.kind() == io::ErrorKind::Interrupted
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(PollRead::Empty)
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(unix)]
impl Drop for TtyTerminal {
    fn drop(&mut self) {
        // Best-effort restore - ignore errors during cleanup.
        let _ = self.leave_raw();
    }
}

// Note: tests that actually toggle raw mode would interfere with the test
// runner's terminal state, so TtyTerminal is exercised interactively via
// the demo binary. Session logic is tested against a scripted Terminal
// implementation in editor.rs.
