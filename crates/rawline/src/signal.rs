#![forbid(unsafe_code)]

//! Signal relay: interrupt and resize flags.
//!
//! The only asynchronous actors in the engine are the SIGINT and SIGWINCH
//! handlers. They communicate with the main loop exclusively through two
//! atomic flags: set in signal-delivery context (signal-hook's flag store
//! is async-signal-safe and performs no allocation or buffered I/O), read
//! and cleared only by the loop via [`SignalRelay::take_interrupted`] /
//! [`SignalRelay::take_resized`]. `AtomicBool` cannot tear under async
//! interruption.
//!
//! Registration is isolated here so the rest of the engine never touches
//! the signal mechanism; tests use [`SignalRelay::detached`] and trip the
//! flags directly.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGWINCH};

/// Interrupt and resize flags, optionally wired to OS signal delivery.
#[derive(Debug)]
pub struct SignalRelay {
    interrupted: Arc<AtomicBool>,
    resized: Arc<AtomicBool>,
    #[cfg(unix)]
    registrations: Vec<signal_hook::SigId>,
}

impl SignalRelay {
    /// Register SIGINT and SIGWINCH handlers that set the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if handler registration fails.
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let resized = Arc::new(AtomicBool::new(false));
        let registrations = vec![
            signal_hook::flag::register(SIGINT, Arc::clone(&interrupted))?,
            signal_hook::flag::register(SIGWINCH, Arc::clone(&resized))?,
        ];
        Ok(Self {
            interrupted,
            resized,
            registrations,
        })
    }

    /// Create a relay with no OS registration. The flags can only be set
    /// through the shared handles; used by tests and headless drivers.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            interrupted: Arc::new(AtomicBool::new(false)),
            resized: Arc::new(AtomicBool::new(false)),
            #[cfg(unix)]
            registrations: Vec::new(),
        }
    }

    /// Consume the interrupt flag. Returns its prior value.
    pub fn take_interrupted(&self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }

    /// Consume the resize flag. Returns its prior value.
    pub fn take_resized(&self) -> bool {
        self.resized.swap(false, Ordering::SeqCst)
    }

    /// Shared handle to the interrupt flag.
    pub(crate) fn interrupted_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Shared handle to the resize flag.
    pub(crate) fn resized_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.resized)
    }
}

impl Drop for SignalRelay {
    fn drop(&mut self) {
        #[cfg(unix)]
        for id in self.registrations.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_flag() {
        let relay = SignalRelay::detached();
        relay.interrupted_flag().store(true, Ordering::SeqCst);
        assert!(relay.take_interrupted());
        assert!(!relay.take_interrupted());
    }

    #[test]
    fn flags_are_independent() {
        let relay = SignalRelay::detached();
        relay.resized_flag().store(true, Ordering::SeqCst);
        assert!(!relay.take_interrupted());
        assert!(relay.take_resized());
        assert!(!relay.take_resized());
    }
}
