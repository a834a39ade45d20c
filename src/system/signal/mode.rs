use std::sync::atomic::{AtomicBool, Ordering};

use super::SignalNumber;

/// Shell-wide execution mode, toggled by the suspend signal (SIGTSTP).
///
/// While `ForegroundOnly` is active the dispatch loop runs every command
/// synchronously, regardless of a requested `&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal,
    ForegroundOnly,
}

static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

impl Mode {
    /// The mode the shell is currently in.
    pub(crate) fn current() -> Mode {
        if FOREGROUND_ONLY.load(Ordering::SeqCst) {
            Mode::ForegroundOnly
        } else {
            Mode::Normal
        }
    }

    /// Notice announcing that this mode was just entered. Written from the
    /// signal handler with a raw `write(2)`, so it must be a fixed byte string.
    const fn notice(self) -> &'static [u8] {
        match self {
            Mode::Normal => b"\nExiting foreground-only mode\n",
            Mode::ForegroundOnly => b"\nEntering foreground-only mode (& is now ignored)\n",
        }
    }
}

/// Flip the mode and return the state that was entered.
///
/// This is the whole transition table: each delivery of the suspend signal
/// moves to the other state, so toggling twice is the identity.
fn transition() -> Mode {
    if FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst) {
        Mode::Normal
    } else {
        Mode::ForegroundOnly
    }
}

/// Suspend-signal handler. Restricted to async-signal-safe operations: one
/// atomic flip and one `write(2)` of a fixed notice, never buffered formatted
/// output.
pub(super) extern "C" fn toggle_mode(_signal: SignalNumber) {
    let notice = transition().notice();

    // SAFETY: `notice` is a valid static buffer of the given length.
    unsafe { libc::write(libc::STDOUT_FILENO, notice.as_ptr().cast(), notice.len()) };
}
