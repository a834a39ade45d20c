use std::io;

use libc::{c_int, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WNOHANG, WTERMSIG};

use crate::cutils::cerr;
use crate::system::interface::ProcessId;
use crate::system::signal::SignalNumber;

/// Which children a call to [`waitpid`] is allowed to collect.
pub(crate) enum WaitTarget {
    /// Any child of the calling process.
    AnyChild,
    /// The single child with this process ID.
    Child(ProcessId),
}

impl WaitTarget {
    fn pid_spec(&self) -> libc::pid_t {
        match *self {
            WaitTarget::AnyChild => -1,
            WaitTarget::Child(pid) => pid.get(),
        }
    }
}

/// Wait for a child process to change state.
///
/// Blocks until a child matching `target` has terminated, unless
/// [`WaitOptions::no_hang`] was set, in which case it returns
/// [`WaitError::NotReady`] when no child is in a waitable state.
pub(crate) fn waitpid(
    target: WaitTarget,
    options: WaitOptions,
) -> Result<(ProcessId, WaitStatus), WaitError> {
    let mut status: c_int = 0;

    let pid = cerr(unsafe { libc::waitpid(target.pid_spec(), &mut status, options.flags) })
        .map_err(WaitError::Io)?;

    if pid == 0 && options.flags & WNOHANG != 0 {
        return Err(WaitError::NotReady);
    }

    Ok((ProcessId::new(pid), WaitStatus { status }))
}

/// Error values returned when [`waitpid`] fails.
#[derive(Debug)]
pub(crate) enum WaitError {
    // No children were in a waitable state.
    //
    // This is only returned if the [`WaitOptions::no_hang`] option is used.
    NotReady,
    // Regular I/O error.
    Io(io::Error),
}

/// Options to configure how [`waitpid`] waits for children.
pub(crate) struct WaitOptions {
    flags: c_int,
}

impl WaitOptions {
    /// Only wait for terminated children.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Return immediately if no child has exited.
    pub const fn no_hang(mut self) -> Self {
        self.flags |= WNOHANG;
        self
    }
}

/// The status of the waited child.
pub(crate) struct WaitStatus {
    status: c_int,
}

impl std::fmt::Debug for WaitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(exit_status) = self.exit_status() {
            write!(f, "ExitStatus({exit_status})")
        } else if let Some(signal) = self.term_signal() {
            write!(f, "TermSignal({signal})")
        } else {
            write!(f, "Unknown")
        }
    }
}

impl WaitStatus {
    /// Return `true` if the child terminated normally, i.e., by calling `exit`.
    pub const fn did_exit(&self) -> bool {
        WIFEXITED(self.status)
    }

    /// Return the exit status of the child if the child terminated normally.
    pub const fn exit_status(&self) -> Option<c_int> {
        if self.did_exit() {
            Some(WEXITSTATUS(self.status))
        } else {
            None
        }
    }

    /// Return `true` if the child process was terminated by a signal.
    pub const fn was_signaled(&self) -> bool {
        WIFSIGNALED(self.status)
    }

    /// Return the signal number which caused the child to terminate if the child was terminated by
    /// a signal.
    pub const fn term_signal(&self) -> Option<SignalNumber> {
        if self.was_signaled() {
            Some(WTERMSIG(self.status))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use libc::SIGKILL;

    use crate::exec::child_test_lock;
    use crate::system::{
        interface::ProcessId,
        kill,
        wait::{waitpid, WaitError, WaitOptions, WaitTarget},
    };

    #[test]
    fn exit_status() {
        let _guard = child_test_lock();
        let command = std::process::Command::new("sh")
            .args(["-c", "exit 42"])
            .spawn()
            .unwrap();

        let command_pid = ProcessId::new(command.id() as i32);

        let (pid, status) = waitpid(WaitTarget::Child(command_pid), WaitOptions::new()).unwrap();
        assert_eq!(command_pid, pid);
        assert!(status.did_exit());
        assert_eq!(status.exit_status(), Some(42));

        assert!(!status.was_signaled());
        assert!(status.term_signal().is_none());

        // Waiting again for the same child should fail: it was already collected.
        let WaitError::Io(err) =
            waitpid(WaitTarget::Child(command_pid), WaitOptions::new()).unwrap_err()
        else {
            panic!("`WaitError::NotReady` cannot happen without `WaitOptions::no_hang`");
        };
        assert_eq!(err.raw_os_error(), Some(libc::ECHILD));
    }

    #[test]
    fn term_signal() {
        let _guard = child_test_lock();
        let command = std::process::Command::new("sh")
            .args(["-c", "sleep 5"])
            .spawn()
            .unwrap();

        let command_pid = ProcessId::new(command.id() as i32);

        kill(command_pid, SIGKILL).unwrap();

        let (pid, status) = waitpid(WaitTarget::Child(command_pid), WaitOptions::new()).unwrap();
        assert_eq!(command_pid, pid);
        assert!(status.was_signaled());
        assert_eq!(status.term_signal(), Some(SIGKILL));

        assert!(!status.did_exit());
        assert!(status.exit_status().is_none());
    }

    #[test]
    fn no_hang() {
        let _guard = child_test_lock();
        let command = std::process::Command::new("sh")
            .args(["-c", "sleep 0.1; exit 42"])
            .spawn()
            .unwrap();

        let command_pid = ProcessId::new(command.id() as i32);

        let mut not_ready_seen = 0;
        let (pid, status) = loop {
            match waitpid(WaitTarget::Child(command_pid), WaitOptions::new().no_hang()) {
                Ok(ok) => break ok,
                Err(WaitError::NotReady) => not_ready_seen += 1,
                Err(WaitError::Io(err)) => panic!("{err}"),
            }
        };

        assert_eq!(command_pid, pid);
        assert_eq!(status.exit_status(), Some(42));
        assert!(not_ready_seen > 0);
    }

    #[test]
    fn any_child() {
        let _guard = child_test_lock();
        let command = std::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .spawn()
            .unwrap();

        let command_pid = ProcessId::new(command.id() as i32);

        let (pid, status) = loop {
            match waitpid(WaitTarget::AnyChild, WaitOptions::new().no_hang()) {
                Ok(ok) => break ok,
                Err(WaitError::NotReady) => std::thread::yield_now(),
                Err(WaitError::Io(err)) => panic!("{err}"),
            }
        };

        assert_eq!(command_pid, pid);
        assert_eq!(status.exit_status(), Some(3));
    }
}
