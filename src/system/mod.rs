use std::io;

use crate::cutils::cerr;

use self::interface::ProcessId;
use self::signal::SignalNumber;

pub mod interface;

pub mod signal;

pub mod wait;

pub(crate) enum ForkResult {
    // Parent process branch with the child process' PID.
    Parent(ProcessId),
    // Child process branch.
    Child,
}

unsafe fn inner_fork() -> io::Result<ForkResult> {
    let pid = cerr(unsafe { libc::fork() })?;
    if pid == 0 {
        Ok(ForkResult::Child)
    } else {
        Ok(ForkResult::Parent(ProcessId::new(pid)))
    }
}

#[cfg(target_os = "linux")]
/// Create a new process.
pub(crate) fn fork() -> io::Result<ForkResult> {
    // SAFETY: `fork` is implemented using `clone` in linux so we don't need to worry about signal
    // safety.
    unsafe { inner_fork() }
}

#[cfg(not(target_os = "linux"))]
/// Create a new process.
///
/// # Safety
///
/// In a multithreaded program, only async-signal-safe functions are guaranteed to work in the
/// child process until a call to `execve` or a similar function is done.
pub(crate) unsafe fn fork() -> io::Result<ForkResult> {
    inner_fork()
}

/// Terminate the calling process immediately, without running destructors or
/// flushing stdio buffers. This is the only way a forked child that shares the
/// shell's stdio state may exit.
pub(crate) fn _exit(status: libc::c_int) -> ! {
    unsafe { libc::_exit(status) }
}

/// Send a signal to a process with the specified ID.
pub fn kill(pid: ProcessId, signal: SignalNumber) -> io::Result<()> {
    // SAFETY: This function cannot cause UB even if `pid` is not a valid process ID or if
    // `signal` is not a valid signal code.
    cerr(unsafe { libc::kill(pid.get(), signal) }).map(|_| ())
}

/// Return the process identifier for the current process.
pub fn process_id() -> ProcessId {
    // NOTE libstd casts the `i32` that `libc::getpid` returns into `u32`
    // here we cast it back into `i32`
    ProcessId::new(std::process::id() as libc::pid_t)
}

pub fn make_zeroed_sigaction() -> libc::sigaction {
    // SAFETY: since sigaction is a C struct, all-zeroes is a valid representation
    unsafe { std::mem::zeroed() }
}
