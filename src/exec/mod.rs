use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::AsRawFd,
    os::unix::fs::OpenOptionsExt,
    path::Path,
};

use crate::common::{CommandDescriptor, Error};
use crate::cutils::{cerr, cstring};
use crate::log::dev_warn;
use crate::system::{
    self, fork,
    interface::ProcessId,
    signal::{consts::*, SignalHandler, SignalHandlerBehavior, SignalSet},
    wait::{waitpid, WaitError, WaitOptions, WaitTarget},
    ForkResult,
};

/// Status a child terminates with when its launch fails before or during
/// image replacement.
pub(crate) const EXEC_FAILURE_STATUS: i32 = 1;

const NULL_DEVICE: &str = "/dev/null";

/// Run a command synchronously as a foreground child.
///
/// Returns the recorded status: the exit code of the child, or the negated
/// signal number if it was terminated by a signal. The suspend signal is
/// blocked for the whole launch so a mode toggle cannot race it; it is
/// unblocked unconditionally once the wait returns.
pub(crate) fn spawn_foreground(cmd: &CommandDescriptor) -> Result<i32, Error> {
    let suspend = SignalSet::single(SIGTSTP)?;
    suspend.block()?;

    let pid = match fork() {
        Ok(ForkResult::Parent(pid)) => pid,
        Ok(ForkResult::Child) => {
            // The child inherits the shell's ignored SIGINT disposition;
            // restore the default so the running program is killable.
            // SIGTSTP stays blocked for the child's whole lifetime.
            match SignalHandler::register(SIGINT, SignalHandlerBehavior::Default) {
                Ok(handler) => handler.forget(),
                Err(err) => dev_warn!("cannot restore default SIGINT action: {err}"),
            }
            run_child(cmd, cmd.infile(), cmd.outfile())
        }
        Err(err) => {
            suspend.unblock().ok();
            return Err(Error::Fork(err));
        }
    };

    let outcome = waitpid(WaitTarget::Child(pid), WaitOptions::new());

    if let Err(err) = suspend.unblock() {
        dev_warn!("cannot unblock SIGTSTP: {err}");
    }

    let status = match outcome {
        Ok((_, status)) => status,
        Err(WaitError::Io(err)) => return Err(Error::Wait(err)),
        // not reachable without WaitOptions::no_hang
        Err(WaitError::NotReady) => return Err(Error::Wait(io::ErrorKind::WouldBlock.into())),
    };

    if let Some(signal) = status.term_signal() {
        println_ignore_io_error!("terminated by signal {signal}");
        Ok(-signal)
    } else {
        Ok(status.exit_status().unwrap_or(EXEC_FAILURE_STATUS))
    }
}

/// Launch a command as a background job and return its PID without waiting.
///
/// Streams without an explicit redirection are pointed at the null device so
/// the job can neither read the terminal nor pollute shell output.
pub(crate) fn spawn_background(cmd: &CommandDescriptor) -> Result<ProcessId, Error> {
    match fork() {
        Ok(ForkResult::Parent(pid)) => {
            println_ignore_io_error!("background PID is {pid}");
            Ok(pid)
        }
        Ok(ForkResult::Child) => {
            // A later shell-level mode toggle must not implicitly stop a job
            // that is already running.
            match SignalHandler::register(SIGTSTP, SignalHandlerBehavior::Ignore) {
                Ok(handler) => handler.forget(),
                Err(err) => dev_warn!("cannot ignore SIGTSTP: {err}"),
            }

            let null = Path::new(NULL_DEVICE);
            run_child(
                cmd,
                Some(cmd.infile().unwrap_or(null)),
                Some(cmd.outfile().unwrap_or(null)),
            )
        }
        Err(err) => Err(Error::Fork(err)),
    }
}

/// One non-blocking attempt to collect a finished child.
///
/// On success the child's outcome is reported and its PID returned so the
/// caller can drop it from the job registry. `None` means nothing was ready,
/// including the case where the shell has no children at all.
pub(crate) fn reap() -> Option<ProcessId> {
    match waitpid(WaitTarget::AnyChild, WaitOptions::new().no_hang()) {
        Ok((pid, status)) => {
            if let Some(signal) = status.term_signal() {
                println_ignore_io_error!(
                    "background PID {pid} is done: terminated by signal {signal}"
                );
            } else {
                let code = status.exit_status().unwrap_or(EXEC_FAILURE_STATUS);
                println_ignore_io_error!("background PID {pid} is done: exit value {code}");
            }
            Some(pid)
        }
        Err(WaitError::NotReady) => None,
        Err(WaitError::Io(err)) => {
            // ECHILD just means the shell has no children at all
            if err.raw_os_error() != Some(libc::ECHILD) {
                dev_warn!("cannot reap children: {err}");
            }
            None
        }
    }
}

/// Redirect the child's standard streams as requested and replace the process
/// image. Only returns through `_exit`: any failure is reported to standard
/// error and the child terminates with [`EXEC_FAILURE_STATUS`].
fn run_child(cmd: &CommandDescriptor, infile: Option<&Path>, outfile: Option<&Path>) -> ! {
    if let Some(path) = infile {
        if let Err(err) = redirect(path, Redirect::Stdin) {
            eprintln_ignore_io_error!("minsh: cannot open '{}': {err}", path.display());
            system::_exit(EXEC_FAILURE_STATUS);
        }
    }

    if let Some(path) = outfile {
        if let Err(err) = redirect(path, Redirect::Stdout) {
            eprintln_ignore_io_error!("minsh: cannot open '{}': {err}", path.display());
            system::_exit(EXEC_FAILURE_STATUS);
        }
    }

    // execvp only comes back on failure; report the offending command line
    let err = exec_command(cmd);
    eprintln_ignore_io_error!("minsh: bad argument(s) '{cmd}': {err}");
    system::_exit(EXEC_FAILURE_STATUS);
}

enum Redirect {
    Stdin,
    Stdout,
}

fn redirect(path: &Path, stream: Redirect) -> io::Result<()> {
    let file = match stream {
        Redirect::Stdin => File::open(path)?,
        Redirect::Stdout => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path)?,
    };

    let target = match stream {
        Redirect::Stdin => libc::STDIN_FILENO,
        Redirect::Stdout => libc::STDOUT_FILENO,
    };

    // `file` carries O_CLOEXEC, so only the duplicated descriptor survives
    // the upcoming exec.
    cerr(unsafe { libc::dup2(file.as_raw_fd(), target) }).map(|_| ())
}

/// Replace the process image with the requested program, resolving it via
/// `PATH`. Only returns on failure.
fn exec_command(cmd: &CommandDescriptor) -> io::Error {
    let args: Vec<_> = match cmd.args().iter().map(|arg| cstring(arg)).collect() {
        Ok(args) => args,
        Err(err) => return err,
    };

    let mut argv: Vec<*const libc::c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
    argv.push(std::ptr::null());

    // SAFETY: `argv` holds valid NUL-terminated strings and is itself
    // NUL-terminated; `args` outlives the call.
    unsafe { libc::execvp(argv[0], argv.as_ptr()) };

    io::Error::last_os_error()
}

/// Reaping collects *any* child of this process, so tests that spawn children
/// must not overlap: a concurrent reap would steal the child another test is
/// about to wait for.
#[cfg(test)]
pub(crate) fn child_test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
