use std::io::{self, BufRead, Write};

use crate::common::{CommandDescriptor, Error, ShellContext};
use crate::exec;
use crate::log::{dev_info, user_error};
use crate::shell::builtins::{Builtin, BuiltinResult};
use crate::shell::jobs::{Job, JobList};
use crate::system::signal::{
    consts::*, Mode, SignalHandler, SignalHandlerBehavior,
};

mod builtins;
mod jobs;
mod parse;

const PROMPT: &str = ": ";

pub fn main() {
    crate::log::ShellLogger::new("minsh: ").into_global_logger();

    dev_info!("development logs are enabled");

    // The shell itself is immune to the interrupt signal; only a foreground
    // child (which restores the default disposition) can die to it. The
    // suspend signal toggles foreground-only mode instead of suspending.
    for (signal, behavior) in [
        (SIGINT, SignalHandlerBehavior::Ignore),
        (SIGTSTP, SignalHandlerBehavior::ToggleForegroundOnly),
    ] {
        match SignalHandler::register(signal, behavior) {
            Ok(handler) => handler.forget(),
            Err(err) => {
                user_error!("cannot set up signal handling: {err}");
                std::process::exit(1);
            }
        }
    }

    std::process::exit(run_loop());
}

/// Read, dispatch and reap until `exit` or end of input. Returns the shell's
/// own exit code.
fn run_loop() -> i32 {
    let mut context = ShellContext::new();
    let mut jobs = JobList::new();

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print_ignore_io_error!("{PROMPT}");
        let _ = io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            // end of input behaves like "exit"
            Ok(0) => break,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                user_error!("cannot read input: {err}");
                jobs.terminate_all();
                return 1;
            }
        }

        let mut exiting = false;
        if let Some(cmd) = parse::parse_command_line(&line, context.shell_pid) {
            exiting = dispatch(&cmd, &mut context, &mut jobs);
        }

        // collect everything that finished since the last prompt
        drain_reaper(&mut jobs);

        if exiting {
            break;
        }
    }

    // best effort: signal every remaining job once, in insertion order,
    // without waiting for their exit
    jobs.terminate_all();
    0
}

/// Run one command. Returns `true` when the shell should terminate.
fn dispatch(cmd: &CommandDescriptor, context: &mut ShellContext, jobs: &mut JobList) -> bool {
    match Builtin::try_from_name(cmd.program()) {
        Some(builtin) => builtin.run(cmd, context) == BuiltinResult::Exit,
        None => {
            run_external(cmd, context, jobs, Mode::current());
            false
        }
    }
}

/// Launch a non-built-in command. A background request is only honored in
/// `Normal` mode; under `ForegroundOnly` the command runs synchronously and
/// no job is tracked.
fn run_external(
    cmd: &CommandDescriptor,
    context: &mut ShellContext,
    jobs: &mut JobList,
    mode: Mode,
) {
    if mode == Mode::Normal && cmd.background() {
        match exec::spawn_background(cmd) {
            Ok(pid) => jobs.push(Job::new(pid)),
            Err(err) => report_launch_error(err, context),
        }
    } else {
        match exec::spawn_foreground(cmd) {
            Ok(status) => context.last_status = status,
            Err(err) => report_launch_error(err, context),
        }
    }
}

fn report_launch_error(err: Error, context: &mut ShellContext) {
    user_error!("{err}");
    if err.is_fatal() {
        // a shell that cannot create processes cannot usefully continue
        std::process::exit(1);
    }
    context.last_status = exec::EXEC_FAILURE_STATUS;
}

/// Remove every job the reaper can collect, until one call reports that
/// nothing is ready.
fn drain_reaper(jobs: &mut JobList) {
    if jobs.is_empty() {
        return;
    }
    while let Some(pid) = exec::reap() {
        jobs.remove(pid);
    }
}
