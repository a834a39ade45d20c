use std::path::PathBuf;

use crate::common::{CommandDescriptor, ShellContext};
use crate::log::user_error;

/// The three commands handled inside the shell process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Exit,
    Status,
    Cd,
}

/// What the dispatch loop should do after a built-in ran.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BuiltinResult {
    Continue,
    Exit,
}

impl Builtin {
    pub(crate) fn try_from_name(name: &str) -> Option<Builtin> {
        match name {
            "exit" => Some(Builtin::Exit),
            "status" => Some(Builtin::Status),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }

    pub(crate) fn run(self, cmd: &CommandDescriptor, context: &ShellContext) -> BuiltinResult {
        match self {
            Builtin::Exit => {
                if cmd.args().len() > 1 {
                    user_error!("invalid number of arguments\nusage: exit");
                    return BuiltinResult::Continue;
                }
                BuiltinResult::Exit
            }
            Builtin::Status => {
                if cmd.args().len() > 1 {
                    user_error!("invalid number of arguments\nusage: status");
                    return BuiltinResult::Continue;
                }
                report_status(context.last_status);
                BuiltinResult::Continue
            }
            Builtin::Cd => {
                if cmd.args().len() > 2 {
                    user_error!("invalid number of arguments\nusage: cd [PATH]");
                    return BuiltinResult::Continue;
                }
                change_directory(cmd.args().get(1));
                BuiltinResult::Continue
            }
        }
    }
}

/// Print the exit code or terminating signal of the last foreground command.
/// Signals are stored negated, which is how they are told apart from codes.
fn report_status(last_status: i32) {
    if last_status < 0 {
        println_ignore_io_error!("terminated by signal {}", -last_status);
    } else {
        println_ignore_io_error!("exit value {last_status}");
    }
}

/// Change the working directory, defaulting to `$HOME` when no path is given.
fn change_directory(path: Option<&String>) {
    let target: PathBuf = match path {
        Some(path) => path.into(),
        None => match std::env::var_os("HOME") {
            Some(home) => home.into(),
            None => {
                user_error!("cd: HOME is not set");
                return;
            }
        },
    };

    if let Err(err) = std::env::set_current_dir(&target) {
        user_error!("cd: {}: {err}", target.display());
    }
}
