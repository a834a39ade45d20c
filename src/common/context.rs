use crate::system::{self, interface::ProcessId};

/// The couple of shell-wide facts this core shares with the built-ins:
/// the status of the last foreground command and the shell's own PID
/// (used for `$$` expansion).
pub struct ShellContext {
    /// Non-negative values are exit codes; negative values are negated
    /// terminating-signal numbers. Updated only after a foreground command
    /// finishes.
    pub last_status: i32,
    pub shell_pid: ProcessId,
}

impl ShellContext {
    pub fn new() -> Self {
        Self {
            last_status: 0,
            shell_pid: system::process_id(),
        }
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}
