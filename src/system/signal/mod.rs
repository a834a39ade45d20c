//! Utilities to handle signals.

use libc::c_int;

mod handler;
mod mode;
mod set;

pub(crate) use handler::{SignalHandler, SignalHandlerBehavior};
pub(crate) use mode::Mode;
pub(crate) use set::SignalSet;

pub(crate) type SignalNumber = c_int;

macro_rules! define_consts {
    ($($signal:ident,)*) => {
        pub(crate) mod consts {
            pub(crate) use libc::{$($signal,)*};
        }

        pub(crate) fn signal_name(signal: SignalNumber) -> Option<&'static str> {
            match signal {
                $(consts::$signal => Some(stringify!($signal)),)*
                _ => None,
            }
        }
    };
}

define_consts! {
    SIGINT,
    SIGQUIT,
    SIGTSTP,
    SIGTERM,
    SIGCHLD,
    SIGCONT,
    SIGKILL,
    SIGSTOP,
}

#[cfg(test)]
mod tests {
    use super::{consts::*, signal_name};

    #[test]
    fn known_signal_names() {
        assert_eq!(signal_name(SIGINT), Some("SIGINT"));
        assert_eq!(signal_name(SIGTSTP), Some("SIGTSTP"));
        assert_eq!(signal_name(12345), None);
    }
}
