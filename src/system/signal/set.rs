use crate::{cutils::cerr, system::make_zeroed_sigaction};

use super::{handler::SignalHandlerBehavior, SignalNumber};

use std::{io, mem::MaybeUninit};

#[repr(transparent)]
pub(super) struct SignalAction {
    raw: libc::sigaction,
}

impl SignalAction {
    pub(super) fn new(behavior: SignalHandlerBehavior) -> io::Result<Self> {
        // This guarantees that functions won't be interrupted by this signal as long as the
        // handler is alive.
        let sa_flags = libc::SA_RESTART;

        // The mode-toggle handler runs with every signal masked so a second
        // SIGTSTP cannot interleave with the flip-and-notify sequence.
        let (sa_sigaction, sa_mask) = match behavior {
            SignalHandlerBehavior::Default => (libc::SIG_DFL, SignalSet::empty()?),
            SignalHandlerBehavior::Ignore => (libc::SIG_IGN, SignalSet::empty()?),
            SignalHandlerBehavior::ToggleForegroundOnly => (
                super::mode::toggle_mode as libc::sighandler_t,
                SignalSet::full()?,
            ),
        };

        let mut raw: libc::sigaction = make_zeroed_sigaction();
        raw.sa_sigaction = sa_sigaction;
        raw.sa_mask = sa_mask.raw;
        raw.sa_flags = sa_flags;

        Ok(Self { raw })
    }

    pub(super) fn register(&self, signal: SignalNumber) -> io::Result<Self> {
        let mut original_action = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { libc::sigaction(signal, &self.raw, original_action.as_mut_ptr().cast()) })?;

        Ok(unsafe { original_action.assume_init() })
    }
}

// A signal set that can be used to mask signals.
#[repr(transparent)]
pub(crate) struct SignalSet {
    raw: libc::sigset_t,
}

impl SignalSet {
    /// Create an empty set.
    pub(crate) fn empty() -> io::Result<Self> {
        let mut set = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { libc::sigemptyset(set.as_mut_ptr().cast()) })?;

        Ok(unsafe { set.assume_init() })
    }

    /// Create a set containing all the signals.
    pub(crate) fn full() -> io::Result<Self> {
        let mut set = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { libc::sigfillset(set.as_mut_ptr().cast()) })?;

        Ok(unsafe { set.assume_init() })
    }

    /// Create a set containing exactly one signal.
    pub(crate) fn single(signal: SignalNumber) -> io::Result<Self> {
        let mut set = Self::empty()?;

        cerr(unsafe { libc::sigaddset(&mut set.raw, signal) })?;

        Ok(set)
    }

    fn sigprocmask(&self, how: libc::c_int) -> io::Result<()> {
        cerr(unsafe { libc::sigprocmask(how, &self.raw, std::ptr::null_mut()) }).map(|_| ())
    }

    /// Add the signals in this set to the set of blocked signals. Their
    /// delivery is deferred until they are unblocked again.
    pub(crate) fn block(&self) -> io::Result<()> {
        self.sigprocmask(libc::SIG_BLOCK)
    }

    /// Remove the signals in this set from the set of blocked signals,
    /// delivering any that arrived while blocked.
    pub(crate) fn unblock(&self) -> io::Result<()> {
        self.sigprocmask(libc::SIG_UNBLOCK)
    }
}
