use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum Error {
    /// The system could not create a new process. A shell that cannot fork
    /// cannot usefully continue, so this is treated as fatal by the caller.
    Fork(io::Error),
    /// Waiting for a foreground child failed.
    Wait(io::Error),
    /// Any other IO failure, optionally tied to the path that caused it.
    Io(Option<PathBuf>, io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fork(e) => write!(f, "cannot fork: {e}"),
            Error::Wait(e) => write!(f, "cannot wait for child: {e}"),
            Error::Io(location, e) => {
                if let Some(path) = location {
                    write!(f, "{}: {e}", path.display())
                } else {
                    write!(f, "IO error: {e}")
                }
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(None, err)
    }
}

impl Error {
    /// Returns `true` if the shell must terminate because of this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fork(_))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::io;

    #[test]
    fn only_fork_failure_is_fatal() {
        let fork = Error::Fork(io::Error::from_raw_os_error(libc::EAGAIN));
        let wait = Error::Wait(io::Error::from_raw_os_error(libc::EINTR));
        let io = Error::from(io::Error::from_raw_os_error(libc::ENOENT));

        assert!(fork.is_fatal());
        assert!(!wait.is_fatal());
        assert!(!io.is_fatal());
    }

    #[test]
    fn display_includes_path() {
        let err = Error::Io(
            Some("missing.txt".into()),
            io::Error::from_raw_os_error(libc::ENOENT),
        );
        assert!(err.to_string().starts_with("missing.txt: "));
    }
}
