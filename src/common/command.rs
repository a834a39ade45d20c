use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// One parsed user command, immutable once constructed.
///
/// The argument list is never empty: blank lines and comments are filtered
/// out by the parser before a descriptor is built.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct CommandDescriptor {
    args: Vec<String>,
    infile: Option<PathBuf>,
    outfile: Option<PathBuf>,
    background: bool,
}

impl CommandDescriptor {
    pub fn new(
        args: Vec<String>,
        infile: Option<PathBuf>,
        outfile: Option<PathBuf>,
        background: bool,
    ) -> Self {
        debug_assert!(!args.is_empty());
        Self {
            args,
            infile,
            outfile,
            background,
        }
    }

    /// The program name, i.e. the first argument.
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// All arguments, program name included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn infile(&self) -> Option<&Path> {
        self.infile.as_deref()
    }

    pub fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }

    pub fn background(&self) -> bool {
        self.background
    }
}

impl Display for CommandDescriptor {
    /// Renders the argument list as typed, for error reporting.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::CommandDescriptor;
    use pretty_assertions::assert_eq;

    fn descriptor(args: &[&str]) -> CommandDescriptor {
        CommandDescriptor::new(args.iter().map(|s| s.to_string()).collect(), None, None, false)
    }

    #[test]
    fn program_is_first_argument() {
        let cmd = descriptor(&["ls", "-l", "/tmp"]);
        assert_eq!(cmd.program(), "ls");
        assert_eq!(cmd.args().len(), 3);
    }

    #[test]
    fn display_joins_arguments() {
        let cmd = descriptor(&["echo", "hello", "world"]);
        assert_eq!(cmd.to_string(), "echo hello world");
    }
}
