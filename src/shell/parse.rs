use std::path::PathBuf;

use crate::common::CommandDescriptor;
use crate::system::interface::ProcessId;

/// Turn one line of user input into a command descriptor.
///
/// Every `$$` in the line expands to the shell's PID before tokenization.
/// Blank lines and comment lines (first word starting with `#`) yield `None`.
/// `< path` and `> path` set the redirections; a `&` as the very last token
/// requests background execution, anywhere else it is an ordinary argument.
pub(crate) fn parse_command_line(line: &str, shell_pid: ProcessId) -> Option<CommandDescriptor> {
    let expanded = expand_pid(line, &shell_pid.to_string());

    let tokens: Vec<&str> = expanded.split_whitespace().collect();

    match tokens.first() {
        None => return None,
        Some(word) if word.starts_with('#') => return None,
        Some(_) => {}
    }

    let mut args = Vec::new();
    let mut infile = None;
    let mut outfile = None;
    let mut background = false;

    let mut iter = tokens.iter().enumerate();
    while let Some((index, &token)) = iter.next() {
        match token {
            "<" => {
                // a dangling operator has nothing to redirect; skip it
                if let Some((_, &path)) = iter.next() {
                    infile = Some(PathBuf::from(path));
                }
            }
            ">" => {
                if let Some((_, &path)) = iter.next() {
                    outfile = Some(PathBuf::from(path));
                }
            }
            "&" if index == tokens.len() - 1 => background = true,
            _ => args.push(token.to_string()),
        }
    }

    // a line like "< file" or a lone "&" leaves no command to run
    if args.is_empty() {
        return None;
    }

    Some(CommandDescriptor::new(args, infile, outfile, background))
}

fn expand_pid(line: &str, pid: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(index) = rest.find("$$") {
        out.push_str(&rest[..index]);
        out.push_str(pid);
        rest = &rest[index + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::{expand_pid, parse_command_line};
    use crate::common::CommandDescriptor;
    use crate::system::interface::ProcessId;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> Option<CommandDescriptor> {
        parse_command_line(line, ProcessId::new(4242))
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   \t  "), None);
        assert_eq!(parse("# a comment"), None);
        assert_eq!(parse("#comment"), None);
    }

    #[test]
    fn plain_command() {
        let cmd = parse("ls -l /tmp").unwrap();
        assert_eq!(cmd.args(), ["ls", "-l", "/tmp"]);
        assert_eq!(cmd.infile(), None);
        assert_eq!(cmd.outfile(), None);
        assert!(!cmd.background());
    }

    #[test]
    fn redirections_are_not_arguments() {
        let cmd = parse("sort < in.txt > out.txt").unwrap();
        assert_eq!(cmd.args(), ["sort"]);
        assert_eq!(cmd.infile().unwrap().to_str(), Some("in.txt"));
        assert_eq!(cmd.outfile().unwrap().to_str(), Some("out.txt"));
    }

    #[test]
    fn trailing_ampersand_requests_background() {
        let cmd = parse("sleep 5 &").unwrap();
        assert_eq!(cmd.args(), ["sleep", "5"]);
        assert!(cmd.background());
    }

    #[test]
    fn non_trailing_ampersand_is_an_argument() {
        let cmd = parse("echo & done").unwrap();
        assert_eq!(cmd.args(), ["echo", "&", "done"]);
        assert!(!cmd.background());
    }

    #[test]
    fn pid_expansion() {
        assert_eq!(expand_pid("echo $$", "4242"), "echo 4242");
        assert_eq!(expand_pid("a$$b$$c", "7"), "a7b7c");
        assert_eq!(expand_pid("$$$", "7"), "7$");
        assert_eq!(expand_pid("no dollars", "7"), "no dollars");

        let cmd = parse("echo $$").unwrap();
        assert_eq!(cmd.args(), ["echo", "4242"]);
    }

    #[test]
    fn dangling_operators_leave_no_command() {
        assert_eq!(parse("&"), None);
        assert_eq!(parse("< only"), None);
    }

    #[test]
    fn dangling_redirect_is_skipped() {
        let cmd = parse("cat <").unwrap();
        assert_eq!(cmd.args(), ["cat"]);
        assert_eq!(cmd.infile(), None);
    }
}
