/*!
 * Shell Commands
 * Parsing of interactive command lines
 */

/// One line of shell input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    /// `submit <command...>`
    Submit(&'a str),
    /// `start`
    Start,
    /// `exit`
    Exit,
    /// Blank line
    Empty,
    /// Anything else, echoed back to the user exactly as typed
    Unknown(&'a str),
}

impl<'a> ShellCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Self::Empty,
            "start" => Self::Start,
            "exit" => Self::Exit,
            _ => match trimmed.strip_prefix("submit") {
                Some(rest) if rest.starts_with(char::is_whitespace) => Self::Submit(rest.trim()),
                _ => Self::Unknown(line),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("start"), ShellCommand::Start);
        assert_eq!(ShellCommand::parse("exit\r"), ShellCommand::Exit);
        assert_eq!(ShellCommand::parse("   "), ShellCommand::Empty);
        assert_eq!(
            ShellCommand::parse("submit ./fib 40"),
            ShellCommand::Submit("./fib 40")
        );
        assert_eq!(
            ShellCommand::parse("submit\tsleep 1"),
            ShellCommand::Submit("sleep 1")
        );
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(ShellCommand::parse("submit"), ShellCommand::Unknown("submit"));
        assert_eq!(
            ShellCommand::parse("submitx ls"),
            ShellCommand::Unknown("submitx ls")
        );
        assert_eq!(ShellCommand::parse("starts"), ShellCommand::Unknown("starts"));
        assert_eq!(ShellCommand::parse("list"), ShellCommand::Unknown("list"));
        assert_eq!(
            ShellCommand::parse("  list -a\t"),
            ShellCommand::Unknown("  list -a\t")
        );
    }
}
