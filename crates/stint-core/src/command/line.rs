//! Input line classification and slash-command splitting.

/// The character that marks a line as a command.
pub const COMMAND_PREFIX: char = '/';

/// A parsed slash command: the lowercased name and the untouched remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub argument_text: String,
}

/// Classification of one raw input line. There are no error cases: an
/// unrecognized command name is resolved at dispatch, anything else is
/// note text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Whitespace only; the loop ignores it.
    Empty,
    /// A line starting with the command prefix.
    Command(Command),
    /// Free text, treated as a note on the active task.
    Text(String),
}

impl InputLine {
    /// Splits a raw line: the first whitespace-delimited token after the
    /// prefix is the command name (matched case-insensitively), the trimmed
    /// remainder is the argument text.
    pub fn parse(raw: &str) -> InputLine {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return InputLine::Empty;
        }

        let Some(rest) = trimmed.strip_prefix(COMMAND_PREFIX) else {
            return InputLine::Text(trimmed.to_string());
        };

        let rest = rest.trim_start();
        let (name, argument_text) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        InputLine::Command(Command {
            name: name.to_lowercase(),
            argument_text: argument_text.to_string(),
        })
    }
}
