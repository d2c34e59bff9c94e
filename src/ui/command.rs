//! Parsing of REPL input lines into actions.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

/// What a line of REPL input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text to send to the assistant (kept exactly as typed).
    Message(String),
    /// `/table <value|label>`; empty argument clears the scope.
    SelectTable(String),
    /// `/tables [search]`
    ListTables(String),
    Status,
    Session,
    Help,
    Quit,
    /// A slash command we do not know.
    Unknown(String),
}

#[must_use]
pub fn parse_input(line: &str) -> Input {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Input::Message(line.to_owned());
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest.trim_end(), ""), |(name, arg)| (name, arg.trim()));

    match name {
        "table" => Input::SelectTable(arg.to_owned()),
        "tables" => Input::ListTables(arg.to_owned()),
        "status" => Input::Status,
        "session" => Input::Session,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_owned()),
    }
}
