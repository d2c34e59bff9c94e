//! Text rendering for the terminal presentation.
//!
//! Every function here is a pure mapping from state to lines; the REPL
//! decides when to print them.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::state::chat::{ChatState, ChatTurn, Notice, Role};
use crate::state::tables::{TableOption, display_label, filter_options};

/// Shown while the assistant's reply is pending.
pub const PENDING_INDICATOR: &str = "AI: Thinking...";

/// Shown when a table search matches nothing.
pub const NO_OPTIONS: &str = "No options found";

pub const HELP: &str = "\
Type a message and press Enter to send it.

  /table <value|label>   scope future questions to a table (empty clears it)
  /tables [search]       list table options, optionally filtered
  /status                show session, table, and pending state
  /session               print the session id
  /help                  show this help
  /quit                  leave";

#[must_use]
pub fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI",
    }
}

/// `You: ...` / `AI: ...`, with continuation lines indented under the text.
#[must_use]
pub fn render_turn(turn: &ChatTurn) -> String {
    let prefix = format!("{}: ", speaker(turn.role));
    let indent = " ".repeat(prefix.len());
    let mut out = prefix;
    for (index, line) in turn.content.lines().enumerate() {
        if index > 0 {
            out.push('\n');
            out.push_str(&indent);
        }
        out.push_str(line);
    }
    out
}

#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    format!("[{}] {}", notice.title, notice.description)
}

#[must_use]
pub fn render_selection(options: &[TableOption], selected: &str) -> String {
    format!("Table: {}", display_label(options, selected))
}

/// Selector listing: options matching `search`, the current one marked.
#[must_use]
pub fn render_table_menu(options: &[TableOption], selected: &str, search: &str) -> Vec<String> {
    let matches = filter_options(options, search);
    if matches.is_empty() {
        return vec![NO_OPTIONS.to_owned()];
    }
    matches
        .into_iter()
        .map(|option| {
            let marker = if option.value == selected { '*' } else { ' ' };
            let value = if option.value.is_empty() { "\"\"" } else { option.value };
            format!("{marker} {:<26} {value}", option.label)
        })
        .collect()
}

/// Full transcript plus the pending indicator, as the screen should show it.
#[must_use]
pub fn render_transcript(state: &ChatState) -> Vec<String> {
    let mut lines: Vec<String> = state.messages.iter().map(render_turn).collect();
    if state.pending {
        lines.push(PENDING_INDICATOR.to_owned());
    }
    lines
}

/// One-line summary for `/status`.
#[must_use]
pub fn render_status(session_id: &str, options: &[TableOption], state: &ChatState) -> String {
    let phase = if state.pending { "waiting for reply" } else { "idle" };
    format!(
        "Session: {session_id} | {} | {} messages | {phase}",
        render_selection(options, &state.selected_table),
        state.messages.len()
    )
}
