//! Interactive terminal loop.
//!
//! DESIGN
//! ======
//! Stdin is read on a dedicated thread and forwarded over a channel, so the
//! loop can `select!` between new input and the in-flight exchange. Input
//! that arrives while a reply is pending goes through the controller like
//! any other and is refused there; the exchange itself runs as a spawned
//! task and is never cancelled. Leaving the loop, by `/quit` or end of
//! input, first waits for that task so its reply is not lost.
//!
//! ERROR HANDLING
//! ==============
//! Lines that are not valid UTF-8 are decoded lossily instead of ending the
//! reader. Write failures on the output are returned to the caller.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::net::{ChatResponse, ExchangeClient, ExchangeError};
use crate::services::conversation::{Conversation, Resolution, SendRejected};
use crate::state::tables::resolve_option;

use super::command::{Input, parse_input};
use super::render;

type InFlight = Option<JoinHandle<Result<ChatResponse, ExchangeError>>>;

enum Event {
    Line(String),
    Eof,
    Resolved(Result<ChatResponse, ExchangeError>),
}

// =============================================================================
// LOOP
// =============================================================================

/// Run the chat loop over `lines` until `/quit` or end of input, writing the
/// transcript to `out`. Returns the conversation as it stood at exit.
///
/// # Errors
///
/// Returns any I/O error from writing to `out`.
pub async fn run<W: Write>(
    mut convo: Conversation,
    client: Arc<dyn ExchangeClient>,
    mut lines: UnboundedReceiver<String>,
    out: &mut W,
) -> io::Result<Conversation> {
    writeln!(out, "Accounting AI Assistant  ({})", convo.session_id())?;
    writeln!(out, "{}", render::render_selection(convo.options(), &convo.state().selected_table))?;
    writeln!(out, "Type /help for commands.")?;
    for line in render::render_transcript(convo.state()) {
        writeln!(out, "{line}")?;
    }

    let mut in_flight: InFlight = None;

    loop {
        convo.dismiss_expired(Instant::now());

        let event = tokio::select! {
            line = lines.recv() => line.map_or(Event::Eof, Event::Line),
            result = join_exchange(&mut in_flight), if in_flight.is_some() => Event::Resolved(result),
        };

        let line = match event {
            Event::Resolved(result) => {
                in_flight = None;
                show_resolution(out, convo.resolve(result))?;
                continue;
            }
            Event::Eof => break,
            Event::Line(line) => line,
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Message(text) => match convo.submit(&text) {
                Ok(request) => {
                    writeln!(out, "{}", render::PENDING_INDICATOR)?;
                    let client = Arc::clone(&client);
                    in_flight = Some(tokio::spawn(async move { client.send(&request).await }));
                }
                Err(SendRejected::Busy) => writeln!(out, "({})", SendRejected::Busy)?,
                Err(SendRejected::Empty) => {}
            },
            Input::SelectTable(arg) => select_table(out, &mut convo, &arg)?,
            Input::ListTables(search) => {
                for line in render::render_table_menu(convo.options(), &convo.state().selected_table, &search) {
                    writeln!(out, "{line}")?;
                }
            }
            Input::Status => {
                writeln!(out, "{}", render::render_status(convo.session_id(), convo.options(), convo.state()))?;
                if let Some(notice) = &convo.state().notice {
                    writeln!(out, "{}", render::render_notice(notice))?;
                }
            }
            Input::Session => writeln!(out, "{}", convo.session_id())?,
            Input::Help => writeln!(out, "{}", render::HELP)?,
            Input::Unknown(name) => writeln!(out, "unknown command `/{name}`; try /help")?,
        }
    }

    if in_flight.is_some() {
        tracing::debug!("waiting for the pending reply before exit");
        let result = join_exchange(&mut in_flight).await;
        show_resolution(out, convo.resolve(result))?;
    }

    tracing::debug!(messages = convo.state().messages.len(), "chat loop finished");
    Ok(convo)
}

fn select_table<W: Write>(out: &mut W, convo: &mut Conversation, arg: &str) -> io::Result<()> {
    let Some(option) = resolve_option(convo.options(), arg) else {
        return writeln!(out, "{} for `{arg}`", render::NO_OPTIONS);
    };
    if convo.select_table(option.value) {
        writeln!(out, "{}", render::render_selection(convo.options(), option.value))?;
    }
    Ok(())
}

fn show_resolution<W: Write>(out: &mut W, resolution: Resolution) -> io::Result<()> {
    match resolution {
        Resolution::Replied(turn) => writeln!(out, "{}", render::render_turn(&turn)),
        Resolution::Failed(notice) => writeln!(out, "{}", render::render_notice(&notice)),
        Resolution::Ignored => Ok(()),
    }
}

async fn join_exchange(slot: &mut InFlight) -> Result<ChatResponse, ExchangeError> {
    let Some(handle) = slot.as_mut() else {
        return std::future::pending().await;
    };
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(ExchangeError::transport(e)),
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// Read stdin on a background thread, one message per line.
#[must_use]
pub fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || forward_lines(io::stdin().lock(), &tx));
    rx
}

/// Send each line of `reader` to `tx` until end of input, a read error, or a
/// closed receiver. Invalid UTF-8 is replaced, not treated as end of input.
fn forward_lines<R: BufRead>(mut reader: R, tx: &UnboundedSender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading input");
                break;
            }
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if matches!(line, std::borrow::Cow::Owned(_)) {
            tracing::warn!("input line was not valid UTF-8; invalid bytes replaced");
        }
        if tx.send(line.into_owned()).is_err() {
            break;
        }
    }
}
