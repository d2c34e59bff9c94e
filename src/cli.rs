//! Command line surface and top-level dispatch.

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{ChatConfig, ConfigError, DEFAULT_ENDPOINT, DEFAULT_NOTICE_SECS, default_state_dir};
use crate::net::HttpExchange;
use crate::services::conversation::{Conversation, DEFAULT_GREETING, Resolution, SendRejected};
use crate::state::session::SessionIdentity;
use crate::state::tables::{TABLE_OPTIONS, resolve_option};
use crate::ui::{render, repl};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unknown table `{0}`; run `ledger-chat tables` to list options")]
    UnknownTable(String),
    #[error("message not sent: {0}")]
    Rejected(#[from] SendRejected),
    #[error("{0}")]
    ExchangeFailed(String),
    #[error("terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ledger-chat", about = "Chat with the accounting assistant")]
pub struct Cli {
    #[arg(long, env = "LEDGER_CHAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, env = "LEDGER_CHAT_STATE_DIR", help = "Directory holding the persisted session id")]
    pub state_dir: Option<PathBuf>,

    #[arg(long, env = "LEDGER_CHAT_NOTICE_SECS", default_value_t = DEFAULT_NOTICE_SECS)]
    pub notice_secs: u64,

    #[arg(long, default_value_t = false, help = "Start without the assistant greeting")]
    pub no_greeting: bool,

    #[arg(long, global = true, help = "Initial table scope (value or label)")]
    pub table: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive conversation (the default).
    Chat,
    /// Send one message and print the reply.
    Send {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// List table options, optionally filtered by a search term.
    Tables { search: Option<String> },
    /// Print the persisted session id.
    Session,
}

impl Cli {
    /// Resolve flags, environment, and defaults into a [`ChatConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid endpoint.
    pub fn config(&self) -> Result<ChatConfig, ConfigError> {
        let state_dir = self.state_dir.clone().or_else(default_state_dir);
        ChatConfig::new(&self.endpoint, state_dir, self.notice_secs, !self.no_greeting)
    }
}

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns a [`CliError`] for bad configuration, an unknown table, or a
/// failed one-shot exchange.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config()?;
    let Cli { command, table, .. } = cli;

    match command.unwrap_or(Command::Chat) {
        Command::Tables { search } => {
            let selected = match table.as_deref() {
                Some(input) => resolve_table(input)?,
                None => "",
            };
            for line in render::render_table_menu(TABLE_OPTIONS, selected, search.as_deref().unwrap_or_default()) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Session => {
            let identity = SessionIdentity::new(config.session_store());
            println!("{}", identity.get_or_create_session_id());
            Ok(())
        }
        Command::Send { message } => {
            let mut convo = build_conversation(&config, table.as_deref(), false)?;
            let client = HttpExchange::new(config.endpoint.as_str())?;
            match convo.send_message(&client, &message.join(" ")).await? {
                Resolution::Replied(turn) => {
                    println!("{}", turn.content);
                    Ok(())
                }
                Resolution::Failed(notice) => Err(CliError::ExchangeFailed(notice.description)),
                Resolution::Ignored => Ok(()),
            }
        }
        Command::Chat => {
            let convo = build_conversation(&config, table.as_deref(), config.greeting)?;
            let client = Arc::new(HttpExchange::new(config.endpoint.as_str())?);
            tracing::info!(endpoint = client.endpoint(), session_id = convo.session_id(), "starting chat");
            repl::run(convo, client, repl::spawn_stdin_reader(), &mut std::io::stdout()).await?;
            Ok(())
        }
    }
}

/// Conversation for the persisted session, scoped to `table` if given.
///
/// # Errors
///
/// Returns [`CliError::UnknownTable`] if `table` matches no option.
pub fn build_conversation(
    config: &ChatConfig,
    table: Option<&str>,
    greeting: bool,
) -> Result<Conversation, CliError> {
    let identity = SessionIdentity::new(config.session_store());
    let mut convo = Conversation::new(identity.get_or_create_session_id())
        .with_notice_duration(config.notice_duration);
    if greeting {
        convo = convo.with_greeting(DEFAULT_GREETING);
    }
    if let Some(input) = table {
        convo.select_table(resolve_table(input)?);
    }
    Ok(convo)
}

fn resolve_table(input: &str) -> Result<&'static str, CliError> {
    resolve_option(TABLE_OPTIONS, input)
        .map(|option| option.value)
        .ok_or_else(|| CliError::UnknownTable(input.to_owned()))
}
