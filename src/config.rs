//! Typed runtime configuration.
//!
//! Values arrive from the command line or `LEDGER_CHAT_*` environment
//! variables (see `cli`); this module validates them and owns the defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::state::session::{FileStore, KeyValueStore, MemoryStore};

pub const DEFAULT_ENDPOINT: &str = "https://accountingai-production.up.railway.app/chat";
pub const DEFAULT_NOTICE_SECS: u64 = 5;
const STATE_DIR_NAME: &str = "ledger-chat";

/// Errors raised while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL `{0}`: expected http:// or https://")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Full URL of the chat route.
    pub endpoint: String,
    /// Where the session id is persisted; `None` keeps it in memory only.
    pub state_dir: Option<PathBuf>,
    /// How long an error notice stays active.
    pub notice_duration: Duration,
    /// Seed the conversation with the assistant's greeting.
    pub greeting: bool,
}

impl ChatConfig {
    /// Validate raw settings into a config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] unless `endpoint` is an
    /// `http://` or `https://` URL.
    pub fn new(
        endpoint: &str,
        state_dir: Option<PathBuf>,
        notice_secs: u64,
        greeting: bool,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint.trim();
        let has_host = ["http://", "https://"]
            .iter()
            .any(|scheme| endpoint.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
        if !has_host {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_owned()));
        }

        Ok(Self {
            endpoint: endpoint.to_owned(),
            state_dir,
            notice_duration: Duration::from_secs(notice_secs),
            greeting,
        })
    }

    /// Storage backend for the session id.
    #[must_use]
    pub fn session_store(&self) -> Box<dyn KeyValueStore> {
        match &self.state_dir {
            Some(dir) => {
                let store = FileStore::new(dir);
                tracing::debug!(path = %store.path().display(), "using session store file");
                Box::new(store)
            }
            None => {
                tracing::warn!("no state directory available; session id will not persist");
                Box::new(MemoryStore::new())
            }
        }
    }
}

/// `<platform data dir>/ledger-chat`, when the platform has one.
#[must_use]
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STATE_DIR_NAME))
}
