//! Conversation controller: owns chat state and drives exchanges.
//!
//! DESIGN
//! ======
//! Each outgoing message walks a small state machine:
//!
//! ```text
//! Idle -> submit() -> Pending -> resolve(Ok)  -> Idle (assistant turn appended)
//!                             -> resolve(Err) -> Idle (notice raised)
//! ```
//!
//! `submit` validates the text, appends the user turn optimistically, and
//! hands back the request to send. `resolve` applies the outcome. Hosts with
//! their own event loop call the two halves around their own await point;
//! `send_message` does both for callers that can simply wait.
//!
//! At most one exchange is in flight. A submit while Pending is rejected
//! without touching state, and a failed exchange leaves the user turn in
//! place (no rollback, no retry).

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use std::time::{Duration, Instant};

use crate::net::{ChatRequest, ChatResponse, ExchangeClient, ExchangeError};
use crate::state::chat::{ChatState, ChatTurn, DEFAULT_NOTICE_DURATION, Notice};
use crate::state::tables::{TABLE_OPTIONS, TableOption, find_option};

/// Greeting shown before the first exchange when enabled.
pub const DEFAULT_GREETING: &str = "Hello! I'm your accounting assistant. How can I help you today? \
     Use /table to focus our conversation on a specific table.";

/// Why a submit did not start an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendRejected {
    #[error("message is empty")]
    Empty,
    #[error("still waiting for the previous reply")]
    Busy,
}

/// What `resolve` did with an exchange outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The reply was appended as an assistant turn.
    Replied(ChatTurn),
    /// The exchange failed and a notice was raised.
    Failed(Notice),
    /// Nothing was pending; the outcome was dropped.
    Ignored,
}

/// Single-owner controller for one conversation.
pub struct Conversation {
    state: ChatState,
    session_id: String,
    options: &'static [TableOption],
    notice_duration: Duration,
}

impl Conversation {
    /// Empty, unscoped conversation for `session_id`.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            state: ChatState::default(),
            session_id: session_id.into(),
            options: TABLE_OPTIONS,
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }

    /// Seed the history with an assistant greeting.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.state.messages.push(ChatTurn::assistant(greeting));
        self
    }

    #[must_use]
    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current state, borrowed.
    #[must_use]
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Owned copy of the current state for renderers that outlive the borrow.
    #[must_use]
    pub fn snapshot(&self) -> ChatState {
        self.state.clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    #[must_use]
    pub fn options(&self) -> &'static [TableOption] {
        self.options
    }

    /// Scope future exchanges to `value`. Unknown values are refused.
    pub fn select_table(&mut self, value: &str) -> bool {
        if find_option(self.options, value).is_none() {
            tracing::debug!(table = value, "ignoring unknown table selection");
            return false;
        }
        value.clone_into(&mut self.state.selected_table);
        true
    }

    /// Validate `text`, append it as a user turn, and enter Pending.
    ///
    /// # Errors
    ///
    /// Returns [`SendRejected::Empty`] for blank text and
    /// [`SendRejected::Busy`] while another exchange is pending. Neither
    /// changes state.
    pub fn submit(&mut self, text: &str) -> Result<ChatRequest, SendRejected> {
        if text.trim().is_empty() {
            return Err(SendRejected::Empty);
        }
        if self.state.pending {
            return Err(SendRejected::Busy);
        }

        self.state.messages.push(ChatTurn::user(text));
        self.state.pending = true;

        Ok(ChatRequest {
            session_id: self.session_id.clone(),
            table: self.state.selected_table.clone(),
            message: text.to_owned(),
        })
    }

    /// Apply the outcome of the pending exchange and return to Idle.
    pub fn resolve(&mut self, result: Result<ChatResponse, ExchangeError>) -> Resolution {
        if !self.state.pending {
            tracing::warn!("exchange outcome arrived with nothing pending; dropping it");
            return Resolution::Ignored;
        }
        self.state.pending = false;

        match result {
            Ok(reply) => {
                let turn = ChatTurn::assistant(reply.response);
                self.state.messages.push(turn.clone());
                Resolution::Replied(turn)
            }
            Err(e) => {
                tracing::warn!(error = e.description(), status = ?e.status(), "chat exchange failed");
                let notice = Notice::error(e.to_string(), self.notice_duration);
                self.state.notice = Some(notice.clone());
                Resolution::Failed(notice)
            }
        }
    }

    /// Submit `text`, wait for `client`, and resolve.
    ///
    /// # Errors
    ///
    /// Returns [`SendRejected`] when validation refuses the message; no
    /// request is issued in that case.
    pub async fn send_message(
        &mut self,
        client: &dyn ExchangeClient,
        text: &str,
    ) -> Result<Resolution, SendRejected> {
        let request = self.submit(text)?;
        let result = client.send(&request).await;
        Ok(self.resolve(result))
    }

    /// Clear the notice once its display time has passed.
    pub fn dismiss_expired(&mut self, now: Instant) -> bool {
        if self.state.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.state.notice = None;
            return true;
        }
        false
    }
}
