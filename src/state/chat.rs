//! Conversation state: chat turns, transient notices, and the observable
//! snapshot handed to the presentation layer.
//!
//! DESIGN
//! ======
//! `ChatState` is plain data. The conversation controller is the only writer;
//! everything else reads clones of it. Turns are append-only and never
//! mutated after insertion.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display duration for a transient notice.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);

// =============================================================================
// CHAT TURNS
// =============================================================================

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique identifier (UUID string).
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch when the turn was created.
    pub timestamp: i64,
}

impl ChatTurn {
    /// Create a turn stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: now_ms(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// =============================================================================
// NOTICES
// =============================================================================

/// A transient, auto-dismissing error notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub raised_at: Instant,
    pub duration: Duration,
}

impl Notice {
    #[must_use]
    pub fn error(description: impl Into<String>, duration: Duration) -> Self {
        Self {
            title: "Error".to_owned(),
            description: description.into(),
            raised_at: Instant::now(),
            duration,
        }
    }

    /// Whether the notice should no longer be shown at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.duration
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Observable conversation state.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    /// Turns in insertion order.
    pub messages: Vec<ChatTurn>,
    /// Selected table value; empty means unscoped.
    pub selected_table: String,
    /// True while an exchange is in flight.
    pub pending: bool,
    /// Most recent failure, until it expires.
    pub notice: Option<Notice>,
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}
