//! Wire types for the chat endpoint.
//!
//! One JSON request per user message, one JSON response per success:
//!
//! ```text
//! -> { "session_id": "...", "table": "...", "message": "..." }
//! <- { "response": "..." }
//! ```

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    /// Table scope; empty string for an unscoped query.
    pub table: String,
    pub message: String,
}

/// Successful response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
