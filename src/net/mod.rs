//! Network layer: wire types and the exchange client.

pub mod exchange;
pub mod types;

pub use exchange::{ExchangeClient, ExchangeError, HttpExchange};
pub use types::{ChatRequest, ChatResponse};
