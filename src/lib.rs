//! # ledger-chat
//!
//! Terminal client for the accounting assistant. Keeps a local transcript,
//! lets the user scope questions to one accounting table, and exchanges each
//! message with the remote chat endpoint under a persisted session id.
//!
//! `state` holds the data model, `net` the wire types and HTTP exchange,
//! `services` the conversation controller, and `ui` the terminal front end.

pub mod cli;
pub mod config;
pub mod net;
pub mod services;
pub mod state;
pub mod ui;
