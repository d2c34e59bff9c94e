//! Application services.

pub mod conversation;
