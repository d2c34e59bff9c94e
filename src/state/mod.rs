//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`chat`, `session`, `tables`) so the controller
//! and the presentation layer can depend on small focused models.

pub mod chat;
pub mod session;
pub mod tables;
