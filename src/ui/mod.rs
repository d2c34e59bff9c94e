//! Terminal presentation: input parsing, rendering, and the chat loop.

pub mod command;
pub mod render;
pub mod repl;
