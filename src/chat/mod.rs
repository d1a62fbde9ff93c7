//! Interactive chat mode.
//!
//! Provides a REPL-style interface: each line is either one of a small set
//! of control commands or a chat turn forwarded to the completion service.

/// Command parsing.
pub mod command;
mod message;
mod session;
mod transcript;
mod ui;

pub use message::{Message, Role};
pub use session::{ChatSession, ExitReason, SessionState};
pub use transcript::Transcript;
