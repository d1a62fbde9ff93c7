//! Command implementations.

/// Interactive chat command handler.
pub mod chat;
