//! Completion client for OpenAI-compatible chat APIs.
//!
//! The remote service keeps no conversation state between calls, so every
//! request carries the whole transcript.

mod client;
mod error;

pub use client::{DEFAULT_ENDPOINT, OpenAiClient};
pub use error::CompletionError;

use crate::chat::Message;

/// Everything needed for one completion round trip.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    /// The full ordered transcript, preamble first.
    pub messages: &'a [Message],
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Produces the assistant's reply to a transcript.
///
/// Implementations hold their own credentials and transport.
#[allow(async_fn_in_trait)]
pub trait Completer {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Message, CompletionError>;
}
