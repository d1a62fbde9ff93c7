//! Line sources for the chat loop.

mod prompt;
mod stdin;

pub use prompt::PromptReader;
pub use stdin::StdinReader;

use anyhow::Result;

/// What a single read from the user produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// A complete line, without its trailing newline.
    Line(String),
    /// The user aborted (Ctrl+C).
    Interrupted,
    /// No more input will arrive.
    Eof,
}

/// A source of user input lines.
#[allow(async_fn_in_trait)]
pub trait LineReader {
    async fn read_line(&mut self) -> Result<ReadEvent>;
}
