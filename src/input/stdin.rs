use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::{LineReader, ReadEvent};

/// Reads lines from a non-interactive source such as piped stdin.
pub struct StdinReader<R> {
    lines: Lines<R>,
}

impl StdinReader<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> StdinReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> LineReader for StdinReader<R> {
    async fn read_line(&mut self) -> Result<ReadEvent> {
        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read from stdin")?;

        Ok(line.map_or(ReadEvent::Eof, ReadEvent::Line))
    }
}
