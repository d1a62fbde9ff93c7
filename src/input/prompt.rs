use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, Styled};
use inquire::{InquireError, Text};

use super::{LineReader, ReadEvent};
use crate::output;

const HELP_MESSAGE: &str = "Type a message, ? for commands, Ctrl+C to quit";

/// Reads lines from an interactive terminal using an `inquire` prompt.
pub struct PromptReader {
    render_config: RenderConfig<'static>,
}

impl PromptReader {
    pub fn new() -> Self {
        let render_config = if output::is_no_color() {
            RenderConfig::empty().with_prompt_prefix(Styled::new(">"))
        } else {
            let prompt_style = Styled::new(">")
                .with_fg(Color::LightBlue)
                .with_attr(Attributes::BOLD);
            RenderConfig::default()
                .with_prompt_prefix(prompt_style)
                .with_answered_prompt_prefix(prompt_style)
        };

        Self { render_config }
    }
}

impl Default for PromptReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for PromptReader {
    async fn read_line(&mut self) -> Result<ReadEvent> {
        let input = Text::new("")
            .with_render_config(self.render_config)
            .with_help_message(HELP_MESSAGE)
            .prompt();

        match input {
            Ok(line) => Ok(ReadEvent::Line(line)),
            Err(e) => classify_error(e),
        }
    }
}

fn classify_error(err: InquireError) -> Result<ReadEvent> {
    match err {
        InquireError::OperationInterrupted => Ok(ReadEvent::Interrupted),
        // The terminal is in raw mode, so Esc stands in for ^D.
        InquireError::OperationCanceled => Ok(ReadEvent::Eof),
        e => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(
            classify_error(InquireError::OperationInterrupted).unwrap(),
            ReadEvent::Interrupted
        );
    }

    #[test]
    fn test_escape_is_eof() {
        assert_eq!(
            classify_error(InquireError::OperationCanceled).unwrap(),
            ReadEvent::Eof
        );
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = classify_error(InquireError::NotTTY);
        assert!(result.is_err());
    }
}
