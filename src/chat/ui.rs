//! Chat mode UI components.

use std::io::{self, Write};

use super::command::COMMANDS;
use super::transcript::Transcript;
use crate::ui::{self, Style};

pub const EXIT_MESSAGE: &str = "Exiting...";
pub const CLEARED_MESSAGE: &str = "Chat history cleared.";

pub fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    ui::print_status(out, "Commands:")?;
    for (_, label, description) in COMMANDS {
        writeln!(out, "{label:<14} {description}")?;
    }
    Ok(())
}

pub fn print_history<W: Write>(out: &mut W, transcript: &Transcript) -> io::Result<()> {
    for message in transcript {
        writeln!(
            out,
            "{}: {}",
            Style::role(message.role().as_str().to_uppercase()),
            message.content()
        )?;
    }
    Ok(())
}

pub fn print_cleared<W: Write>(out: &mut W) -> io::Result<()> {
    ui::print_status(out, CLEARED_MESSAGE)
}

pub fn print_exiting<W: Write>(out: &mut W) -> io::Result<()> {
    ui::print_status(out, EXIT_MESSAGE)
}
