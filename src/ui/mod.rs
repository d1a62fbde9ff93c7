use std::io::{self, Write};

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Prints a status line (bold, light gray) to `out`.
pub fn print_status<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", Style::status(message))
}
