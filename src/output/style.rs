//! Coloured console output.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

pub mod theme {
    use termcolor::Color;

    /// App name and command headers.
    pub const HEADING: Color = Color::Green;
    /// Rejections and invalid usage.
    pub const ERROR: Color = Color::Red;
}

/// Write `text` as one line in `color`, then reset.
pub fn print_styled<W: WriteColor + ?Sized>(
    out: &mut W,
    text: &str,
    color: Color,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    writeln!(out, "{}", text)?;
    out.reset()
}

/// Colour is only used on a terminal. `Auto` still honours `NO_COLOR` and
/// `TERM=dumb`.
pub fn color_choice(stream: &impl IsTerminal) -> ColorChoice {
    if stream.is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
