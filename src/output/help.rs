//! Text for the built-in `help` and `info` commands.

use std::io::{self, Write};
use std::path::PathBuf;
use termcolor::WriteColor;

use super::style::{print_styled, theme};
use crate::registry::CommandRegistry;

/// Identity of the application hosting the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    /// Where the application is running from.
    pub directory: PathBuf,
}

impl AppInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>, directory: PathBuf) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            directory,
        }
    }
}

/// Write the usage line followed by every command with its accepted
/// arguments and flags.
pub fn render_help<W: WriteColor + ?Sized>(
    app: &AppInfo,
    registry: &CommandRegistry,
    out: &mut W,
) -> io::Result<()> {
    let all_commands = registry.names().collect::<Vec<_>>().join(" | ");
    writeln!(out, "Usage: {} [{} | No Command]", app.name, all_commands)?;
    writeln!(out)?;

    for (name, spec) in registry.iter() {
        let heading = format!("Command: {}: {}", name, spec.description);
        print_styled(out, &heading, theme::HEADING)?;
        for arg in &spec.valid_arguments {
            writeln!(out, "Argument: --{}", arg)?;
        }
        for flag in &spec.valid_flags {
            writeln!(out, "Flag: -{}", flag)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn render_info<W: WriteColor + ?Sized>(app: &AppInfo, out: &mut W) -> io::Result<()> {
    print_styled(out, &app.name, theme::HEADING)?;
    writeln!(out, "Version: {}", app.version)?;
    writeln!(out, "Current Directory: {}", app.directory.display())?;
    writeln!(
        out,
        "This is a command-line interface for the {} application.",
        app.name
    )?;
    writeln!(out, "For more information, visit the official documentation.")
}
