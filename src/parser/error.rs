//! Parse errors and advisory diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed argument '{token}': expected at most one '=' between key and value")]
    ArgumentFormat { token: String },

    #[error("unknown token '{token}'{}", command_suffix(.command))]
    UnknownToken {
        token: String,
        command: Option<String>,
    },
}

fn command_suffix(command: &Option<String>) -> String {
    command
        .as_ref()
        .map(|c| format!(" in command '{}'", c))
        .unwrap_or_default()
}

/// What to do with a token that is neither a command, a flag, an argument nor
/// an expected argument value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTokenPolicy {
    /// Fail the whole parse.
    #[default]
    Abort,
    /// Log the token and keep going.
    Skip,
}

/// Non-fatal conditions noticed while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A quoted literal was never closed; it was kept as-is.
    UnterminatedQuote { literal: String },
    /// A flag appeared more than once in one command.
    DuplicateFlag { command: Option<String>, flag: char },
    /// An argument key was given without a value.
    DanglingArgument { command: Option<String>, key: String },
    /// An unknown token was dropped under [`UnknownTokenPolicy::Skip`].
    SkippedToken { command: Option<String>, token: String },
}
