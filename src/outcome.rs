//! What a dispatched command resulted in.

use serde::Serialize;
use thiserror::Error;

/// Result of running a command handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Carry on with the next command.
    #[default]
    Continue,
    /// Stop processing and leave the process with this exit code.
    Exit(u8),
}

impl Outcome {
    pub fn exit(code: u8) -> Self {
        Outcome::Exit(code)
    }

    /// Check if this outcome ends the run.
    pub fn is_exit(&self) -> bool {
        matches!(self, Outcome::Exit(_))
    }

    pub fn exit_code(&self) -> Option<u8> {
        match self {
            Outcome::Exit(code) => Some(*code),
            Outcome::Continue => None,
        }
    }
}

/// Why a parsed command was not executed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    #[error("Invalid command. No command was provided.")]
    NoCommand,

    #[error("Invalid command: {name}")]
    UnknownCommand { name: String },

    #[error("{}", invalid_usage_message(.command, .arguments, .flags))]
    InvalidUsage {
        command: String,
        arguments: Vec<String>,
        flags: Vec<char>,
    },
}

fn invalid_usage_message(command: &str, arguments: &[String], flags: &[char]) -> String {
    let mut msg = format!("Invalid arguments or flags provided for '{}'.", command);
    for arg in arguments {
        msg.push_str(&format!("\nInvalid argument: {}", arg));
    }
    for flag in flags {
        msg.push_str(&format!("\nInvalid flag: {}", flag));
    }
    msg
}
