//! Per-bucket extraction of arguments and flags.

use tracing::warn;

use super::error::{Diagnostic, ParseError, UnknownTokenPolicy};
use super::segmenter::Bucket;
use crate::command::ConsoleCommand;

#[derive(Debug)]
enum State {
    None,
    /// A `--key` was seen and its value has not arrived yet.
    ExpectingValue(String),
    AfterFlag,
}

/// Turn one bucket into a command record.
pub fn tokenize_bucket(
    bucket: &Bucket<'_>,
    policy: UnknownTokenPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ConsoleCommand, ParseError> {
    let mut command = ConsoleCommand::new(None);
    let mut state = State::None;

    for raw in bucket.tokens {
        let token = raw.trim();

        state = match state {
            State::ExpectingValue(key) if token == "=" => State::ExpectingValue(key),
            State::ExpectingValue(key) => {
                // A value shaped like `--a=b=c` is still malformed.
                if token.starts_with("--") && token.contains('=') {
                    split_argument(token)?;
                }
                command.insert_argument(key, Some(token.to_string()));
                State::None
            }
            _ if token.starts_with("--") && token.contains('=') => {
                let (key, value) = split_argument(token)?;
                command.insert_argument(key, Some(value));
                State::None
            }
            _ if token.starts_with("--") => {
                State::ExpectingValue(token.trim_start_matches('-').to_string())
            }
            _ if token.starts_with('-') => {
                for flag in token.chars().skip(1) {
                    if !command.insert_flag(flag) {
                        warn!(flag = %flag, command = ?bucket.command, "flag was already defined");
                        diagnostics.push(Diagnostic::DuplicateFlag {
                            command: bucket.command.map(String::from),
                            flag,
                        });
                    }
                }
                State::AfterFlag
            }
            current => match bucket.command {
                Some(name) if is_same_name(name, token) => {
                    command.set_name(name);
                    current
                }
                _ => {
                    skip_unknown(bucket, token, policy, diagnostics)?;
                    current
                }
            },
        };
    }

    if let State::ExpectingValue(key) = state {
        warn!(key = %key, command = ?bucket.command, "argument has no value");
        diagnostics.push(Diagnostic::DanglingArgument {
            command: bucket.command.map(String::from),
            key: key.clone(),
        });
        command.insert_argument(key, None);
    }

    Ok(command)
}

/// Split `--key=value` on its only `=`.
fn split_argument(token: &str) -> Result<(String, String), ParseError> {
    let format_error = || ParseError::ArgumentFormat {
        token: token.to_string(),
    };
    let (key, value) = token.split_once('=').ok_or_else(format_error)?;
    if value.contains('=') {
        return Err(format_error());
    }
    Ok((key.trim_start_matches('-').to_string(), value.to_string()))
}

fn is_same_name(name: &str, token: &str) -> bool {
    name.trim().to_lowercase() == token.to_lowercase()
}

fn skip_unknown(
    bucket: &Bucket<'_>,
    token: &str,
    policy: UnknownTokenPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), ParseError> {
    let command = bucket.command.map(String::from);
    match policy {
        UnknownTokenPolicy::Abort => Err(ParseError::UnknownToken {
            token: token.to_string(),
            command,
        }),
        UnknownTokenPolicy::Skip => {
            warn!(token = %token, command = ?bucket.command, "skipping unknown token");
            diagnostics.push(Diagnostic::SkippedToken {
                command,
                token: token.to_string(),
            });
            Ok(())
        }
    }
}
