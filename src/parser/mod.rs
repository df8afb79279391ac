//! Command-line parsing: quote joining, command segmentation and per-command
//! argument/flag extraction.

mod error;
mod quotes;
mod segmenter;
mod tokenizer;

pub use error::{Diagnostic, ParseError, UnknownTokenPolicy};
pub use quotes::{JoinedTokens, join_quoted};
pub use segmenter::{Bucket, KnownCommands, segment};
pub use tokenizer::tokenize_bucket;

use tracing::{debug, warn};

use crate::command::ConsoleCommand;

/// Commands parsed from one invocation, plus any advisory diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub commands: Vec<ConsoleCommand>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parser for a fixed set of command names.
#[derive(Debug, Clone, Default)]
pub struct CommandLineParser {
    known: KnownCommands,
    policy: UnknownTokenPolicy,
}

impl CommandLineParser {
    pub fn new<I, S>(known_commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: KnownCommands::new(known_commands),
            policy: UnknownTokenPolicy::default(),
        }
    }

    pub fn with_unknown_token_policy(mut self, policy: UnknownTokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse tokens into command records, in the order the commands appear.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<ConsoleCommand>, ParseError> {
        self.parse_with_diagnostics(tokens).map(|r| r.commands)
    }

    /// Like [`parse`](Self::parse), but also returns the non-fatal conditions
    /// encountered along the way.
    pub fn parse_with_diagnostics<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<ParseReport, ParseError> {
        let mut diagnostics = Vec::new();

        let joined = join_quoted(tokens);
        if let Some(literal) = joined.unterminated {
            warn!(literal = %literal, "quoted literal was never closed");
            diagnostics.push(Diagnostic::UnterminatedQuote { literal });
        }

        let buckets = segment(&joined.tokens, &self.known);
        debug!(tokens = joined.tokens.len(), buckets = buckets.len(), "segmented command line");

        let commands = buckets
            .iter()
            .map(|bucket| tokenize_bucket(bucket, self.policy, &mut diagnostics))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParseReport {
            commands,
            diagnostics,
        })
    }
}

/// Parse tokens against `known_commands`, aborting on unknown tokens.
pub fn parse_commands<S: AsRef<str>>(
    tokens: &[S],
    known_commands: &[&str],
) -> Result<Vec<ConsoleCommand>, ParseError> {
    CommandLineParser::new(known_commands).parse(tokens)
}
