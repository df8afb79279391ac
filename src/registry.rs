//! Name-keyed registry of executable commands.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

use crate::command::{Arguments, ConsoleCommand, Flags};
use crate::outcome::{Outcome, Rejection};

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command name cannot be empty or whitespace")]
    BlankName,
}

/// Errors raised by command handlers.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("missing required argument '--{0}'")]
    MissingArgument(String),

    #[error("{0}")]
    Failed(String),
}

/// Something that can be executed with a command's arguments and flags.
pub trait Handler {
    fn execute(
        &self,
        arguments: &Arguments,
        flags: &Flags,
        out: &mut dyn Write,
    ) -> Result<Outcome, CommandError>;
}

impl<F> Handler for F
where
    F: Fn(&Arguments, &Flags, &mut dyn Write) -> Result<Outcome, CommandError>,
{
    fn execute(
        &self,
        arguments: &Arguments,
        flags: &Flags,
        out: &mut dyn Write,
    ) -> Result<Outcome, CommandError> {
        self(arguments, flags, out)
    }
}

/// What runs when a command is dispatched.
pub enum Action {
    /// Print the list of commands.
    Help,
    /// Print application information, then exit.
    Info,
    Custom(Box<dyn Handler>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Help => f.write_str("Help"),
            Action::Info => f.write_str("Info"),
            Action::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A registered command: its description, what it accepts and what it runs.
#[derive(Debug)]
pub struct CommandSpec {
    pub description: String,
    /// Accepted argument keys.
    pub valid_arguments: BTreeSet<String>,
    /// Accepted flags.
    pub valid_flags: BTreeSet<char>,
    pub action: Action,
}

impl CommandSpec {
    pub fn new(description: impl Into<String>, action: Action) -> Self {
        Self {
            description: description.into(),
            valid_arguments: BTreeSet::new(),
            valid_flags: BTreeSet::new(),
            action,
        }
    }

    /// Build a spec around a closure or other [`Handler`].
    pub fn handler(description: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(description, Action::Custom(Box::new(handler)))
    }

    pub fn with_argument(mut self, key: impl Into<String>) -> Self {
        self.valid_arguments.insert(key.into());
        self
    }

    pub fn with_flag(mut self, flag: char) -> Self {
        self.valid_flags.insert(flag);
        self
    }

    /// Check a parsed command against the accepted arguments and flags.
    ///
    /// Every offending argument and flag is reported, not just the first.
    pub fn validate(&self, command: &ConsoleCommand) -> Result<(), Rejection> {
        let arguments: Vec<String> = command
            .arguments()
            .keys()
            .filter(|k| !self.valid_arguments.contains(*k))
            .cloned()
            .collect();
        let flags: Vec<char> = command
            .flags()
            .iter()
            .filter(|f| !self.valid_flags.contains(*f))
            .copied()
            .collect();

        if arguments.is_empty() && flags.is_empty() {
            return Ok(());
        }
        Err(Rejection::InvalidUsage {
            command: command.name().unwrap_or_default().to_string(),
            arguments,
            flags,
        })
    }
}

/// Commands known to the dispatcher, keyed by lowercase name.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, name: &str, spec: CommandSpec) -> Result<(), RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::BlankName);
        }
        self.insert(name, spec);
        Ok(())
    }

    /// Register under a name known to be non-blank.
    pub(crate) fn insert(&mut self, name: &str, spec: CommandSpec) {
        self.commands.insert(name.trim().to_lowercase(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandSpec)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Arguments, _: &Flags, _: &mut dyn Write) -> Result<Outcome, CommandError> {
        Ok(Outcome::Continue)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CommandRegistry::new();
        registry
            .register("Send", CommandSpec::handler("Send things", noop))
            .unwrap();
        assert!(registry.contains("send"));
        assert!(registry.contains(" SEND "));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["send"]);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register("   ", CommandSpec::handler("nothing", noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::BlankName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = CommandRegistry::new();
        registry
            .register("a", CommandSpec::handler("first", noop))
            .unwrap();
        registry
            .register("A", CommandSpec::handler("second", noop))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().description, "second");
    }

    #[test]
    fn test_insert_normalizes_name() {
        let mut registry = CommandRegistry::new();
        registry.insert(" Help ", CommandSpec::new("Help", Action::Help));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["help"]);
        assert!(matches!(registry.get("HELP").unwrap().action, Action::Help));
    }

    #[test]
    fn test_validate_accepts_allowed() {
        let spec = CommandSpec::handler("Echo", noop)
            .with_argument("text")
            .with_flag('u');
        let cmd = ConsoleCommand::new(Some("echo"))
            .with_argument("text", Some("hi"))
            .with_flag('u');
        assert!(spec.validate(&cmd).is_ok());
    }

    #[test]
    fn test_validate_reports_all_offenders() {
        let spec = CommandSpec::handler("Echo", noop).with_argument("text");
        let cmd = ConsoleCommand::new(Some("echo"))
            .with_argument("text", Some("hi"))
            .with_argument("color", Some("red"))
            .with_flag('x')
            .with_flag('y');
        let err = spec.validate(&cmd).unwrap_err();
        assert_eq!(
            err,
            Rejection::InvalidUsage {
                command: "echo".to_string(),
                arguments: vec!["color".to_string()],
                flags: vec!['x', 'y'],
            }
        );
    }

    #[test]
    fn test_closure_handler() {
        let spec = CommandSpec::handler(
            "Greet",
            |args: &Arguments, _: &Flags, out: &mut dyn Write| -> Result<Outcome, CommandError> {
                let who = args.get("name").cloned().flatten().unwrap_or_default();
                writeln!(out, "hello {}", who)?;
                Ok(Outcome::Continue)
            },
        );
        let Action::Custom(handler) = &spec.action else {
            panic!("expected custom action");
        };
        let mut args = Arguments::new();
        args.insert("name".to_string(), Some("ann".to_string()));
        let mut out = Vec::new();
        let outcome = handler.execute(&args, &Flags::new(), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(String::from_utf8(out).unwrap(), "hello ann\n");
    }
}
