//! The parsed command record handed to the dispatcher.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Argument key (without dashes) to optional value.
pub type Arguments = BTreeMap<String, Option<String>>;

/// Single-character flags.
pub type Flags = BTreeSet<char>;

/// One command discovered on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsoleCommand {
    name: Option<String>,
    arguments: Arguments,
    flags: Flags,
}

impl ConsoleCommand {
    /// Create an empty record, optionally bound to a command name.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            ..Default::default()
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.insert_argument(key.into(), value.map(String::from));
        self
    }

    pub fn with_flag(mut self, flag: char) -> Self {
        self.insert_flag(flag);
        self
    }

    /// The recognized command name, or `None` for the anonymous bucket.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Look up an argument.
    ///
    /// The outer `Option` tells whether the key was given at all, the inner one
    /// whether it carried a value.
    pub fn argument(&self, key: &str) -> Option<Option<&str>> {
        self.arguments.get(key).map(|v| v.as_deref())
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub(crate) fn insert_argument(&mut self, key: String, value: Option<String>) {
        self.arguments.insert(key, value);
    }

    /// Returns `false` if the flag was already present.
    pub(crate) fn insert_flag(&mut self, flag: char) -> bool {
        self.flags.insert(flag)
    }
}
