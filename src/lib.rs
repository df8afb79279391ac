//! Console Commands - multi-command line parsing and dispatch.
//!
//! Splits a process argument vector into one record per recognized command,
//! each with its own `--key=value` arguments and `-abc` flags, and runs the
//! records against a registry of handlers.

pub mod audit;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod outcome;
pub mod output;
pub mod parser;
pub mod registry;

pub use command::{Arguments, ConsoleCommand, Flags};
pub use config::Config;
pub use dispatch::{DispatchError, Dispatcher, RunReport};
pub use outcome::{Outcome, Rejection};
pub use parser::{CommandLineParser, ParseError, UnknownTokenPolicy, parse_commands};
pub use registry::{Action, CommandError, CommandRegistry, CommandSpec, Handler};
