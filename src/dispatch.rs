//! Run parsed commands against a registry.

use std::io;
use termcolor::WriteColor;
use thiserror::Error;
use tracing::{debug, warn};

use crate::audit::{AuditLogger, DispatchStatus};
use crate::command::ConsoleCommand;
use crate::outcome::{Outcome, Rejection};
use crate::output::style::theme;
use crate::output::{AppInfo, print_styled, render_help, render_info};
use crate::parser::{CommandLineParser, ParseError, UnknownTokenPolicy};
use crate::registry::{Action, CommandError, CommandRegistry, CommandSpec};

/// Errors that end a dispatcher run.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to parse command line: {0}")]
    Parse(#[from] ParseError),

    #[error("command '{command}' failed: {source}")]
    Command {
        command: String,
        #[source]
        source: CommandError,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Summary of one dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Commands whose handler ran.
    pub executed: usize,
    /// Commands refused before reaching a handler.
    pub rejected: usize,
    /// Exit code requested by a handler, if any.
    pub exit: Option<u8>,
}

/// Parses a command line and invokes the registered handlers in order.
#[derive(Debug)]
pub struct Dispatcher {
    registry: CommandRegistry,
    app: AppInfo,
    policy: UnknownTokenPolicy,
    audit: Option<AuditLogger>,
}

impl Dispatcher {
    /// Create a dispatcher; the built-in `help` and `info` commands are added
    /// to the registry.
    pub fn new(mut registry: CommandRegistry, app: AppInfo, policy: UnknownTokenPolicy) -> Self {
        registry.insert(
            "help",
            CommandSpec::new("Shows all available commands.", Action::Help),
        );
        registry.insert("info", CommandSpec::new("Shows app information.", Action::Info));
        Self {
            registry,
            app,
            policy,
            audit: None,
        }
    }

    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse `tokens` and dispatch every command found.
    ///
    /// Rejected commands are reported on `err`, in red, and do not stop the
    /// run. A handler returning [`Outcome::Exit`] does.
    pub fn run<S, O, E>(
        &mut self,
        tokens: &[S],
        out: &mut O,
        err: &mut E,
    ) -> Result<RunReport, DispatchError>
    where
        S: AsRef<str>,
        O: WriteColor,
        E: WriteColor,
    {
        let parser =
            CommandLineParser::new(self.registry.names()).with_unknown_token_policy(self.policy);
        let commands = parser.parse(tokens)?;
        debug!(count = commands.len(), "dispatching commands");

        let mut report = RunReport::default();
        for command in &commands {
            match self.dispatch(command, out)? {
                Err(rejection) => {
                    warn!(command = ?command.name(), "{}", rejection);
                    print_styled(err, &rejection.to_string(), theme::ERROR)?;
                    report.rejected += 1;
                    self.record(command, DispatchStatus::Rejected, Some(&rejection.to_string()));
                }
                Ok(Outcome::Continue) => {
                    report.executed += 1;
                    self.record(command, DispatchStatus::Executed, None);
                }
                Ok(Outcome::Exit(code)) => {
                    report.executed += 1;
                    report.exit = Some(code);
                    self.record(command, DispatchStatus::Exit, None);
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Resolve and run one command. The inner `Err` is a rejection, the outer
    /// one a failure that ends the run.
    fn dispatch<O: WriteColor>(
        &self,
        command: &ConsoleCommand,
        out: &mut O,
    ) -> Result<Result<Outcome, Rejection>, DispatchError> {
        let spec = match self.resolve(command) {
            Ok(spec) => spec,
            Err(rejection) => return Ok(Err(rejection)),
        };
        let name = command.name().unwrap_or_default();
        debug!(command = name, "executing");

        let outcome = match &spec.action {
            Action::Help => {
                render_help(&self.app, &self.registry, out)?;
                Outcome::Continue
            }
            Action::Info => {
                render_info(&self.app, out)?;
                Outcome::Exit(0)
            }
            Action::Custom(handler) => handler
                .execute(command.arguments(), command.flags(), out)
                .map_err(|source| DispatchError::Command {
                    command: name.to_string(),
                    source,
                })?,
        };
        Ok(Ok(outcome))
    }

    fn resolve(&self, command: &ConsoleCommand) -> Result<&CommandSpec, Rejection> {
        let name = command.name().ok_or(Rejection::NoCommand)?;
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| Rejection::UnknownCommand {
                name: name.to_string(),
            })?;
        spec.validate(command)?;
        Ok(spec)
    }

    fn record(&mut self, command: &ConsoleCommand, status: DispatchStatus, reason: Option<&str>) {
        if let Some(logger) = &mut self.audit
            && let Err(e) = logger.log_dispatch(command, status, reason)
        {
            warn!("failed to write audit entry: {}", e);
        }
    }
}
