//! Console Commands demo entry point.

use console_commands::audit::AuditLogger;
use console_commands::config::{Config, LOG_ENV};
use console_commands::dispatch::{DispatchError, Dispatcher};
use console_commands::output::{AppInfo, color_choice};
use console_commands::registry::{CommandError, CommandRegistry, CommandSpec};
use console_commands::{Arguments, Flags, Outcome};

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::StandardStream;
use tracing::{Level, warn};

fn main() -> ExitCode {
    let cwd = std::env::current_dir().ok();

    // Fail-open to defaults on a broken config
    let config = match Config::load(cwd.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            Config::default()
        }
    };

    init_logging(&config);

    let mut registry = CommandRegistry::new();
    let echo_spec = CommandSpec::handler("Prints the given text.", echo)
        .with_argument("text")
        .with_flag('u')
        .with_flag('n');
    if let Err(e) = registry.register("echo", echo_spec) {
        eprintln!("Registry error: {}", e);
        return ExitCode::FAILURE;
    }

    let app = AppInfo::new(
        config
            .app
            .name
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
        config
            .app
            .version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        cwd.unwrap_or_default(),
    );

    let mut dispatcher = Dispatcher::new(registry, app, config.unknown_token_policy());
    if let Some(path) = config.audit_path() {
        match AuditLogger::open(path) {
            Ok(logger) => dispatcher = dispatcher.with_audit(logger),
            Err(e) => warn!("failed to open audit log {}: {}", path.display(), e),
        }
    }

    let tokens = match utf8_args(std::env::args_os().skip(1)) {
        Ok(tokens) => tokens,
        Err(arg) => {
            eprintln!("argument is not valid UTF-8: {}", arg.to_string_lossy());
            return ExitCode::from(2);
        }
    };

    let stdout = StandardStream::stdout(color_choice(&io::stdout()));
    let stderr = StandardStream::stderr(color_choice(&io::stderr()));
    let result = dispatcher.run(&tokens, &mut stdout.lock(), &mut stderr.lock());

    match result {
        Ok(report) => match report.exit {
            Some(code) => ExitCode::from(code),
            None if report.rejected > 0 => ExitCode::FAILURE,
            None => ExitCode::SUCCESS,
        },
        Err(e @ DispatchError::Parse(_)) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Collect the arguments, stopping at the first one that is not UTF-8.
fn utf8_args(args: impl Iterator<Item = OsString>) -> Result<Vec<String>, OsString> {
    args.map(OsString::into_string).collect()
}

fn init_logging(config: &Config) {
    let env_level = std::env::var(LOG_ENV).ok();
    let level = config.log_level(env_level.as_deref()).unwrap_or_else(|e| {
        eprintln!("Config error: {}", e);
        Level::WARN
    });
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// `echo --text=<text> [-u] [-n]`
fn echo(
    arguments: &Arguments,
    flags: &Flags,
    out: &mut dyn Write,
) -> Result<Outcome, CommandError> {
    let text = arguments
        .get("text")
        .cloned()
        .flatten()
        .ok_or_else(|| CommandError::MissingArgument("text".to_string()))?;
    let text = if flags.contains(&'u') {
        text.to_uppercase()
    } else {
        text
    };
    if flags.contains(&'n') {
        write!(out, "{}", text)?;
    } else {
        writeln!(out, "{}", text)?;
    }
    Ok(Outcome::Continue)
}
