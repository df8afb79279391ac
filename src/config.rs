//! Configuration loading and merging.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

use crate::parser::UnknownTokenPolicy;

/// Environment variable pointing at the user config file.
pub const CONFIG_ENV: &str = "CONSOLE_COMMANDS_CONFIG";

/// Environment variable overriding the configured log level.
pub const LOG_ENV: &str = "CONSOLE_COMMANDS_LOG";

/// File name of the per-project config, looked up in the working directory.
pub const PROJECT_CONFIG: &str = ".console-commands.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Parser behaviour.
    pub parser: ParserConfig,

    /// Diagnostic logging.
    pub log: LogConfig,

    /// Audit logging settings.
    pub audit: AuditConfig,

    /// Application identity shown by `info` and `help`.
    pub app: AppConfig,
}

/// Parser configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Abort on, or skip, tokens that cannot be classified.
    pub unknown_tokens: Option<UnknownTokenPolicy>,
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error.
    pub level: Option<String>,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: bool,
    /// Path to audit log file.
    pub path: Option<String>,
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config()? {
            config = user_config;
        }

        if let Some(cwd) = cwd
            && let Some(project_config) = Self::load_project_config(cwd)?
        {
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_user_config() -> Result<Option<Self>, ConfigError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Ok(Some(Self::parse(&fs::read_to_string(&path)?)?)),
            _ => Ok(None),
        }
    }

    fn load_project_config(cwd: &Path) -> Result<Option<Self>, ConfigError> {
        let path = cwd.join(PROJECT_CONFIG);
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return Ok(Some(Self::parse(&content)?));
        }
        Ok(None)
    }

    /// Get user config path.
    /// Respects CONSOLE_COMMANDS_CONFIG for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("console-commands.toml"))
    }

    /// Merge another config into this one (other takes precedence for scalars).
    fn merge(&mut self, other: Config) {
        if other.parser.unknown_tokens.is_some() {
            self.parser.unknown_tokens = other.parser.unknown_tokens;
        }
        if other.log.level.is_some() {
            self.log.level = other.log.level;
        }
        if other.audit.enabled {
            self.audit.enabled = true;
            if other.audit.path.is_some() {
                self.audit.path = other.audit.path;
            }
        }
        if other.app.name.is_some() {
            self.app.name = other.app.name;
        }
        if other.app.version.is_some() {
            self.app.version = other.app.version;
        }
    }

    pub fn unknown_token_policy(&self) -> UnknownTokenPolicy {
        self.parser.unknown_tokens.unwrap_or_default()
    }

    /// Resolve the log level. `override_level` (usually from the environment)
    /// wins over the config file; the default is `warn`.
    pub fn log_level(&self, override_level: Option<&str>) -> Result<Level, ConfigError> {
        let raw = override_level.or(self.log.level.as_deref()).unwrap_or("warn");
        Level::from_str(raw.trim()).map_err(|_| ConfigError::LogLevel(raw.to_string()))
    }

    /// The audit log path, when auditing is switched on.
    pub fn audit_path(&self) -> Option<&Path> {
        if !self.audit.enabled {
            return None;
        }
        self.audit.path.as_deref().map(Path::new)
    }
}
