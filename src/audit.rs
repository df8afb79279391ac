//! Audit logging of dispatched commands.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::command::{Arguments, ConsoleCommand, Flags};

/// How the dispatcher handled a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Executed,
    Rejected,
    /// The handler asked the run to stop.
    Exit,
}

/// An audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Command name, absent for the anonymous command.
    pub command: Option<String>,
    pub arguments: Arguments,
    pub flags: Flags,
    pub status: DispatchStatus,
    /// Reason for a rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEntry {
    pub fn new(command: &ConsoleCommand, status: DispatchStatus, reason: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.name().map(String::from),
            arguments: command.arguments().clone(),
            flags: command.flags().clone(),
            status,
            reason: reason.map(|r| truncate_string(r, 200)),
        }
    }
}

fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

/// Audit logger for writing entries to a file.
#[derive(Debug)]
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create an audit log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an audit entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log how a command was dispatched.
    pub fn log_dispatch(
        &mut self,
        command: &ConsoleCommand,
        status: DispatchStatus,
        reason: Option<&str>,
    ) -> std::io::Result<()> {
        let entry = AuditEntry::new(command, status, reason);
        self.log(&entry)
    }
}
