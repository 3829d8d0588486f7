//! Timestamped error log entries for failed metadata operations

use avumeta_store::MetaError;
use chrono::{DateTime, Local};
use std::fmt;

/// One failed operation, rendered newest first by `ErrorLog`
#[derive(Debug, Clone)]
pub struct ErrorLogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub description: String,
    pub code: i32,
}

impl ErrorLogEntry {
    pub fn new(message: impl Into<String>, description: impl Into<String>, code: i32) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            description: description.into(),
            code,
        }
    }

    pub fn from_error(message: impl Into<String>, err: &MetaError) -> Self {
        Self::new(message, err.to_string(), err.status_code())
    }
}

impl fmt::Display for ErrorLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.timestamp.format("%a %b %-d %H:%M:%S %Y"))?;
        write!(f, "{}", self.message)?;
        if !self.description.is_empty() {
            write!(f, "\nError Description: {}", self.description)?;
        }
        write!(f, "\nError Code: {}", self.code)
    }
}

/// Error log, newest entry first
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    pub fn log(&mut self, entry: ErrorLogEntry) {
        tracing::debug!("Logged error {}: {}", entry.code, entry.message);
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
