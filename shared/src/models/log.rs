//! Log data model.
//!
//! Defines the `LogEntry` produced by the stream simulator and the closed
//! `LogLevel` enum it is tagged with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Display format for log timestamps (`HH:MM:SS.mmm`).
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Log severity level.
///
/// The set is closed; there is no ordering between levels beyond display
/// grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Error conditions.
    Error,
    /// Warning conditions.
    Warn,
    /// Informational messages.
    Info,
    /// Debug information.
    Debug,
}

impl LogLevel {
    /// Every level, in display order.
    pub const ALL: [Self; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Returns the upper-case label used in displays and exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a log level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// A single log event held in the stream buffer.
///
/// # Example
///
/// ```
/// use shared::models::{LogEntry, LogLevel};
///
/// let log = LogEntry::new("1", LogLevel::Info, "auth-api", "JWT token validated successfully")
///     .with_trace_id("trace-008");
///
/// assert!(log.validate_entry().is_ok());
/// assert_eq!(log.trace_id.as_deref(), Some("trace-008"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Identifier, unique within the buffer.
    #[validate(length(min = 1, message = "Id cannot be empty"))]
    pub id: String,

    /// Wall-clock time the entry was created.
    pub timestamp: DateTime<Utc>,

    /// Severity level of the log.
    pub level: LogLevel,

    /// Name of the service that emitted the log.
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service: String,

    /// The log message content.
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,

    /// Optional correlation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Errors that can occur during log entry validation.
#[derive(Debug, Error)]
pub enum LogValidationError {
    /// The entry id is empty.
    #[error("Log id cannot be empty")]
    EmptyId,

    /// The log message is empty.
    #[error("Log message cannot be empty")]
    EmptyMessage,

    /// The service name is empty.
    #[error("Service name cannot be empty")]
    EmptyService,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl LogEntry {
    /// Creates a new log entry stamped with the current time.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        level: LogLevel,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            level,
            service: service.into(),
            message: message.into(),
            trace_id: None,
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the trace ID for correlation.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Returns the timestamp in the fixed-width `HH:MM:SS.mmm` form.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Validates the log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the id, message, or service name is empty.
    pub fn validate_entry(&self) -> Result<(), LogValidationError> {
        if self.id.is_empty() {
            return Err(LogValidationError::EmptyId);
        }
        if self.message.is_empty() {
            return Err(LogValidationError::EmptyMessage);
        }
        if self.service.is_empty() {
            return Err(LogValidationError::EmptyService);
        }
        self.validate()?;
        Ok(())
    }
}
