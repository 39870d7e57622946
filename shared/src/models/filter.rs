//! Filter predicates for the log view.
//!
//! A `LogFilter` combines a level filter, a service filter, and a free-text
//! query. All three must match for an entry to be included. Parsing from raw
//! strings never fails: values that do not name a level produce a filter that
//! matches nothing.

use super::log::{LogEntry, LogLevel};
use serde::{Deserialize, Serialize};

/// Keyword that selects every level or every service.
pub const ALL_KEYWORD: &str = "all";

/// Level predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelFilter {
    /// Matches every level.
    #[default]
    All,
    /// Matches exactly one level.
    Only(LogLevel),
    /// A value that names no level; matches nothing.
    Unrecognized(String),
}

impl LevelFilter {
    /// Parses a raw filter value. `"all"` (any case) and blank input select
    /// every level.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_KEYWORD) {
            return Self::All;
        }
        raw.parse::<LogLevel>()
            .map_or_else(|_| Self::Unrecognized(raw.to_string()), Self::Only)
    }

    /// Returns true if `level` passes this filter.
    #[must_use]
    pub fn matches(&self, level: LogLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == level,
            Self::Unrecognized(_) => false,
        }
    }
}

/// Service predicate (exact match on the service label).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceFilter {
    /// Matches every service.
    #[default]
    All,
    /// Matches a single service name.
    Named(String),
}

impl ServiceFilter {
    /// Parses a raw filter value. `"all"` (any case) and blank input select
    /// every service.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_KEYWORD) {
            Self::All
        } else {
            Self::Named(raw.to_string())
        }
    }

    /// Returns true if `service` passes this filter.
    #[must_use]
    pub fn matches(&self, service: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == service,
        }
    }
}

/// Combined filter over level, service, and free text.
///
/// # Example
///
/// ```
/// use shared::models::{LogEntry, LogFilter, LogLevel};
///
/// let filter = LogFilter::new()
///     .with_level(LogLevel::Error)
///     .with_text("TOKEN");
///
/// let hit = LogEntry::new("1", LogLevel::Error, "auth-api", "invalid token signature");
/// let miss = LogEntry::new("2", LogLevel::Info, "auth-api", "token refreshed");
///
/// assert!(filter.matches(&hit));
/// assert!(!filter.matches(&miss));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Level predicate.
    pub level: LevelFilter,
    /// Service predicate.
    pub service: ServiceFilter,
    /// Case-insensitive substring matched against message or service.
    pub text: String,
}

impl LogFilter {
    /// Creates a filter that matches every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from optional raw values, as received from a query
    /// string or command line.
    #[must_use]
    pub fn from_raw(level: Option<&str>, service: Option<&str>, text: Option<&str>) -> Self {
        Self {
            level: level.map_or(LevelFilter::All, LevelFilter::parse),
            service: service.map_or(ServiceFilter::All, ServiceFilter::parse),
            text: text.unwrap_or_default().to_string(),
        }
    }

    /// Restricts the filter to one level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = LevelFilter::Only(level);
        self
    }

    /// Restricts the filter to one service.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = ServiceFilter::Named(service.into());
        self
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Returns true if the entry passes all three predicates.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.compile().matches(entry)
    }

    /// Lower-cases the text query once so it can be applied to many entries.
    pub(crate) fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            filter: self,
            needle: self.text.to_lowercase(),
        }
    }
}

/// A filter with its text query prepared for repeated matching.
pub(crate) struct CompiledFilter<'a> {
    filter: &'a LogFilter,
    needle: String,
}

impl CompiledFilter<'_> {
    pub(crate) fn matches(&self, entry: &LogEntry) -> bool {
        if !self.filter.level.matches(entry.level) {
            return false;
        }
        if !self.filter.service.matches(&entry.service) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        entry.message.to_lowercase().contains(&self.needle)
            || entry.service.to_lowercase().contains(&self.needle)
    }
}
