//! Log storage trait and the bounded in-memory implementation.
//!
//! Provides the `LogStore` trait for abstracting the log buffer and a
//! `BoundedLogStore` that keeps the newest `capacity` entries, evicting the
//! oldest on overflow.

use crate::models::{LogEntry, LogFilter, LogValidationError};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Default number of entries retained by the buffer.
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors that can occur during log store operations.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on log store")]
    LockError,

    /// An entry with the same id is already buffered.
    #[error("Duplicate log id: {0}")]
    DuplicateId(String),

    /// The entry failed validation.
    #[error("Invalid log entry: {0}")]
    InvalidEntry(#[from] LogValidationError),
}

/// Query parameters for reading the buffer.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Level, service, and text predicates.
    pub filter: LogFilter,

    /// Maximum number of logs to return.
    pub limit: Option<usize>,

    /// Number of logs to skip (for pagination).
    pub offset: Option<usize>,
}

impl LogQuery {
    /// Creates a new query that returns every buffered log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter predicates.
    #[must_use]
    pub fn with_filter(mut self, filter: LogFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl From<LogFilter> for LogQuery {
    fn from(filter: LogFilter) -> Self {
        Self::new().with_filter(filter)
    }
}

/// Result of a log query operation.
#[derive(Debug, Clone)]
pub struct LogQueryResult {
    /// The logs matching the query, newest first.
    pub logs: Vec<LogEntry>,

    /// Total count of matching logs (before limit/offset applied).
    pub total_count: usize,
}

/// Trait for log buffer implementations.
///
/// Entries are kept newest first. Implementations must be thread-safe
/// (Send + Sync) and reads must never mutate the buffer.
pub trait LogStore: Send + Sync {
    /// Inserts an entry at the front of the buffer.
    ///
    /// Returns the entry evicted from the tail, if the insertion overflowed
    /// the capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is invalid, its id is already buffered,
    /// or the lock cannot be acquired.
    fn insert(&self, entry: LogEntry) -> Result<Option<LogEntry>, LogStoreError>;

    /// Queries the buffer, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    fn query(&self, query: &LogQuery) -> Result<LogQueryResult, LogStoreError>;

    /// Returns the number of buffered entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    fn count(&self) -> Result<usize, LogStoreError>;

    /// Returns the maximum number of entries retained.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    fn clear(&self) -> Result<(), LogStoreError>;
}

/// Bounded in-memory log buffer.
///
/// Stores entries in a `VecDeque` protected by a `RwLock`, newest at the
/// front. Inserting into a full buffer drops the oldest entry.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::models::{LogEntry, LogLevel};
/// use shared::storage::{BoundedLogStore, LogQuery, LogStore};
///
/// let store = BoundedLogStore::new(2);
/// store.insert(LogEntry::new("1", LogLevel::Info, "web-app", "first")).unwrap();
/// store.insert(LogEntry::new("2", LogLevel::Info, "web-app", "second")).unwrap();
/// let evicted = store.insert(LogEntry::new("3", LogLevel::Info, "web-app", "third")).unwrap();
///
/// assert_eq!(evicted.unwrap().id, "1");
/// let result = store.query(&LogQuery::new()).unwrap();
/// assert_eq!(result.logs[0].id, "3");
/// ```
#[derive(Debug)]
pub struct BoundedLogStore {
    logs: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl BoundedLogStore {
    /// Creates an empty buffer holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            logs: Arc::new(RwLock::new(VecDeque::with_capacity(
                capacity.min(DEFAULT_CAPACITY),
            ))),
            capacity,
        }
    }

    /// Creates a new bounded store wrapped in an Arc.
    #[must_use]
    pub fn new_shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }
}

impl Default for BoundedLogStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LogStore for BoundedLogStore {
    fn insert(&self, entry: LogEntry) -> Result<Option<LogEntry>, LogStoreError> {
        entry.validate_entry()?;

        let mut logs = self.logs.write().map_err(|_| LogStoreError::LockError)?;
        if logs.iter().any(|log| log.id == entry.id) {
            return Err(LogStoreError::DuplicateId(entry.id));
        }

        logs.push_front(entry);
        let evicted = if logs.len() > self.capacity {
            logs.pop_back()
        } else {
            None
        };
        Ok(evicted)
    }

    fn query(&self, query: &LogQuery) -> Result<LogQueryResult, LogStoreError> {
        let logs = self.logs.read().map_err(|_| LogStoreError::LockError)?;
        let filter = query.filter.compile();

        let filtered: Vec<&LogEntry> = logs.iter().filter(|log| filter.matches(log)).collect();
        let total_count = filtered.len();

        let result = filtered
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(LogQueryResult {
            logs: result,
            total_count,
        })
    }

    fn count(&self) -> Result<usize, LogStoreError> {
        let logs = self.logs.read().map_err(|_| LogStoreError::LockError)?;
        Ok(logs.len())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) -> Result<(), LogStoreError> {
        let mut logs = self.logs.write().map_err(|_| LogStoreError::LockError)?;
        logs.clear();
        Ok(())
    }
}
