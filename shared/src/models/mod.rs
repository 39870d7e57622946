//! Data models for the Logpulse log stream.
//!
//! This module contains the log entry structure and the filter predicates
//! applied to the buffered view.

pub mod filter;
pub mod log;

pub use filter::{LevelFilter, LogFilter, ServiceFilter};
pub use log::{LogEntry, LogLevel, LogValidationError, ParseLevelError};
