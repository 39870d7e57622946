//! Storage traits and implementations.
//!
//! The `LogStore` trait defines the interface for the log buffer, allowing the
//! simulator to work against any bounded, newest-first implementation.

pub mod log_store;

pub use log_store::{
    BoundedLogStore, LogQuery, LogQueryResult, LogStore, LogStoreError, DEFAULT_CAPACITY,
};
