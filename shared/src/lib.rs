//! Logpulse Shared Library
//!
//! This crate contains the log stream simulator and the types shared by the
//! Logpulse API server and CLI.
//!
//! # Modules
//!
//! - [`models`] - Log entries, levels, and filter predicates
//! - [`storage`] - The bounded newest-first log buffer
//! - [`simulator`] - Generator, scheduler seam, and the stream simulator
//! - [`export`] - Plain-text export format
//! - [`config`] - Simulator settings
//!
//! # Example
//!
//! ```
//! use shared::models::{LogFilter, LogLevel};
//! use shared::simulator::{LogGenerator, LogStreamSimulator, ManualScheduler};
//! use shared::storage::BoundedLogStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let simulator = LogStreamSimulator::new(
//!     Arc::new(BoundedLogStore::new(100)),
//!     LogGenerator::seeded(42),
//!     Arc::new(ManualScheduler::new()),
//!     Duration::from_secs(3),
//! );
//!
//! simulator.tick().unwrap();
//! simulator.tick().unwrap();
//!
//! let text = simulator.export(&LogFilter::new()).unwrap();
//! assert_eq!(text.lines().count(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod export;
pub mod models;
pub mod simulator;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
