//! Configuration module for Logpulse.
//!
//! This module contains the settings that shape the log stream simulator.

pub mod simulator;

pub use simulator::{ConfigError, SimulatorConfig, MAX_CAPACITY};
