//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::SimulatorConfig;
use shared::simulator::{
    LogGenerator, LogStreamSimulator, ManualScheduler, Scheduler, TracingNotifier,
};
use shared::storage::{BoundedLogStore, LogStoreError};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The log stream simulator serving every log route.
    simulator: Arc<LogStreamSimulator>,
}

impl AppState {
    /// Creates a new application state around an existing simulator.
    #[must_use]
    pub fn new(simulator: Arc<LogStreamSimulator>) -> Self {
        Self { simulator }
    }

    /// Builds the simulator described by `config` on top of `scheduler`.
    ///
    /// Notifications are forwarded to `tracing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample entries cannot be preloaded.
    pub fn from_config(
        config: &SimulatorConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, LogStoreError> {
        let simulator = LogStreamSimulator::from_config(config, scheduler)?
            .with_notifier(Arc::new(TracingNotifier));
        Ok(Self::new(Arc::new(simulator)))
    }

    /// Creates an empty, stopped, seeded simulator whose ticks are driven by
    /// the returned `ManualScheduler`.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_manual_scheduler() -> (Self, ManualScheduler) {
        let config = SimulatorConfig::default();
        let scheduler = ManualScheduler::new();
        let simulator = LogStreamSimulator::new(
            Arc::new(BoundedLogStore::new(config.capacity)),
            LogGenerator::seeded(0),
            Arc::new(scheduler.clone()),
            config.tick_interval(),
        );
        (Self::new(Arc::new(simulator)), scheduler)
    }

    /// Returns a reference to the simulator.
    #[must_use]
    pub fn simulator(&self) -> &LogStreamSimulator {
        self.simulator.as_ref()
    }
}
