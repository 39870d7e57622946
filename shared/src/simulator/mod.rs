//! Live log stream simulator.
//!
//! `LogStreamSimulator` owns a bounded newest-first buffer, appends one
//! generated entry per tick while running, and serves filtered views and
//! plain-text exports of the buffer.
//!
//! # Run state
//!
//! The simulator is either stopped or running. `start` registers a periodic
//! tick with the injected [`Scheduler`]; `stop` cancels it. Each start opens a
//! new generation, and a scheduled tick only mutates the buffer while its own
//! generation is still active. The check and the insert happen under the same
//! lock `stop` takes, so no scheduled tick lands after `stop` returns.

pub mod clock;
pub mod generator;
pub mod notify;
pub mod scheduler;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{sample_entries, LogGenerator, DEFAULT_SERVICES, MESSAGE_CATALOG};
pub use notify::{
    NoopNotifier, Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier,
};
pub use scheduler::{
    ManualScheduler, PeriodicTask, ScheduledTask, Scheduler, TokioScheduler, MIN_PERIOD,
};

use crate::config::SimulatorConfig;
use crate::export;
use crate::models::{LogEntry, LogFilter};
use crate::storage::{BoundedLogStore, LogQuery, LogQueryResult, LogStore, LogStoreError};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Number of generated entries a slow subscriber may fall behind by.
const SUBSCRIBER_BUFFER: usize = 64;

/// Snapshot of the simulator's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorStatus {
    /// Whether periodic generation is active.
    pub running: bool,
    /// Number of buffered entries.
    pub len: usize,
    /// Maximum number of buffered entries.
    pub capacity: usize,
    /// Tick period in milliseconds.
    pub tick_interval_ms: u64,
}

/// Generation currently allowed to tick; `None` while stopped.
#[derive(Debug, Default)]
struct Gate {
    active: Option<u64>,
    last: u64,
}

struct Inner<R> {
    store: Arc<dyn LogStore>,
    generator: Mutex<LogGenerator<R>>,
    gate: Mutex<Gate>,
    events: broadcast::Sender<LogEntry>,
}

impl<R: Rng> Inner<R> {
    fn tick(&self) -> Result<LogEntry, LogStoreError> {
        let entry = self
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate();

        if let Some(evicted) = self.store.insert(entry.clone())? {
            tracing::trace!(id = %evicted.id, "Evicted oldest log entry");
        }
        tracing::debug!(
            id = %entry.id,
            level = %entry.level,
            service = %entry.service,
            "Generated log entry"
        );
        // No subscribers is fine.
        let _ = self.events.send(entry.clone());
        Ok(entry)
    }

    fn scheduled_tick(&self, generation: u64) {
        let gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if gate.active != Some(generation) {
            return;
        }
        if let Err(e) = self.tick() {
            tracing::warn!(error = %e, "Scheduled tick failed");
        }
        drop(gate);
    }
}

/// Bounded, live-updating log buffer with filtered views.
///
/// # Example
///
/// ```
/// use shared::models::{LogFilter, LogLevel};
/// use shared::simulator::{LogGenerator, LogStreamSimulator, ManualScheduler};
/// use shared::storage::BoundedLogStore;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let simulator = LogStreamSimulator::new(
///     Arc::new(BoundedLogStore::new(100)),
///     LogGenerator::seeded(1),
///     Arc::new(scheduler.clone()),
///     Duration::from_secs(3),
/// );
///
/// simulator.start();
/// scheduler.advance(Duration::from_secs(9));
/// simulator.stop();
///
/// assert_eq!(simulator.len().unwrap(), 3);
/// let errors = simulator.query(&LogFilter::new().with_level(LogLevel::Error)).unwrap();
/// assert!(errors.iter().all(|e| e.level == LogLevel::Error));
/// ```
pub struct LogStreamSimulator<R = StdRng> {
    inner: Arc<Inner<R>>,
    task: Mutex<Option<Box<dyn ScheduledTask>>>,
    scheduler: Arc<dyn Scheduler>,
    period: Duration,
    notifier: Arc<dyn Notifier>,
}

impl LogStreamSimulator<StdRng> {
    /// Builds a simulator from configuration.
    ///
    /// Uses a seeded generator when `config.seed` is set and preloads the
    /// sample entries when `config.preload_samples` is on. Does not start
    /// generation; hosts honour `config.autostart` themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample entries cannot be inserted.
    pub fn from_config(
        config: &SimulatorConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, LogStoreError> {
        let generator = match config.seed {
            Some(seed) => LogGenerator::seeded(seed),
            None => LogGenerator::from_entropy(),
        }
        .with_services(config.services.iter().cloned());

        let simulator = Self::new(
            Arc::new(BoundedLogStore::new(config.capacity)),
            generator,
            scheduler,
            config.tick_interval(),
        );

        if config.preload_samples {
            simulator.preload_samples()?;
        }

        tracing::info!(
            capacity = config.capacity,
            tick_interval_ms = config.tick_interval_ms,
            services = ?config.services,
            seeded = config.seed.is_some(),
            "Log stream simulator ready"
        );
        Ok(simulator)
    }
}

impl<R> LogStreamSimulator<R>
where
    R: Rng + Send + 'static,
{
    /// Creates a stopped simulator.
    #[must_use]
    pub fn new(
        store: Arc<dyn LogStore>,
        generator: LogGenerator<R>,
        scheduler: Arc<dyn Scheduler>,
        period: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                generator: Mutex::new(generator),
                gate: Mutex::new(Gate::default()),
                events: broadcast::channel(SUBSCRIBER_BUFFER).0,
            }),
            task: Mutex::new(None),
            scheduler,
            period,
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Routes start/stop/clear/export notifications to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Begins periodic generation.
    ///
    /// Returns `false` (and does nothing) if already running.
    pub fn start(&self) -> bool {
        let mut task = self.lock_task();
        if task.is_some() {
            return false;
        }

        let generation = {
            let mut gate = self.lock_gate();
            gate.last += 1;
            gate.active = Some(gate.last);
            gate.last
        };

        let inner = Arc::clone(&self.inner);
        *task = Some(self.scheduler.schedule_periodic(
            self.period,
            Box::new(move || inner.scheduled_tick(generation)),
        ));
        drop(task);

        tracing::info!(
            generation,
            period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
            "Log streaming started"
        );
        self.notify(NotificationKind::Info, "Log streaming started");
        true
    }

    /// Halts periodic generation, keeping the buffer.
    ///
    /// Returns `false` if already stopped. Once this returns, no scheduled
    /// tick mutates the buffer.
    pub fn stop(&self) -> bool {
        let mut task = self.lock_task();
        self.lock_gate().active = None;

        let Some(handle) = task.take() else {
            return false;
        };
        handle.cancel();
        drop(task);

        tracing::info!("Log streaming stopped");
        self.notify(NotificationKind::Info, "Log streaming paused");
        true
    }

    /// Returns true while periodic generation is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_task().is_some()
    }

    /// Generates one entry and pushes it onto the buffer, regardless of run
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer rejects the entry.
    pub fn tick(&self) -> Result<LogEntry, LogStoreError> {
        self.inner.tick()
    }

    /// Subscribes to entries as they are generated.
    ///
    /// Entries pushed by `preload_samples` are not broadcast.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.inner.events.subscribe()
    }

    /// Pushes the fixed sample entries, skipping any already buffered.
    ///
    /// Returns how many were inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be written.
    pub fn preload_samples(&self) -> Result<usize, LogStoreError> {
        let now = self
            .inner
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .now();

        let mut inserted = 0;
        for entry in sample_entries(now) {
            match self.inner.store.insert(entry) {
                Ok(_) => inserted += 1,
                Err(LogStoreError::DuplicateId(id)) => {
                    tracing::debug!(%id, "Sample entry already buffered");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(inserted)
    }

    /// Empties the buffer without touching the run state.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be written.
    pub fn clear(&self) -> Result<(), LogStoreError> {
        self.inner.store.clear()?;
        tracing::info!("Log buffer cleared");
        self.notify(NotificationKind::Info, "Logs cleared");
        Ok(())
    }

    /// Returns the entries passing `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn query(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, LogStoreError> {
        Ok(self.query_page(&LogQuery::from(filter.clone()))?.logs)
    }

    /// Runs a paginated query against the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn query_page(&self, query: &LogQuery) -> Result<LogQueryResult, LogStoreError> {
        self.inner.store.query(query)
    }

    /// Renders the filtered view as newline-delimited text.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn export(&self, filter: &LogFilter) -> Result<String, LogStoreError> {
        let logs = self.query(filter)?;
        let text = export::render(&logs);

        tracing::info!(count = logs.len(), "Exported log view");
        self.notify(
            NotificationKind::Success,
            format!("Exported {} log entries", logs.len()),
        );
        Ok(text)
    }

    /// Returns the number of buffered entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn len(&self) -> Result<usize, LogStoreError> {
        self.inner.store.count()
    }

    /// Returns true if the buffer holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn is_empty(&self) -> Result<bool, LogStoreError> {
        Ok(self.len()? == 0)
    }

    /// Returns the buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.store.capacity()
    }

    /// Returns the tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns a snapshot of run state and buffer statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be read.
    pub fn status(&self) -> Result<SimulatorStatus, LogStoreError> {
        Ok(SimulatorStatus {
            running: self.is_running(),
            len: self.len()?,
            capacity: self.capacity(),
            tick_interval_ms: u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        self.notifier.notify(Notification::new(kind, message));
    }
}

impl<R> LogStreamSimulator<R> {
    fn lock_task(&self) -> MutexGuard<'_, Option<Box<dyn ScheduledTask>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_gate(&self) -> MutexGuard<'_, Gate> {
        self.inner.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Drop for LogStreamSimulator<R> {
    fn drop(&mut self) {
        self.lock_gate().active = None;
        if let Some(handle) = self.lock_task().take() {
            handle.cancel();
        }
    }
}
