//! Periodic callback scheduling.
//!
//! The simulator never owns a timer directly. It registers its tick with a
//! `Scheduler` and keeps the returned `ScheduledTask` to cancel it later.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shortest period a scheduler honours; shorter requests are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Callback invoked on every period.
pub type PeriodicTask = Box<dyn FnMut() + Send + 'static>;

/// Handle to a registered periodic callback.
pub trait ScheduledTask: Send {
    /// Stops the callback from firing again.
    fn cancel(self: Box<Self>);
}

/// Registers periodic callbacks.
pub trait Scheduler: Send + Sync {
    /// Calls `task` once per `period`, starting one period from now, until
    /// the returned handle is cancelled.
    fn schedule_periodic(&self, period: Duration, task: PeriodicTask) -> Box<dyn ScheduledTask>;
}

/// Scheduler that drives callbacks from a Tokio timer task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler that spawns onto `handle`.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler on the runtime the caller is running in.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_periodic(&self, period: Duration, mut task: PeriodicTask) -> Box<dyn ScheduledTask> {
        // `interval_at` panics on a zero period.
        let period = period.max(MIN_PERIOD);
        let join = self.handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task();
            }
        });
        Box::new(TokioTask(join))
    }
}

struct TokioTask(JoinHandle<()>);

impl ScheduledTask for TokioTask {
    fn cancel(self: Box<Self>) {
        self.0.abort();
    }
}

type ManualSlots = Arc<Mutex<BTreeMap<u64, Arc<Mutex<ManualSlot>>>>>;

struct ManualSlot {
    period: Duration,
    elapsed: Duration,
    task: PeriodicTask,
}

/// Scheduler whose callbacks fire only when the owner says so.
///
/// Used by hosts that drive ticks themselves (the CLI `export` command) and
/// by tests.
///
/// # Example
///
/// ```
/// use shared::simulator::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let count = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&count);
/// let task = scheduler.schedule_periodic(
///     Duration::from_secs(3),
///     Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// scheduler.advance(Duration::from_secs(7));
/// assert_eq!(count.load(Ordering::SeqCst), 2);
///
/// task.cancel();
/// scheduler.advance(Duration::from_secs(30));
/// assert_eq!(count.load(Ordering::SeqCst), 2);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    slots: ManualSlots,
    next_id: Arc<Mutex<u64>>,
}

impl ManualScheduler {
    /// Creates a scheduler with no registered callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of callbacks still registered.
    #[must_use]
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fires every registered callback once, regardless of its period.
    ///
    /// Callbacks run without the registry lock held, so they may cancel
    /// tasks or schedule new ones. Tasks scheduled during the call first
    /// fire on the next one.
    pub fn fire(&self) {
        for (id, slot) in self.snapshot() {
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if self.is_registered(id) {
                (slot.task)();
            }
        }
    }

    /// Lets `elapsed` pass, firing each callback once per full period.
    pub fn advance(&self, elapsed: Duration) {
        for (id, slot) in self.snapshot() {
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.elapsed += elapsed;
            while slot.elapsed >= slot.period {
                let period = slot.period;
                slot.elapsed -= period;
                if !self.is_registered(id) {
                    break;
                }
                (slot.task)();
            }
        }
    }

    fn snapshot(&self) -> Vec<(u64, Arc<Mutex<ManualSlot>>)> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, slot)| (*id, Arc::clone(slot)))
            .collect()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&self, period: Duration, task: PeriodicTask) -> Box<dyn ScheduledTask> {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
            *next += 1;
            *next
        };
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Arc::new(Mutex::new(ManualSlot {
                    period: period.max(MIN_PERIOD),
                    elapsed: Duration::ZERO,
                    task,
                })),
            );
        Box::new(ManualTask {
            id,
            slots: Arc::clone(&self.slots),
        })
    }
}

struct ManualTask {
    id: u64,
    slots: ManualSlots,
}

impl ScheduledTask for ManualTask {
    fn cancel(self: Box<Self>) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
