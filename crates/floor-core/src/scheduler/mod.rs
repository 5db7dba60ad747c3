//! Timer ownership for the floor tasks.
//! - Owns at most one repeating timer per task name.
//! - Runs one-shot (chained) fires requested through [`Trigger`].
//! - Pauses view-bound timers while the view is hidden.
//!
//! Every fire spawns the run and returns immediately: a slow run never delays the next
//! tick, and a panicking run only loses its own tick.
mod handle;
pub use handle::{TimerHandle, TimerKind};

mod trigger;
pub use trigger::Trigger;

use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::CoreError,
    metrics::{MetricsHandle, noop_metrics},
    task::{RunContext, RunOutcome, Task},
};
use handle::next_timer_id;

/// A task together with its cadence.
pub struct TaskEntry {
    task: Arc<dyn Task>,
    period: Duration,
    pause_when_hidden: bool,
}

impl TaskEntry {
    pub fn new(task: Arc<dyn Task>, period: Duration) -> Self {
        Self {
            task,
            period,
            pause_when_hidden: false,
        }
    }

    /// Cancel this timer while the view is hidden; run immediately when it is shown again.
    pub fn pause_when_hidden(mut self) -> Self {
        self.pause_when_hidden = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.task.name()
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Builder collecting the tasks a [`Scheduler`] will own.
pub struct SchedulerBuilder {
    entries: HashMap<&'static str, TaskEntry>,
    metrics: MetricsHandle,
}

impl SchedulerBuilder {
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Register a task. Names must be unique and periods non-zero.
    pub fn register(&mut self, entry: TaskEntry) -> Result<(), CoreError> {
        let name = entry.name();
        if entry.period.is_zero() {
            return Err(CoreError::ZeroPeriod(name.to_string()));
        }
        if self.entries.contains_key(name) {
            return Err(CoreError::DuplicateTask(name.to_string()));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn build(self) -> Scheduler {
        Scheduler {
            shared: Arc::new(Shared {
                entries: self.entries,
                timers: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashMap::new()),
                running: AtomicBool::new(false),
                visible: AtomicBool::new(true),
                metrics: self.metrics,
            }),
        }
    }
}

/// Owner of all floor timers.
///
/// `start`, `stop` and `set_visible` are the only mutators of the timer map. Must be used
/// from within a tokio runtime. Clones share the same timers; dropping the last clone
/// cancels everything.
#[derive(Clone)]
pub struct Scheduler {
    shared: Arc<Shared>,
}

impl Scheduler {
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder {
            entries: HashMap::new(),
            metrics: noop_metrics(),
        }
    }

    /// (Re)register every repeating timer, cancelling live handles first.
    ///
    /// Calling it twice in a row leaves exactly one timer per task.
    #[instrument(level = "debug", skip(self))]
    pub fn start(&self) {
        let shared = &self.shared;
        shared.running.store(true, Ordering::SeqCst);
        let visible = shared.visible.load(Ordering::SeqCst);

        let mut timers = lock(&shared.timers);
        for (&name, entry) in &shared.entries {
            if let Some(old) = timers.remove(name) {
                debug!(task = name, timer = old.id(), "replacing live timer");
                old.cancel();
            }
            if entry.pause_when_hidden && !visible {
                debug!(task = name, "view hidden; timer stays paused");
                continue;
            }
            timers.insert(name, shared.spawn_repeating(entry));
        }
        info!(timers = timers.len(), "scheduler started");
    }

    /// Cancel every repeating and pending one-shot timer. No-op when nothing is registered.
    #[instrument(level = "debug", skip(self))]
    pub fn stop(&self) {
        let shared = &self.shared;
        shared.running.store(false, Ordering::SeqCst);

        let timers: Vec<TimerHandle> = lock(&shared.timers).drain().map(|(_, h)| h).collect();
        let pending: Vec<TimerHandle> = lock(&shared.pending).drain().map(|(_, h)| h).collect();
        let cancelled = timers.len() + pending.len();
        for handle in timers.iter().chain(pending.iter()) {
            handle.cancel();
        }

        if cancelled > 0 {
            info!(cancelled, "scheduler stopped");
        } else {
            debug!("stop requested with no timers registered");
        }
    }

    /// Schedule one out-of-band run of `task` after `delay`. See [`Trigger::enqueue`].
    pub fn enqueue(&self, task: &str, delay: Duration) -> bool {
        self.shared.enqueue(task, delay)
    }

    /// Handle for chaining runs from outside a task.
    pub fn trigger(&self) -> Trigger {
        Trigger::new(Arc::downgrade(&self.shared))
    }

    /// Pause or resume timers registered with [`TaskEntry::pause_when_hidden`].
    ///
    /// On becoming visible, paused tasks run immediately and then return to their cadence.
    pub fn set_visible(&self, visible: bool) {
        let shared = &self.shared;
        if shared.visible.swap(visible, Ordering::SeqCst) == visible {
            return;
        }
        if !shared.running.load(Ordering::SeqCst) {
            debug!(visible, "visibility changed while stopped");
            return;
        }

        let mut timers = lock(&shared.timers);
        for (&name, entry) in shared.entries.iter().filter(|(_, e)| e.pause_when_hidden) {
            if let Some(old) = timers.remove(name) {
                old.cancel();
            }
            if visible {
                fire(Arc::clone(&entry.task), shared.run_context());
                timers.insert(name, shared.spawn_repeating(entry));
            }
        }
        info!(visible, "view visibility changed");
    }

    pub fn is_visible(&self) -> bool {
        self.shared.visible.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Number of live repeating timers.
    pub fn live_timers(&self) -> usize {
        lock(&self.shared.timers)
            .values()
            .filter(|h| h.is_live())
            .count()
    }

    /// Number of one-shot runs waiting for their delay.
    pub fn pending_runs(&self) -> usize {
        lock(&self.shared.pending)
            .values()
            .filter(|h| h.is_live())
            .count()
    }

    /// `true` if `task` has a live repeating timer.
    pub fn is_scheduled(&self, task: &str) -> bool {
        lock(&self.shared.timers)
            .get(task)
            .is_some_and(TimerHandle::is_live)
    }

    /// Names of all registered tasks.
    pub fn tasks(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.shared.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

pub(crate) struct Shared {
    entries: HashMap<&'static str, TaskEntry>,
    timers: Mutex<HashMap<&'static str, TimerHandle>>,
    pending: Mutex<HashMap<&'static str, TimerHandle>>,
    running: AtomicBool,
    visible: AtomicBool,
    metrics: MetricsHandle,
}

impl Shared {
    fn run_context(self: &Arc<Self>) -> RunContext {
        RunContext::new(Trigger::new(Arc::downgrade(self)), self.metrics.clone())
    }

    fn spawn_repeating(self: &Arc<Self>, entry: &TaskEntry) -> TimerHandle {
        let id = next_timer_id();
        let name = entry.name();
        let period = entry.period;
        let task = Arc::clone(&entry.task);
        let trigger = Trigger::new(Arc::downgrade(self));
        let metrics = self.metrics.clone();

        let token = CancellationToken::new();
        let cancel = token.clone();
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        fire(Arc::clone(&task), RunContext::new(trigger.clone(), metrics.clone()));
                    }
                }
            }
            debug!(task = name, timer = id, "timer cancelled");
        });
        debug!(task = name, timer = id, period_ms = period.as_millis() as u64, "timer registered");
        TimerHandle::new(id, name, TimerKind::Repeating { period }, token, join)
    }

    fn spawn_one_shot(self: &Arc<Self>, entry: &TaskEntry, delay: Duration) -> TimerHandle {
        let id = next_timer_id();
        let name = entry.name();
        let task = Arc::clone(&entry.task);
        let weak = Arc::downgrade(self);
        let metrics = self.metrics.clone();

        let token = CancellationToken::new();
        let cancel = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            fire(task, RunContext::new(Trigger::new(weak.clone()), metrics));
            if let Some(shared) = weak.upgrade() {
                shared.release_pending(name, id);
            }
        });
        TimerHandle::new(id, name, TimerKind::OneShot { delay }, token, join)
    }

    fn enqueue(self: &Arc<Self>, task: &str, delay: Duration) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            debug!(task, "scheduler stopped; chained run dropped");
            return false;
        }
        let Some(entry) = self.entries.get(task) else {
            warn!(task, "chained run requested for unknown task");
            return false;
        };

        let mut pending = lock(&self.pending);
        if pending.get(task).is_some_and(TimerHandle::is_live) {
            debug!(task, "chained run already pending; coalesced");
            return false;
        }
        let handle = self.spawn_one_shot(entry, delay);
        debug!(task, timer = handle.id(), delay_ms = delay.as_millis() as u64, "chained run enqueued");
        pending.insert(entry.name(), handle);
        true
    }

    fn release_pending(&self, task: &'static str, id: u64) {
        let mut pending = lock(&self.pending);
        if pending.get(task).is_some_and(|h| h.id() == id) {
            pending.remove(task);
        }
    }
}

/// Spawn one run of `task` and account for it once it ends.
fn fire(task: Arc<dyn Task>, ctx: RunContext) {
    let name = task.name();
    let metrics = ctx.metrics().clone();
    metrics.record_run_started(name);

    tokio::spawn(async move {
        let started = Instant::now();
        let run = tokio::spawn(async move { task.run(&ctx).await });

        let outcome = match run.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                error!(
                    task = name,
                    panic = %panic_message(e.into_panic()),
                    "task run panicked; skipping this tick"
                );
                RunOutcome::Panicked
            }
            Err(e) => {
                debug!(task = name, error = %e, "task run aborted");
                RunOutcome::Skipped
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        metrics.record_run_completed(name, outcome, elapsed_ms);
        debug!(task = name, %outcome, elapsed_ms, "run finished");
    });
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
