//! Task abstraction driven by the [`crate::scheduler::Scheduler`].
//!
//! A task is a unit of periodic work with a stable name. The scheduler only decides *when*
//! a task runs; the task itself decides whether there is anything to do, and must absorb
//! its own failures: [`Task::run`] returns a [`RunOutcome`], never an error.
mod assign;
pub use assign::AutoAssignTask;

mod status;
pub use status::StatusSyncTask;

mod board;
pub use board::BoardStatusTask;

mod reset;
pub use reset::DailyResetTask;

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tracing::warn;

use crate::{
    gateway::OperationError,
    metrics::{MetricsHandle, noop_metrics},
    scheduler::Trigger,
};

/// Name of the auto-assignment task.
pub const ASSIGN_TASK: &str = "auto-assign";
/// Name of the remote status recompute task.
pub const STATUS_TASK: &str = "status-sync";
/// Name of the local board status refresh task.
pub const BOARD_TASK: &str = "board-status";
/// Name of the daily reset task.
pub const RESET_TASK: &str = "daily-reset";

/// How a single task invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run did its work.
    Completed,
    /// Nothing to do: no active context, previous run still in flight, boundary not reached.
    Skipped,
    /// A remote operation failed; the next tick retries.
    Failed,
    /// The run panicked and was isolated by the scheduler.
    Panicked,
}

impl RunOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Skipped => "skipped",
            RunOutcome::Failed => "failed",
            RunOutcome::Panicked => "panicked",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Per-run context handed to [`Task::run`] by the scheduler.
#[derive(Clone)]
pub struct RunContext {
    trigger: Trigger,
    metrics: MetricsHandle,
}

impl RunContext {
    pub(crate) fn new(trigger: Trigger, metrics: MetricsHandle) -> Self {
        Self { trigger, metrics }
    }

    /// Context not attached to any scheduler: chained triggers are dropped.
    pub fn detached() -> Self {
        Self {
            trigger: Trigger::detached(),
            metrics: noop_metrics(),
        }
    }

    /// Handle for enqueuing out-of-band runs of other tasks.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Record and log a failed remote operation, turning it into [`RunOutcome::Failed`].
    pub(crate) fn operation_failed(&self, task: &'static str, err: &OperationError) -> RunOutcome {
        self.metrics
            .record_operation_error(err.operation().as_str(), err.kind());
        warn!(
            task,
            operation = %err.operation(),
            kind = err.kind(),
            error = %err,
            "remote operation failed; retrying on next tick"
        );
        RunOutcome::Failed
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("trigger", &self.trigger)
            .field("metrics", &"<handle>")
            .finish()
    }
}

/// Unit of periodic work.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Stable task name, used as the timer key and in logs.
    fn name(&self) -> &'static str;

    /// Execute one invocation.
    async fn run(&self, ctx: &RunContext) -> RunOutcome;
}

/// Short-circuit flag preventing two invocations of the same task from overlapping.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Claim the flag; `None` if a previous invocation still holds it.
    pub fn try_enter(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the [`InFlight`] flag on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_admits_one_holder() {
        let flag = InFlight::new();
        let guard = flag.try_enter().expect("first enter must succeed");
        assert!(flag.is_busy());
        assert!(flag.try_enter().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_enter().is_some());
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(RunOutcome::Completed.as_label(), "completed");
        assert_eq!(RunOutcome::Panicked.to_string(), "panicked");
    }
}
