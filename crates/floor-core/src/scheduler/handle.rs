use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Global monotonically increasing sequence for timer identifiers.
static TIMER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Returns next timer id.
pub(crate) fn next_timer_id() -> u64 {
    TIMER_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// What a timer does when it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires every `period`.
    Repeating { period: Duration },
    /// Fires once after `delay`.
    OneShot { delay: Duration },
}

/// Handle to one registered timer.
///
/// Cancelling (or dropping) the handle stops future fires; runs already started are left to
/// finish on their own.
pub struct TimerHandle {
    id: u64,
    task: &'static str,
    kind: TimerKind,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TimerHandle {
    pub(crate) fn new(
        id: u64,
        task: &'static str,
        kind: TimerKind,
        token: CancellationToken,
        join: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            task,
            kind,
            token,
            join,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn task(&self) -> &'static str {
        self.task
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Stop future fires.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `true` until the timer is cancelled or has completed.
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.join.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("task", &self.task)
            .field("kind", &self.kind)
            .field("live", &self.is_live())
            .finish()
    }
}
