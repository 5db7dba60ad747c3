use std::{fmt, sync::Weak, time::Duration};

use super::Shared;

/// Handle for scheduling out-of-band runs through the owning scheduler.
///
/// Holds only a weak reference: once the scheduler is gone, enqueues are dropped.
#[derive(Clone)]
pub struct Trigger {
    shared: Weak<Shared>,
}

impl Trigger {
    pub(crate) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    /// Trigger attached to no scheduler.
    pub fn detached() -> Self {
        Self { shared: Weak::new() }
    }

    /// Schedule one run of `task` after `delay`.
    ///
    /// Returns `false` when the run was not scheduled: scheduler stopped or gone, unknown
    /// task, or a run of the same task is already pending.
    pub fn enqueue(&self, task: &str, delay: Duration) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.enqueue(task, delay),
            None => false,
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}
