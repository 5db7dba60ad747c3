use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use time::Date;
use tracing::{debug, info, trace};

use floor_model::{Clock, TimeOfDay};

use crate::{
    gateway::{RemoteGateway, reset_daily},
    hooks::ViewHooks,
    task::{RESET_TASK, RunContext, RunOutcome, Task},
};

/// Clears transient daily state once the local clock reaches the reset boundary.
///
/// The boundary is matched at minute granularity, never before the boundary itself, and the
/// task is expected to be checked at least once per minute. A monotonic "last fired" date is armed *before* the remote call,
/// so the reset runs at most once per calendar date even if the check fires several times
/// inside the boundary minute or the clock jumps backwards across it. A failed reset is not
/// retried for that date.
pub struct DailyResetTask {
    gateway: Arc<dyn RemoteGateway>,
    clock: Arc<dyn Clock>,
    boundary: TimeOfDay,
    hooks: Option<Arc<dyn ViewHooks>>,
    reload_delay: Duration,
    last_fired: Mutex<Option<Date>>,
}

impl DailyResetTask {
    pub fn new(gateway: Arc<dyn RemoteGateway>, clock: Arc<dyn Clock>, boundary: TimeOfDay) -> Self {
        Self {
            gateway,
            clock,
            boundary,
            hooks: None,
            reload_delay: Duration::from_millis(1_000),
            last_fired: Mutex::new(None),
        }
    }

    pub fn with_hooks(mut self, hooks: Option<Arc<dyn ViewHooks>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    /// Date of the last armed reset, if any.
    pub fn last_fired(&self) -> Option<Date> {
        *self.last_fired.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm the guard for `today`; `false` if today (or a later date) already fired.
    fn arm(&self, today: Date) -> bool {
        let mut last = self.last_fired.lock().unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(fired) if today <= fired => false,
            _ => {
                *last = Some(today);
                true
            }
        }
    }
}

#[async_trait]
impl Task for DailyResetTask {
    fn name(&self) -> &'static str {
        RESET_TASK
    }

    async fn run(&self, ctx: &RunContext) -> RunOutcome {
        let now = self.clock.now();
        if !now.time.same_minute(&self.boundary) || now.time < self.boundary {
            trace!(task = RESET_TASK, now = %now.time, boundary = %self.boundary, "boundary not reached");
            return RunOutcome::Skipped;
        }
        if !self.arm(now.date) {
            debug!(task = RESET_TASK, date = %now.date_string(), "daily reset already done");
            return RunOutcome::Skipped;
        }

        if let Err(e) = reset_daily(self.gateway.as_ref(), &now, None).await {
            return ctx.operation_failed(RESET_TASK, &e);
        }
        info!(task = RESET_TASK, date = %now.date_string(), "daily data reset");

        if let Some(hooks) = &self.hooks {
            tokio::time::sleep(self.reload_delay).await;
            hooks.reload().await;
        }
        RunOutcome::Completed
    }
}
