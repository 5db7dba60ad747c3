//! Dashboard lifecycle glue.
//!
//! The view drives the scheduler through three events: load, unload and visibility change.
use std::time::Duration;

use tracing::{debug, info};

use crate::scheduler::Scheduler;

/// Binds page lifecycle events to a [`Scheduler`].
#[derive(Clone)]
pub struct Lifecycle {
    scheduler: Scheduler,
    warm_up: Duration,
}

impl Lifecycle {
    pub fn new(scheduler: Scheduler, warm_up: Duration) -> Self {
        Self { scheduler, warm_up }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Start all timers once the warm-up delay has elapsed.
    pub async fn on_load(&self) {
        if !self.warm_up.is_zero() {
            debug!(warm_up_ms = self.warm_up.as_millis() as u64, "waiting before first schedule");
            tokio::time::sleep(self.warm_up).await;
        }
        self.scheduler.start();
    }

    /// Cancel every timer. Safe to call repeatedly.
    pub fn on_unload(&self) {
        info!("view unloading; stopping scheduler");
        self.scheduler.stop();
    }

    pub fn on_visibility_change(&self, visible: bool) {
        self.scheduler.set_visible(visible);
    }
}
