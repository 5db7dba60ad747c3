use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, trace};

use floor_model::Clock;

use crate::{
    context::ActiveContextProvider,
    gateway::{RemoteGateway, update_status},
    hooks::ViewHooks,
    task::{ASSIGN_TASK, InFlight, RunContext, RunOutcome, STATUS_TASK, Task},
};

/// Asks the backend to recompute duty statuses of the active station.
///
/// The backend is authoritative here. When a transition vacated a room, one auto-assignment
/// run is chained through the scheduler after the settle delay so the room is refilled
/// without waiting for the next assignment tick.
pub struct StatusSyncTask {
    gateway: Arc<dyn RemoteGateway>,
    context: Arc<dyn ActiveContextProvider>,
    clock: Arc<dyn Clock>,
    hooks: Option<Arc<dyn ViewHooks>>,
    settle: Duration,
    in_flight: InFlight,
}

impl StatusSyncTask {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        context: Arc<dyn ActiveContextProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            context,
            clock,
            hooks: None,
            settle: Duration::from_millis(500),
            in_flight: InFlight::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Option<Arc<dyn ViewHooks>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

#[async_trait]
impl Task for StatusSyncTask {
    fn name(&self) -> &'static str {
        STATUS_TASK
    }

    async fn run(&self, ctx: &RunContext) -> RunOutcome {
        let Some(context) = self.context.resolve().active() else {
            trace!(task = STATUS_TASK, "no active station; skipping");
            return RunOutcome::Skipped;
        };
        let Some(_guard) = self.in_flight.try_enter() else {
            debug!(task = STATUS_TASK, %context, "previous run still in flight; skipping");
            return RunOutcome::Skipped;
        };

        let now = self.clock.now();
        let report = match update_status(self.gateway.as_ref(), context, &now, None).await {
            Ok(report) => report,
            Err(e) => return ctx.operation_failed(STATUS_TASK, &e),
        };

        // `updated_count` gates the refresh only
        if report.room_cleared() {
            let queued = ctx.trigger().enqueue(ASSIGN_TASK, self.settle);
            debug!(
                task = STATUS_TASK,
                %context,
                queued,
                rooms_cleared = report.cleared_rooms(),
                "room vacated; chaining auto-assignment"
            );
        }
        if report.updated_count == 0 {
            trace!(task = STATUS_TASK, %context, "no status changes");
            return RunOutcome::Completed;
        }
        info!(task = STATUS_TASK, %context, updated = report.updated_count, "statuses updated");

        if let Some(hooks) = &self.hooks {
            tokio::time::sleep(self.settle).await;
            hooks.refresh(context).await;
        }
        RunOutcome::Completed
    }
}
