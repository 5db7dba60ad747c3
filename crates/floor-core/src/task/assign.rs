use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, trace};

use floor_model::Clock;

use crate::{
    context::ActiveContextProvider,
    gateway::{RemoteGateway, assign_doctors},
    hooks::ViewHooks,
    task::{ASSIGN_TASK, InFlight, RunContext, RunOutcome, Task},
};

/// Periodically places idle doctors into empty rooms of the active station.
///
/// Per run:
/// 1. resolve the active context, no-op on the sentinel (no network traffic);
/// 2. call the remote `assign` operation with the current date and time;
/// 3. if anything was assigned, wait the settle delay and refresh the station view.
pub struct AutoAssignTask {
    gateway: Arc<dyn RemoteGateway>,
    context: Arc<dyn ActiveContextProvider>,
    clock: Arc<dyn Clock>,
    hooks: Option<Arc<dyn ViewHooks>>,
    settle: Duration,
    in_flight: InFlight,
}

impl AutoAssignTask {
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
impl Task for AutoAssignTask {
    fn name(&self) -> &'static str {
        ASSIGN_TASK
    }

    async fn run(&self, ctx: &RunContext) -> RunOutcome {
        let Some(context) = self.context.resolve().active() else {
            trace!(task = ASSIGN_TASK, "no active station; skipping");
            return RunOutcome::Skipped;
        };
        let Some(_guard) = self.in_flight.try_enter() else {
            debug!(task = ASSIGN_TASK, %context, "previous run still in flight; skipping");
            return RunOutcome::Skipped;
        };

        let now = self.clock.now();
        let result = match assign_doctors(self.gateway.as_ref(), context, &now, None).await {
            Ok(result) => result,
            Err(e) => return ctx.operation_failed(ASSIGN_TASK, &e),
        };

        if result.is_empty() {
            debug!(task = ASSIGN_TASK, %context, "no doctors to assign");
            return RunOutcome::Completed;
        }
        info!(task = ASSIGN_TASK, %context, count = result.count(), "doctors assigned");
        for a in result.assignments() {
            debug!(task = ASSIGN_TASK, doctor = %a.doctor, room = %a.room, "assignment");
        }

        if let Some(hooks) = &self.hooks {
            tokio::time::sleep(self.settle).await;
            hooks.refresh(context).await;
        }
        RunOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::FixedContext,
        gateway::{Operation, OperationError},
        testing::{RecordingHooks, ScriptedGateway, manual_clock},
    };
    use floor_model::ContextId;
    use serde_json::json;
    use tokio::time::Instant;

    fn task(gw: &Arc<ScriptedGateway>, ctx: u64, hooks: &Arc<RecordingHooks>) -> AutoAssignTask {
        AutoAssignTask::new(
            gw.clone(),
            Arc::new(FixedContext(ContextId::new(ctx))),
            Arc::new(manual_clock("2024-05-01", "10:00:00")),
        )
        .with_hooks(Some(hooks.clone()))
    }

    #[tokio::test]
    async fn sentinel_context_makes_no_remote_call() {
        let gw = Arc::new(ScriptedGateway::new());
        let hooks = Arc::new(RecordingHooks::default());

        let outcome = task(&gw, 0, &hooks).run(&RunContext::detached()).await;

        assert_eq!(outcome, RunOutcome::Skipped);
        assert_eq!(gw.call_count(), 0);
        assert!(hooks.refreshed().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn assignments_refresh_view_after_settle_delay() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(json!({"assignments": [{"doctor": "Dr. Lee", "room": "R1"}]}));
        let hooks = Arc::new(RecordingHooks::default());

        let started = Instant::now();
        let outcome = task(&gw, 5, &hooks).run(&RunContext::detached()).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(hooks.refreshed(), vec![ContextId::new(5)]);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_assignment_does_not_refresh() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(json!({"assignments": []}));
        let hooks = Arc::new(RecordingHooks::default());

        let outcome = task(&gw, 5, &hooks).run(&RunContext::detached()).await;

        assert_eq!(outcome, RunOutcome::Completed);
        assert!(hooks.refreshed().is_empty());
    }

    #[tokio::test]
    async fn failures_are_absorbed() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_err(OperationError::Http {
            operation: Operation::Assign,
            status: Some(502),
            detail: None,
        });
        gw.push_err(OperationError::Application {
            operation: Operation::Assign,
            message: "no rooms".into(),
            code: None,
        });
        let hooks = Arc::new(RecordingHooks::default());
        let t = task(&gw, 5, &hooks);

        assert_eq!(t.run(&RunContext::detached()).await, RunOutcome::Failed);
        assert_eq!(t.run(&RunContext::detached()).await, RunOutcome::Failed);
        assert_eq!(gw.call_count(), 2);
        assert!(hooks.refreshed().is_empty());
    }

    #[tokio::test]
    async fn overlapping_run_short_circuits() {
        let gw = Arc::new(ScriptedGateway::new());
        let hooks = Arc::new(RecordingHooks::default());
        let t = task(&gw, 5, &hooks);

        let _held = t.in_flight.try_enter().unwrap();
        assert_eq!(t.run(&RunContext::detached()).await, RunOutcome::Skipped);
        assert_eq!(gw.call_count(), 0);
    }
}
