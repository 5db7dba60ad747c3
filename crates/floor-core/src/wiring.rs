//! Assembly of the floor tasks into a [`Scheduler`].
use std::sync::Arc;

use tracing::info;

use floor_model::{Clock, SchedulerConfig};

use crate::{
    context::ActiveContextProvider,
    error::CoreError,
    gateway::RemoteGateway,
    hooks::{StaffBoard, ViewHooks},
    metrics::{MetricsHandle, noop_metrics},
    scheduler::{Scheduler, TaskEntry},
    task::{AutoAssignTask, BoardStatusTask, DailyResetTask, StatusSyncTask},
};

/// Collaborators shared by the floor tasks.
pub struct FloorDeps {
    pub gateway: Arc<dyn RemoteGateway>,
    pub context: Arc<dyn ActiveContextProvider>,
    pub clock: Arc<dyn Clock>,
    pub hooks: Option<Arc<dyn ViewHooks>>,
    pub board: Option<Arc<dyn StaffBoard>>,
    pub metrics: MetricsHandle,
    /// Additional tasks owned by the same scheduler.
    pub extra: Vec<TaskEntry>,
}

impl FloorDeps {
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
            board: None,
            metrics: noop_metrics(),
            extra: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ViewHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_board(mut self, board: Arc<dyn StaffBoard>) -> Self {
        self.board = Some(board);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_task(mut self, entry: TaskEntry) -> Self {
        self.extra.push(entry);
        self
    }
}

/// Validate `config` and register every floor task.
///
/// The board task is registered only when a board is supplied, and pauses while the view is
/// hidden. The returned scheduler is not started.
pub fn build_scheduler(config: &SchedulerConfig, deps: FloorDeps) -> Result<Scheduler, CoreError> {
    config.validate()?;

    let mut builder = Scheduler::builder().with_metrics(deps.metrics.clone());

    let assign = AutoAssignTask::new(deps.gateway.clone(), deps.context.clone(), deps.clock.clone())
        .with_hooks(deps.hooks.clone())
        .with_settle_delay(config.settle_delay());
    builder.register(TaskEntry::new(Arc::new(assign), config.assign_interval()))?;

    let status = StatusSyncTask::new(deps.gateway.clone(), deps.context.clone(), deps.clock.clone())
        .with_hooks(deps.hooks.clone())
        .with_settle_delay(config.settle_delay());
    builder.register(TaskEntry::new(Arc::new(status), config.status_interval()))?;

    if let Some(board) = deps.board {
        let display = BoardStatusTask::new(board, deps.clock.clone());
        builder.register(
            TaskEntry::new(Arc::new(display), config.display_interval()).pause_when_hidden(),
        )?;
    }

    let reset = DailyResetTask::new(deps.gateway, deps.clock, config.reset_at)
        .with_hooks(deps.hooks)
        .with_reload_delay(config.reload_delay());
    builder.register(TaskEntry::new(Arc::new(reset), config.reset_check_interval()))?;

    for entry in deps.extra {
        builder.register(entry)?;
    }

    let scheduler = builder.build();
    info!(tasks = ?scheduler.tasks(), reset_at = %config.reset_at, "floor scheduler assembled");
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::FixedContext,
        gateway::Operation,
        task::{ASSIGN_TASK, BOARD_TASK, RESET_TASK, STATUS_TASK},
        testing::{CountingTask, MemoryBoard, ScriptedGateway, manual_clock},
    };
    use floor_model::{ContextId, ValidationError};
    use std::time::Duration;

    fn deps(gw: &Arc<ScriptedGateway>) -> FloorDeps {
        FloorDeps::new(
            gw.clone(),
            Arc::new(FixedContext(ContextId::new(1))),
            Arc::new(manual_clock("2024-05-01", "12:00:00")),
        )
    }

    #[test]
    fn registers_board_only_when_present() {
        let gw = Arc::new(ScriptedGateway::new());
        let config = SchedulerConfig::default();

        let without = build_scheduler(&config, deps(&gw)).unwrap();
        assert_eq!(without.tasks(), vec![ASSIGN_TASK, RESET_TASK, STATUS_TASK]);

        let with = build_scheduler(
            &config,
            deps(&gw).with_board(Arc::new(MemoryBoard::new(Vec::new()))),
        )
        .unwrap();
        assert_eq!(with.tasks(), vec![ASSIGN_TASK, BOARD_TASK, RESET_TASK, STATUS_TASK]);
    }

    #[test]
    fn extra_tasks_share_the_scheduler() {
        let gw = Arc::new(ScriptedGateway::new());
        let config = SchedulerConfig::default();

        let scheduler = build_scheduler(
            &config,
            deps(&gw).with_task(TaskEntry::new(CountingTask::new("tz"), Duration::from_secs(60))),
        )
        .unwrap();
        assert!(scheduler.tasks().contains(&"tz"));

        let clash = build_scheduler(
            &config,
            deps(&gw).with_task(TaskEntry::new(CountingTask::new(ASSIGN_TASK), Duration::from_secs(1))),
        );
        assert!(matches!(clash, Err(CoreError::DuplicateTask(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let gw = Arc::new(ScriptedGateway::new());
        let config = SchedulerConfig {
            status_poll_ms: 0,
            ..SchedulerConfig::default()
        };

        let err = build_scheduler(&config, deps(&gw)).err().unwrap();
        assert!(matches!(err, CoreError::Config(ValidationError::ZeroInterval { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn default_cadence_polls_status_before_assignment() {
        let gw = Arc::new(ScriptedGateway::new());
        let scheduler = build_scheduler(&SchedulerConfig::default(), deps(&gw)).unwrap();
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10_100)).await;
        let ops: Vec<_> = gw.calls().into_iter().map(|(op, _)| op).collect();
        assert_eq!(ops, vec![Operation::UpdateStatus]);

        tokio::time::sleep(Duration::from_secs(20)).await;
        let assigns = gw
            .calls()
            .iter()
            .filter(|(op, _)| *op == Operation::Assign)
            .count();
        assert_eq!(assigns, 1);
        scheduler.stop();
    }
}
