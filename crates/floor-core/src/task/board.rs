use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use floor_model::Clock;

use crate::{
    hooks::StaffBoard,
    task::{BOARD_TASK, RunContext, RunOutcome, Task},
};

/// Recomputes the duty status badge of every visible staff member from the local clock.
///
/// Pure and network-free; the scheduler pauses it while the view is hidden.
pub struct BoardStatusTask {
    board: Arc<dyn StaffBoard>,
    clock: Arc<dyn Clock>,
}

impl BoardStatusTask {
    pub fn new(board: Arc<dyn StaffBoard>, clock: Arc<dyn Clock>) -> Self {
        Self { board, clock }
    }
}

#[async_trait]
impl Task for BoardStatusTask {
    fn name(&self) -> &'static str {
        BOARD_TASK
    }

    async fn run(&self, _ctx: &RunContext) -> RunOutcome {
        let now = self.clock.now().time;
        let staff = self.board.visible_staff();
        if staff.is_empty() {
            return RunOutcome::Skipped;
        }

        for entry in &staff {
            self.board.apply_status(&entry.id, entry.status_at(now));
        }
        trace!(task = BOARD_TASK, %now, staff = staff.len(), "board statuses refreshed");
        RunOutcome::Completed
    }
}
