//! Periodic refresh of the cached local offset, so DST transitions reach the day-local
//! clock and log timestamps without a restart.
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use floor_core::task::{RunContext, RunOutcome, Task};
use floor_model::{clock::sync_local_offset, local_offset};

/// Name of the offset refresh task.
pub const TZ_SYNC_TASK: &str = "tz-sync";

/// Cadence of the offset refresh.
pub const TZ_SYNC_INTERVAL: Duration = Duration::from_secs(3_600);

#[derive(Debug, Default)]
pub struct TimezoneSyncTask;

#[async_trait]
impl Task for TimezoneSyncTask {
    fn name(&self) -> &'static str {
        TZ_SYNC_TASK
    }

    async fn run(&self, _ctx: &RunContext) -> RunOutcome {
        if sync_local_offset() {
            info!(offset = %local_offset(), "local offset changed");
        } else {
            debug!("local offset unchanged or undetectable");
        }
        RunOutcome::Completed
    }
}
