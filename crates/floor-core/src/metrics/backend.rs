use std::sync::Arc;

use crate::task::RunOutcome;

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a timer (or chained trigger) fired a task run.
    ///
    /// # Arguments
    /// - `task`: task name
    fn record_run_started(&self, task: &str);
    /// Record run completion with outcome and duration.
    ///
    /// # Arguments
    /// - `task`: task name
    /// - `outcome`: how the run ended
    /// - `duration_ms`: wall time of the run in milliseconds
    fn record_run_completed(&self, task: &str, outcome: RunOutcome, duration_ms: u64);
    /// Record a failed remote operation.
    ///
    /// # Arguments
    /// - `operation`: remote operation name (`assign`, `update-status`, `reset`)
    /// - `error_kind`: one of `timeout`, `http`, `parse`, `application`
    fn record_operation_error(&self, operation: &str, error_kind: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
