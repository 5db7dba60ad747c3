use crate::{metrics::backend::MetricsBackend, task::RunOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_run_started(&self, _: &str) {}

    #[inline(always)]
    fn record_run_completed(&self, _: &str, _: RunOutcome, _: u64) {}

    #[inline(always)]
    fn record_operation_error(&self, _: &str, _: &str) {}
}
