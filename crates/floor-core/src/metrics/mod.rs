//! Metrics collection abstraction for the floor scheduler.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are handed to the
//! scheduler builder; tasks reach them through [`crate::RunContext::metrics`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
