//! Prometheus backend for the floor scheduler metrics.
//!
//! [`PrometheusMetrics`] implements [`floor_core::metrics::MetricsBackend`]; hand it to
//! [`floor_core::wiring::FloorDeps::with_metrics`] and expose [`PrometheusMetrics::encode`]
//! from whatever HTTP surface the process already has.
//!
//! ## Metrics
//! - `floor_runs_started_total{task}` - Counter
//! - `floor_runs_completed_total{task, outcome}` - Counter
//! - `floor_run_duration_seconds{task}` - Histogram
//! - `floor_operation_errors_total{operation, error_kind}` - Counter
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
