use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use floor_core::{metrics::MetricsBackend, task::RunOutcome};

const NAMESPACE: &str = "floor";

/// Prometheus metrics for task runs and remote operations.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `task`: the four floor task names (plus `tz-sync` when enabled)
/// - `outcome`: `completed`, `skipped`, `failed`, `panicked`
/// - `operation`: `assign`, `update-status`, `reset`
/// - `error_kind`: `timeout`, `http`, `parse`, `application`
#[derive(Clone)]
pub struct PrometheusMetrics {
    runs_started: CounterVec,
    runs_completed: CounterVec,
    run_duration: HistogramVec,
    operation_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let runs_started = CounterVec::new(
            Opts::new("runs_started_total", "Task runs fired by the scheduler").namespace(NAMESPACE),
            &["task"],
        )?;
        registry.register(Box::new(runs_started.clone()))?;

        let runs_completed = CounterVec::new(
            Opts::new("runs_completed_total", "Task runs finished, by outcome").namespace(NAMESPACE),
            &["task", "outcome"],
        )?;
        registry.register(Box::new(runs_completed.clone()))?;

        // Runs include the settle and reload delays, so buckets start at the sub-second range.
        let run_duration = HistogramVec::new(
            HistogramOpts::new("run_duration_seconds", "Task run duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["task"],
        )?;
        registry.register(Box::new(run_duration.clone()))?;

        let operation_errors = CounterVec::new(
            Opts::new("operation_errors_total", "Failed remote operations").namespace(NAMESPACE),
            &["operation", "error_kind"],
        )?;
        registry.register(Box::new(operation_errors.clone()))?;

        Ok(Self {
            runs_started,
            runs_completed,
            run_duration,
            operation_errors,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type matching [`PrometheusMetrics::encode`].
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_run_started(&self, task: &str) {
        self.runs_started.with_label_values(&[task]).inc();
    }

    fn record_run_completed(&self, task: &str, outcome: RunOutcome, duration_ms: u64) {
        self.runs_completed
            .with_label_values(&[task, outcome.as_label()])
            .inc();
        self.run_duration
            .with_label_values(&[task])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_operation_error(&self, operation: &str, error_kind: &str) {
        self.operation_errors
            .with_label_values(&[operation, error_kind])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn run_started_is_labelled_by_task() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_run_started("auto-assign");
        metrics.record_run_started("auto-assign");
        metrics.record_run_started("status-sync");

        let families = metrics.gather();
        assert_eq!(family(&families, "floor_runs_started_total").get_metric().len(), 2);
    }

    #[test]
    fn run_completed_feeds_counter_and_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_run_completed("auto-assign", RunOutcome::Completed, 620);
        metrics.record_run_completed("auto-assign", RunOutcome::Failed, 5_000);

        let families = metrics.gather();
        assert_eq!(family(&families, "floor_runs_completed_total").get_metric().len(), 2);
        assert_eq!(family(&families, "floor_run_duration_seconds").get_metric().len(), 1);
    }

    #[test]
    fn operation_errors_are_counted_by_kind() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_operation_error("assign", "timeout");
        metrics.record_operation_error("assign", "timeout");
        metrics.record_operation_error("reset", "http");

        let families = metrics.gather();
        let errors = family(&families, "floor_operation_errors_total");
        assert_eq!(errors.get_metric().len(), 2);
    }

    #[test]
    fn encode_renders_text_exposition() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_run_started("daily-reset");

        let text = metrics.encode().unwrap();
        assert!(text.contains(r#"floor_runs_started_total{task="daily-reset"} 1"#));
        assert!(metrics.content_type().starts_with("text/plain"));
    }

    #[test]
    fn custom_registry_is_used() {
        let registry = Arc::new(Registry::new());
        let metrics = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();

        metrics.record_run_started("status-sync");
        assert!(!registry.gather().is_empty());
    }
}
