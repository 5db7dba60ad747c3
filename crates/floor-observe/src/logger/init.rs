use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::{LoggerConfig, LoggerError, LoggerResult, LoggerRfc3339};

pub(super) fn logger_text(cfg: &LoggerConfig) -> LoggerResult<()> {
    let fmt_layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(fmt_layer);
    init_subscriber(subscriber)
}

pub(super) fn logger_json(cfg: &LoggerConfig) -> LoggerResult<()> {
    let fmt_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(fmt_layer);
    init_subscriber(subscriber)
}

#[cfg(target_os = "linux")]
pub(super) fn logger_journald(cfg: &LoggerConfig) -> LoggerResult<()> {
    let journald =
        tracing_journald::layer().map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?;

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(journald);
    init_subscriber(subscriber)
}

#[cfg(not(target_os = "linux"))]
pub(super) fn logger_journald(_cfg: &LoggerConfig) -> LoggerResult<()> {
    Err(LoggerError::JournaldNotSupported)
}

fn init_subscriber<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoggerFormat;

    #[test]
    fn second_init_is_rejected() {
        let config = LoggerConfig {
            format: LoggerFormat::Json,
            use_color: false,
            ..Default::default()
        };

        let first = crate::init_logger(&config);
        let second = crate::init_logger(&config);

        // Another test in this binary may have won the race for the global default.
        assert!(first.is_ok() || matches!(first, Err(LoggerError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));
    }
}
