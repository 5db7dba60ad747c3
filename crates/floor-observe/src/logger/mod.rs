mod config;
mod error;
mod format;
mod init;
mod level;
mod timer;
mod timezone;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timer::LoggerRfc3339;
pub use timezone::LoggerTimeZone;

/// Installs the global tracing subscriber described by `cfg`.
///
/// Once installed, every `tracing` macro in the process goes through it. A second call fails
/// with [`LoggerError::AlreadyInitialized`].
///
/// For [`LoggerTimeZone::Local`] call [`floor_model::init_local_offset`] in `main()` before the
/// tokio runtime is built; otherwise timestamps fall back to UTC.
///
/// # Examples
/// ```no_run
/// use floor_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger init");
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => init::logger_text(cfg),
        LoggerFormat::Json => init::logger_json(cfg),
        LoggerFormat::Journald => init::logger_journald(cfg),
    }
}
