use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use super::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logging section of the dashboard configuration (`"logger"` in the JSON file).
///
/// Every field is optional in the file:
///
/// ```
/// use floor_observe::{LoggerConfig, LoggerFormat, LoggerTimeZone};
///
/// let cfg: LoggerConfig = serde_json::from_str(r#"{"format": "json", "tz": "local"}"#).unwrap();
/// assert_eq!(cfg.format, LoggerFormat::Json);
/// assert_eq!(cfg.tz, LoggerTimeZone::Local);
/// assert_eq!(cfg.level.as_str(), "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output sink: text on stdout, JSON lines, or journald.
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"floor_core=debug,info"`.
    pub level: LoggerLevel,
    /// Timezone of log timestamps.
    pub tz: LoggerTimeZone,
    /// Print the emitting module (`floor_core::task::status`, ...) next to each event.
    pub with_targets: bool,
    /// ANSI colours in text output; ignored when stdout is not a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Colour only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
