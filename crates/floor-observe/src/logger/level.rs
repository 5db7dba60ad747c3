use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::LoggerError;

const DEFAULT_LEVEL: &str = "info";

/// Validated `EnvFilter` expression.
///
/// Keeps the raw string for display and serialization and builds the filter on demand.
/// Per-crate directives let the floor tasks be traced without drowning in transport noise:
///
/// ```
/// use floor_observe::LoggerLevel;
///
/// let lvl: LoggerLevel = "floor_core::task=trace,reqwest=warn,info".parse().unwrap();
/// assert_eq!(lvl.as_str(), "floor_core::task=trace,reqwest=warn,info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// Validates `s` as a filter expression.
    ///
    /// ```
    /// use floor_observe::{LoggerError, LoggerLevel};
    ///
    /// assert!(LoggerLevel::new("floor_http=debug").is_ok());
    /// assert!(matches!(LoggerLevel::new("floor_http=chatty"), Err(LoggerError::InvalidLevel(_))));
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    /// The expression exactly as configured.
    ///
    /// ```
    /// use floor_observe::LoggerLevel;
    ///
    /// assert_eq!(LoggerLevel::default().as_str(), "info");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the filter; falls back to `info` if the expression no longer parses.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self(DEFAULT_LEVEL.to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(LoggerLevel(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}
