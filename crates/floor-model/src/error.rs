use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid time of day: '{0}' (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),

    #[error("interval '{name}' must be greater than zero")]
    ZeroInterval { name: &'static str },

    #[error("interval '{name}' is {value_ms}ms, must not exceed {max_ms}ms")]
    IntervalTooLong {
        name: &'static str,
        value_ms: u64,
        max_ms: u64,
    },

    #[error("reset boundary '{0}' must fall on a whole minute")]
    UnalignedBoundary(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
