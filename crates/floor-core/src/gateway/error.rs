use thiserror::Error;

use super::Operation;

/// Normalized failure of a remote operation.
///
/// Every failure path of a [`super::RemoteGateway`] ends up in exactly one of these kinds,
/// so callers can either handle them uniformly or match on the kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{operation}: deadline of {timeout_ms}ms exceeded")]
    Timeout { operation: Operation, timeout_ms: u64 },

    #[error("{operation}: http failure (status: {}){}", fmt_status(.status), fmt_detail(.detail))]
    Http {
        operation: Operation,
        /// `None` when the request never produced a response (connect/transport failure).
        status: Option<u16>,
        detail: Option<String>,
    },

    #[error("{operation}: malformed response: {reason}")]
    Parse { operation: Operation, reason: String },

    #[error("{operation}: rejected by server: {message}")]
    Application {
        operation: Operation,
        message: String,
        code: Option<String>,
    },
}

impl OperationError {
    /// Metrics / log label of the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            OperationError::Timeout { .. } => "timeout",
            OperationError::Http { .. } => "http",
            OperationError::Parse { .. } => "parse",
            OperationError::Application { .. } => "application",
        }
    }

    pub const fn operation(&self) -> Operation {
        match self {
            OperationError::Timeout { operation, .. }
            | OperationError::Http { operation, .. }
            | OperationError::Parse { operation, .. }
            | OperationError::Application { operation, .. } => *operation,
        }
    }

    /// HTTP status code as a string, for [`OperationError::Http`] with a response.
    pub fn status_code(&self) -> Option<String> {
        match self {
            OperationError::Http {
                status: Some(code), ..
            } => Some(code.to_string()),
            _ => None,
        }
    }

    pub fn parse(operation: Operation, reason: impl Into<String>) -> Self {
        OperationError::Parse {
            operation,
            reason: reason.into(),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

fn fmt_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}
