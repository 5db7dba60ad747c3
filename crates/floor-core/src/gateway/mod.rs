//! Remote operation contract used by the scheduler tasks.
//!
//! The transport lives behind [`RemoteGateway`]; concrete gateways (HTTP, test doubles) are
//! plugged in at wiring time. Typed helpers in [`ops`] build request bodies and decode the
//! `data` section of successful responses.
mod error;
pub use error::OperationError;

mod envelope;
pub use envelope::Envelope;

pub mod ops;
pub use ops::{assign_doctors, reset_daily, update_status};

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

/// Logical remote operations known to the floor backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Match idle doctors to empty rooms.
    Assign,
    /// Recompute duty statuses from the current time.
    UpdateStatus,
    /// Clear transient per-day state.
    ResetDaily,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Assign => "assign",
            Operation::UpdateStatus => "update-status",
            Operation::ResetDaily => "reset",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performs one logical remote operation.
///
/// Implementations must:
/// - enforce `timeout` (or their own default when `None`) as a hard deadline;
/// - verify the response envelope's `success` flag;
/// - normalize every failure into an [`OperationError`].
///
/// On success the `data` section of the envelope is returned (`Value::Null` if absent).
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Gateway name used in logs.
    fn name(&self) -> &'static str;

    async fn call(
        &self,
        operation: Operation,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, OperationError>;
}
