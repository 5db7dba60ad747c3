//! Typed wrappers over [`RemoteGateway::call`].
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::trace;

use floor_model::{Assignment, AssignmentResult, ContextId, LocalStamp, StatusReport};

use super::{Operation, OperationError, RemoteGateway};

/// Body of the polling operations (`assign`, `update-status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollRequest {
    pub context_id: u64,
    /// `YYYY-MM-DD`
    pub current_date: String,
    /// `HH:MM:SS`
    pub current_time: String,
}

impl PollRequest {
    pub fn new(context: ContextId, now: &LocalStamp) -> Self {
        Self {
            context_id: context.get(),
            current_date: now.date_string(),
            current_time: now.time_string(),
        }
    }
}

/// Body of the daily reset operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetRequest {
    /// `YYYY-MM-DD`
    pub reset_date: String,
}

#[derive(Debug, Deserialize)]
struct AssignData {
    assignments: Vec<Assignment>,
}

/// Ask the backend to place idle doctors into empty rooms of `context`.
pub async fn assign_doctors(
    gateway: &dyn RemoteGateway,
    context: ContextId,
    now: &LocalStamp,
    timeout: Option<Duration>,
) -> Result<AssignmentResult, OperationError> {
    let op = Operation::Assign;
    let data = gateway
        .call(op, to_payload(op, &PollRequest::new(context, now))?, timeout)
        .await?;
    let decoded: AssignData = decode(op, data)?;
    Ok(AssignmentResult::new(decoded.assignments))
}

/// Ask the backend to recompute duty statuses of `context` for `now`.
pub async fn update_status(
    gateway: &dyn RemoteGateway,
    context: ContextId,
    now: &LocalStamp,
    timeout: Option<Duration>,
) -> Result<StatusReport, OperationError> {
    let op = Operation::UpdateStatus;
    let data = gateway
        .call(op, to_payload(op, &PollRequest::new(context, now))?, timeout)
        .await?;
    decode(op, data)
}

/// Clear transient daily state for the date of `today`.
pub async fn reset_daily(
    gateway: &dyn RemoteGateway,
    today: &LocalStamp,
    timeout: Option<Duration>,
) -> Result<(), OperationError> {
    let op = Operation::ResetDaily;
    let body = ResetRequest {
        reset_date: today.date_string(),
    };
    gateway.call(op, to_payload(op, &body)?, timeout).await?;
    Ok(())
}

fn to_payload<T: Serialize>(operation: Operation, body: &T) -> Result<Value, OperationError> {
    serde_json::to_value(body).map_err(|e| OperationError::parse(operation, e.to_string()))
}

fn decode<T: DeserializeOwned>(operation: Operation, data: Value) -> Result<T, OperationError> {
    trace!(%operation, data = %data, "decoding response data");
    serde_json::from_value(data).map_err(|e| OperationError::parse(operation, e.to_string()))
}
