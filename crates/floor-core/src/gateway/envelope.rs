use serde::Deserialize;
use serde_json::Value;

use super::{Operation, OperationError};

/// Response wrapper shared by all floor endpoints: `{success, message?, code?, data?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Decode an envelope from a response body.
    pub fn from_slice(operation: Operation, body: &[u8]) -> Result<Self, OperationError> {
        serde_json::from_slice(body).map_err(|e| OperationError::parse(operation, e.to_string()))
    }

    /// Check the success flag and hand out the `data` section.
    pub fn into_data(self, operation: Operation) -> Result<Value, OperationError> {
        if !self.success {
            return Err(OperationError::Application {
                operation,
                message: self
                    .message
                    .unwrap_or_else(|| "operation reported failure".to_string()),
                code: self.code.map(|c| match c {
                    Value::String(s) => s,
                    other => other.to_string(),
                }),
            });
        }
        Ok(self.data.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_flag_becomes_application_error() {
        let env = Envelope::from_slice(Operation::Assign, br#"{"success":false,"message":"x","code":42}"#)
            .unwrap();
        let err = env.into_data(Operation::Assign).unwrap_err();

        assert_eq!(
            err,
            OperationError::Application {
                operation: Operation::Assign,
                message: "x".into(),
                code: Some("42".into()),
            }
        );
    }

    #[test]
    fn success_returns_data_or_null() {
        let env = Envelope::from_slice(Operation::Assign, br#"{"success":true,"data":{"a":1}}"#)
            .unwrap();
        assert_eq!(env.into_data(Operation::Assign).unwrap(), json!({"a": 1}));

        let bare = Envelope::from_slice(Operation::ResetDaily, br#"{"success":true}"#).unwrap();
        assert_eq!(bare.into_data(Operation::ResetDaily).unwrap(), Value::Null);
    }

    #[test]
    fn missing_success_flag_is_a_parse_error() {
        let err = Envelope::from_slice(Operation::UpdateStatus, br#"{"data":{}}"#).unwrap_err();
        assert_eq!(err.kind(), "parse");

        let err = Envelope::from_slice(Operation::UpdateStatus, b"<html>").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
