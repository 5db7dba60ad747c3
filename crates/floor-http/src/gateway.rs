use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, trace};

use floor_core::gateway::{Envelope, Operation, OperationError, RemoteGateway};
use floor_model::GatewayConfig;

use crate::error::HttpGatewayError;

/// Longest server detail carried into an [`OperationError::Http`].
const MAX_DETAIL_CHARS: usize = 256;

/// [`RemoteGateway`] over HTTP POST with JSON bodies.
///
/// The deadline covers the whole exchange: connect, send and reading the body. When it
/// fires only the in-flight call is dropped.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, HttpGatewayError> {
        config.validate()?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Full endpoint URL for `operation`.
    pub fn url(&self, operation: Operation) -> String {
        let path = match operation {
            Operation::Assign => &self.config.assign_path,
            Operation::UpdateStatus => &self.config.status_path,
            Operation::ResetDaily => &self.config.reset_path,
        };
        format!("{}{}", self.base_url, path)
    }

    async fn exchange(
        &self,
        operation: Operation,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<Value, OperationError> {
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_error(operation, e, timeout))?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);
        let body = resp
            .bytes()
            .await
            .map_err(|e| transport_error(operation, e, timeout))?;

        if !status.is_success() {
            return Err(OperationError::Http {
                operation,
                status: Some(status.as_u16()),
                detail: server_detail(&body),
            });
        }
        if !content_type.as_deref().is_some_and(|ct| ct.contains("json")) {
            return Err(OperationError::parse(
                operation,
                format!(
                    "expected a json response, got content-type '{}'",
                    content_type.as_deref().unwrap_or("none")
                ),
            ));
        }

        Envelope::from_slice(operation, &body)?.into_data(operation)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn call(
        &self,
        operation: Operation,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, OperationError> {
        let timeout = timeout.unwrap_or(self.timeout);
        let url = self.url(operation);
        let started = Instant::now();
        trace!(%operation, %url, "sending request");

        let result = match tokio::time::timeout(
            timeout,
            self.exchange(operation, &url, &payload, timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(OperationError::Timeout {
                operation,
                timeout_ms: timeout.as_millis() as u64,
            }),
        };

        debug!(
            %operation,
            %url,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "remote operation finished"
        );
        result
    }
}

fn transport_error(operation: Operation, err: reqwest::Error, timeout: Duration) -> OperationError {
    if err.is_timeout() {
        return OperationError::Timeout {
            operation,
            timeout_ms: timeout.as_millis() as u64,
        };
    }
    OperationError::Http {
        operation,
        status: err.status().map(|s| s.as_u16()),
        detail: Some(err.to_string()),
    }
}

/// Prefer the `message` field of a JSON error body, fall back to the raw text.
fn server_detail(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return Some(message.clone());
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_DETAIL_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_paths() {
        let gw = HttpGateway::new(GatewayConfig::default().with_base_url("http://floor.local:9000/"))
            .unwrap();

        assert_eq!(
            gw.url(Operation::Assign),
            "http://floor.local:9000/api/schedule/auto-assign"
        );
        assert_eq!(
            gw.url(Operation::ResetDaily),
            "http://floor.local:9000/api/schedule/reset-daily"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = HttpGateway::new(GatewayConfig::default().with_base_url("floor.local"))
            .err()
            .unwrap();
        assert!(matches!(err, HttpGatewayError::Config(_)));
    }

    #[test]
    fn detail_prefers_json_message() {
        assert_eq!(
            server_detail(br#"{"message": "db down"}"#).as_deref(),
            Some("db down")
        );
        assert_eq!(server_detail(b"  plain failure \n").as_deref(), Some("plain failure"));
        assert_eq!(server_detail(b""), None);

        let long = "x".repeat(1_000);
        assert_eq!(server_detail(long.as_bytes()).unwrap().len(), MAX_DETAIL_CHARS);
    }
}
