use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Remote endpoint settings for the floor backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Scheme, host and optional prefix, e.g. `http://clinic.local:8080`.
    pub base_url: String,
    /// Hard deadline for a single remote operation.
    pub timeout_ms: u64,
    pub assign_path: String,
    pub status_path: String,
    pub reset_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 5_000,
            assign_path: "/api/schedule/auto-assign".to_string(),
            status_path: "/api/schedule/update-status".to_string(),
            reset_path: "/api/schedule/reset-daily".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Point the gateway at another backend, keeping the default paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.timeout_ms == 0 {
            return Err(ValidationError::ZeroInterval { name: "timeout_ms" });
        }
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ValidationError::Invalid(format!(
                "gateway base_url must be an http(s) url, got '{}'",
                self.base_url
            )));
        }
        for (name, path) in [
            ("assign_path", &self.assign_path),
            ("status_path", &self.status_path),
            ("reset_path", &self.reset_path),
        ] {
            if !path.starts_with('/') {
                return Err(ValidationError::Invalid(format!(
                    "gateway {name} must start with '/', got '{path}'"
                )));
            }
        }
        Ok(())
    }
}
