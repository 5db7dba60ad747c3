use thiserror::Error;

use floor_model::ValidationError;

/// Failure to construct an [`crate::HttpGateway`].
#[derive(Debug, Error)]
pub enum HttpGatewayError {
    #[error("invalid gateway config: {0}")]
    Config(#[from] ValidationError),

    #[error("http client init failed: {0}")]
    Client(#[from] reqwest::Error),
}
