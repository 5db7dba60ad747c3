//! HTTP transport for the floor backend.
//!
//! [`HttpGateway`] posts JSON to the configured endpoints and normalizes every failure into
//! an [`floor_core::gateway::OperationError`].
mod error;
pub use error::HttpGatewayError;

mod gateway;
pub use gateway::HttpGateway;
