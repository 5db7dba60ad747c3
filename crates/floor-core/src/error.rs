use thiserror::Error;

use floor_model::ValidationError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("task already registered: {0}")]
    DuplicateTask(String),

    #[error("task {0} registered with a zero period")]
    ZeroPeriod(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
}
