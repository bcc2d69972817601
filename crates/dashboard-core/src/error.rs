use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Refresh failed: {0}")]
    RefreshFailure(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
