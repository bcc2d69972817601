use dashboard_core::DashboardError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider error: {0}")]
    Provider(#[from] DashboardError),

    #[error("Timeout")]
    Timeout,
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
