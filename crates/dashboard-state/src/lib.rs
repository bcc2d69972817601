pub mod config;
pub mod context;
pub mod recommend;
pub mod retry;
pub mod scheduler;
pub mod setup;
#[cfg(test)]
mod tests;

pub use config::{DashboardConfig, MarketDataMode};
pub use context::{DashboardContext, DashboardStatus, RefreshMode, RefreshReport};
pub use recommend::{Recommendations, RECOMMENDED_CAP, STRONG_BUY};
pub use retry::RetryPolicy;
pub use scheduler::RefreshScheduler;
pub use setup::build_context;
