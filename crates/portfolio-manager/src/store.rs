use async_trait::async_trait;
use dashboard_core::{CredentialName, DashboardResult};

use crate::models::Holding;

/// Persistence boundary for holdings and credential overrides.
///
/// Implemented by [`crate::PortfolioDb`]. The state container runs fine without one,
/// in which case everything lives in memory only.
#[async_trait]
pub trait HoldingStore: Send + Sync {
    async fn load_holdings(&self) -> DashboardResult<Vec<Holding>>;

    async fn save_holding(&self, holding: &Holding) -> DashboardResult<()>;

    /// Delete all holdings for `symbol`, returning the number of rows removed
    async fn delete_holdings(&self, symbol: &str) -> DashboardResult<u64>;

    async fn clear_holdings(&self) -> DashboardResult<()>;

    async fn load_credentials(&self) -> DashboardResult<Vec<(CredentialName, String)>>;

    async fn save_credential(&self, name: CredentialName, value: &str) -> DashboardResult<()>;

    async fn clear_credentials(&self) -> DashboardResult<()>;

    fn name(&self) -> &str;
}
