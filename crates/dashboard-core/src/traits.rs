use async_trait::async_trait;
use crate::{DashboardError, Headline, ModelVerdict, Quote, Stock};

/// Trait for market-data providers (simulated or live quote feeds)
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch fresh quotes for the given stocks. Symbols the provider does not
    /// know may be left out of the result.
    async fn fetch_quotes(&self, stocks: &[Stock]) -> Result<Vec<Quote>, DashboardError>;

    fn name(&self) -> &str;
}

/// Trait for news and social feed providers
#[async_trait]
pub trait NewsFeedProvider: Send + Sync {
    async fn headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>, DashboardError>;

    fn name(&self) -> &str;
}

/// Trait for inference backends that give per-model recommendations
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(&self, symbol: &str, price: f64) -> Result<Vec<ModelVerdict>, DashboardError>;

    fn name(&self) -> &str;
}
