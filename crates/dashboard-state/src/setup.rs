use anyhow::{Context, Result};
use dashboard_core::{CredentialName, MarketDataProvider, NewsFeedProvider};
use market_data::{CannedNewsFeed, GNewsClient, SimulatedMarket, TwelveDataClient};
use notification_service::NotificationService;
use portfolio_manager::PortfolioDb;
use std::sync::Arc;

use crate::config::{DashboardConfig, MarketDataMode};
use crate::context::DashboardContext;

fn market_provider(config: &DashboardConfig) -> Arc<dyn MarketDataProvider> {
    match config.market_mode {
        MarketDataMode::Simulated => Arc::new(SimulatedMarket::new(config.simulated_latency)),
        MarketDataMode::TwelveData => {
            let key = config.credentials.get(CredentialName::TwelveData).to_string();
            if key.is_empty() {
                tracing::warn!("MARKET_DATA_MODE=twelvedata but TWELVEDATA_API_KEY is empty; refreshes will fail");
            }
            Arc::new(TwelveDataClient::new(key))
        }
    }
}

fn news_feed(config: &DashboardConfig) -> Arc<dyn NewsFeedProvider> {
    let key = config.credentials.get(CredentialName::GNews);
    if key.is_empty() {
        Arc::new(CannedNewsFeed::new())
    } else {
        Arc::new(GNewsClient::new(key.to_string()))
    }
}

/// Wire providers, store and notifications from configuration, then hydrate
/// persisted holdings.
pub async fn build_context(config: &DashboardConfig) -> Result<DashboardContext> {
    let market = market_provider(config);
    let news = news_feed(config);
    let analytics = ai_analysis::build_provider(&config.analytics, news.clone());
    let notifications = Arc::new(NotificationService::new(&config.notifications));

    tracing::info!(
        "Market data: {}, analytics: {}, news: {}",
        market.name(),
        analytics.backend_name(),
        news.name()
    );

    let mut context = DashboardContext::new(market, analytics, notifications)
        .with_retry(config.retry)
        .with_analysis_timeout(config.analysis_timeout)
        .with_credentials(config.credentials.clone());

    if let Some(url) = &config.database_url {
        let db = PortfolioDb::new(url)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;
        tracing::info!("Persisting holdings to {}", url);
        context = context.with_store(Arc::new(db));
    }

    let loaded = context
        .load_persisted()
        .await
        .context("Failed to load persisted holdings")?;
    if loaded > 0 {
        tracing::info!("Restored {} holdings", loaded);
    }

    Ok(context)
}
