use ai_analysis::{AnalyticsError, AnalyticsProvider, AnalyticsResult, ModelAnalysis, NlpAnalysis, PredictionData};
use chrono::{DateTime, Utc};
use dashboard_core::{
    seed, ApiKeys, CredentialName, DashboardError, DashboardResult, MarketDataProvider, Quote,
    Startup, Stock,
};
use notification_service::NotificationService;
use portfolio_manager::{validate_holding, Holding, HoldingStore, NewHolding, Portfolio, PortfolioSummary};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::recommend::{self, Recommendations};
use crate::retry::RetryPolicy;

/// Externally visible refresh state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Stocks that received a quote
    pub updated: usize,
    /// Quotes for symbols the dashboard does not track
    pub ignored: usize,
    pub attempts: u32,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    pub mode: RefreshMode,
    pub market_data: String,
    pub analytics: String,
    pub persistent: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub refresh_count: u64,
    pub stocks: usize,
    pub startups: usize,
    pub holdings: usize,
}

struct Collections {
    stocks: Vec<Stock>,
    startups: Vec<Startup>,
    portfolio: Portfolio,
    credentials: ApiKeys,
    default_credentials: ApiKeys,
    last_refreshed: Option<DateTime<Utc>>,
    refresh_count: u64,
}

type RefreshOutcome = DashboardResult<RefreshReport>;

/// Clears the refreshing flag even if the refresh future is dropped
struct RefreshingGuard<'a>(&'a AtomicBool);

impl<'a> RefreshingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for RefreshingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owner of every mutable dashboard collection.
///
/// Shared as `Arc<DashboardContext>`. No lock is held across provider I/O, and
/// overlapping `refresh()` calls share a single fetch.
pub struct DashboardContext {
    collections: RwLock<Collections>,
    market: Arc<dyn MarketDataProvider>,
    analytics: Arc<dyn AnalyticsProvider>,
    store: Option<Arc<dyn HoldingStore>>,
    notifications: Arc<NotificationService>,
    retry: RetryPolicy,
    analysis_timeout: Duration,
    refreshing: AtomicBool,
    refresh_generation: AtomicU64,
    last_outcome: Mutex<Option<(u64, RefreshOutcome)>>,
}

impl DashboardContext {
    /// Seeded with the sample stocks and startups, in memory only
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        analytics: Arc<dyn AnalyticsProvider>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            collections: RwLock::new(Collections {
                stocks: seed::sample_stocks(),
                startups: seed::sample_startups(),
                portfolio: Portfolio::new(),
                credentials: ApiKeys::default(),
                default_credentials: ApiKeys::default(),
                last_refreshed: None,
                refresh_count: 0,
            }),
            market,
            analytics,
            store: None,
            notifications,
            retry: RetryPolicy::default(),
            analysis_timeout: Duration::from_secs(10),
            refreshing: AtomicBool::new(false),
            refresh_generation: AtomicU64::new(0),
            last_outcome: Mutex::new(None),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn HoldingStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    /// Set the defaults that reset and clear restore; also the starting values
    pub fn with_credentials(mut self, defaults: ApiKeys) -> Self {
        let collections = self.collections.get_mut();
        collections.credentials = defaults.clone();
        collections.default_credentials = defaults;
        self
    }

    pub fn with_collections(mut self, stocks: Vec<Stock>, startups: Vec<Startup>) -> Self {
        let collections = self.collections.get_mut();
        collections.stocks = stocks;
        collections.startups = startups;
        self
    }

    pub fn notifications(&self) -> &Arc<NotificationService> {
        &self.notifications
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        if self.refreshing.load(Ordering::Acquire) {
            RefreshMode::Refreshing
        } else {
            RefreshMode::Idle
        }
    }

    /// Surface a failure as an error notification and hand it back
    async fn report<T>(&self, title: &str, result: DashboardResult<T>) -> DashboardResult<T> {
        if let Err(ref e) = result {
            self.notifications.error(title, e.to_string()).await;
        }
        result
    }

    // -- Refresh -------------------------------------------------------------

    /// Fetch fresh quotes and reprice the portfolio.
    ///
    /// A call that arrives while another refresh is running waits for it and
    /// returns its outcome instead of fetching again.
    pub async fn refresh(&self) -> RefreshOutcome {
        let seen = self.refresh_generation.load(Ordering::Acquire);
        let mut last = self.last_outcome.lock().await;

        if let Some((generation, outcome)) = last.as_ref() {
            if *generation > seen {
                tracing::debug!("Refresh coalesced into run #{}", generation);
                return outcome.clone();
            }
        }

        let outcome = {
            let _guard = RefreshingGuard::enter(&self.refreshing);
            self.run_refresh().await
        };
        let generation = self.refresh_generation.fetch_add(1, Ordering::AcqRel) + 1;
        *last = Some((generation, outcome.clone()));
        outcome
    }

    async fn run_refresh(&self) -> RefreshOutcome {
        let snapshot = self.collections.read().await.stocks.clone();

        let fetched = self
            .retry
            .run("refresh", || self.market.fetch_quotes(&snapshot))
            .await;

        let (quotes, attempts) = match fetched {
            Ok(result) => result,
            Err(e) => {
                let err = DashboardError::RefreshFailure(format!(
                    "{} after {} attempts via {}",
                    e,
                    self.retry.max_attempts,
                    self.market.name()
                ));
                return self.report("Refresh failed", Err(err)).await;
            }
        };

        let by_symbol: HashMap<&str, &Quote> =
            quotes.iter().map(|q| (q.symbol.as_str(), q)).collect();
        let ignored = by_symbol
            .keys()
            .filter(|symbol| !snapshot.iter().any(|s| s.symbol == **symbol))
            .count();

        let mut updated = 0;
        let fresh: Vec<Stock> = snapshot
            .iter()
            .map(|stock| {
                let mut stock = stock.clone();
                if let Some(quote) = by_symbol.get(stock.symbol.as_str()) {
                    stock.apply_quote(quote);
                    updated += 1;
                }
                stock
            })
            .collect();

        let refreshed_at = Utc::now();
        {
            let mut collections = self.collections.write().await;
            let repriced = collections.portfolio.repriced(&fresh);
            collections.stocks = fresh;
            collections.portfolio = repriced;
            collections.last_refreshed = Some(refreshed_at);
            collections.refresh_count += 1;
        }

        if ignored > 0 {
            tracing::warn!("Ignored {} quotes for untracked symbols", ignored);
        }
        tracing::info!(
            "Refreshed {} stocks via {} in {} attempt(s)",
            updated,
            self.market.name(),
            attempts
        );
        self.notifications
            .success("Data refreshed", format!("Updated prices for {} stocks", updated))
            .await;

        Ok(RefreshReport {
            updated,
            ignored,
            attempts,
            refreshed_at,
        })
    }

    // -- Portfolio -----------------------------------------------------------

    /// Validate, price against the current stock, append and persist.
    pub async fn add_holding(&self, mut input: NewHolding) -> DashboardResult<Holding> {
        input.symbol = input.symbol.trim().to_uppercase();
        let result = self.try_add_holding(input).await;
        let holding = self.report("Could not add holding", result).await?;

        self.notifications
            .success(
                "Holding added",
                format!("Added {} shares of {}", holding.shares, holding.symbol),
            )
            .await;
        Ok(holding)
    }

    async fn try_add_holding(&self, input: NewHolding) -> DashboardResult<Holding> {
        validate_holding(&input)?;

        let stock = {
            let collections = self.collections.read().await;
            collections
                .stocks
                .iter()
                .find(|s| s.symbol == input.symbol)
                .cloned()
        }
        .ok_or_else(|| DashboardError::NotFound(format!("Stock {} not found", input.symbol)))?;

        let holding = Holding::open(input, &stock);

        if let Some(store) = &self.store {
            store.save_holding(&holding).await?;
        }

        self.collections.write().await.portfolio.push(holding.clone());
        tracing::debug!("Added holding {} x {}", holding.symbol, holding.shares);
        Ok(holding)
    }

    /// Drop every holding for `symbol`. Absent symbols are a no-op.
    /// The store is updated first; on a store error memory is left as it was.
    pub async fn remove_holding(&self, symbol: &str) -> DashboardResult<bool> {
        let symbol = symbol.trim().to_uppercase();
        if !self.collections.read().await.portfolio.contains(&symbol) {
            tracing::debug!("No holding for {} to remove", symbol);
            return Ok(false);
        }

        if let Some(store) = &self.store {
            let result = store.delete_holdings(&symbol).await.map(|_| ());
            self.report("Could not remove holding", result).await?;
        }

        let removed = self.collections.write().await.portfolio.remove(&symbol);
        tracing::debug!("Removed {} holding(s) for {}", removed, symbol);

        self.notifications
            .success("Holding removed", format!("Removed {} from portfolio", symbol))
            .await;
        Ok(true)
    }

    // -- Settings ------------------------------------------------------------

    pub async fn set_credential(&self, name: CredentialName, value: impl Into<String>) -> DashboardResult<()> {
        let value = value.into();

        if let Some(store) = &self.store {
            let result = store.save_credential(name, &value).await;
            self.report("Could not save API key", result).await?;
        }

        self.collections.write().await.credentials.set(name, value);

        self.notifications
            .success("API key updated", format!("{} key saved", name))
            .await;

        if matches!(name, CredentialName::TwelveData | CredentialName::GNews) {
            tracing::info!("{} key changed; restart the server to apply it to the running provider", name);
            self.notifications
                .info(
                    "Restart required",
                    format!("The {} provider picks up the new key after a restart", name),
                )
                .await;
        }
        Ok(())
    }

    /// Same as [`set_credential`](Self::set_credential) with the name given as text
    pub async fn set_credential_named(&self, name: &str, value: impl Into<String>) -> DashboardResult<()> {
        let parsed = self.report("Unknown API key", name.parse::<CredentialName>()).await?;
        self.set_credential(parsed, value).await
    }

    pub async fn reset_credentials(&self) -> DashboardResult<()> {
        if let Some(store) = &self.store {
            let result = store.clear_credentials().await;
            self.report("Could not reset API keys", result).await?;
        }

        {
            let mut collections = self.collections.write().await;
            collections.credentials = collections.default_credentials.clone();
        }

        self.notifications
            .success("API keys reset", "All API keys restored to defaults")
            .await;
        Ok(())
    }

    /// Empty the portfolio and restore default credentials
    pub async fn clear_data(&self) -> DashboardResult<()> {
        if let Some(store) = &self.store {
            let result = async {
                store.clear_holdings().await?;
                store.clear_credentials().await
            }
            .await;
            self.report("Could not clear data", result).await?;
        }

        {
            let mut collections = self.collections.write().await;
            collections.portfolio.clear();
            collections.credentials = collections.default_credentials.clone();
        }

        self.notifications
            .success("Data cleared", "Portfolio and settings have been reset")
            .await;
        Ok(())
    }

    /// Load holdings and credential overrides from the store, if any.
    /// Returns how many holdings were loaded.
    pub async fn load_persisted(&self) -> DashboardResult<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };

        let holdings = store.load_holdings().await?;
        let overrides = store.load_credentials().await?;

        let mut collections = self.collections.write().await;
        let portfolio = Portfolio::from_holdings(holdings).repriced(&collections.stocks);
        let loaded = portfolio.len();
        collections.portfolio = portfolio;

        let mut credentials = collections.default_credentials.clone();
        for (name, value) in overrides {
            credentials.set(name, value);
        }
        collections.credentials = credentials;

        tracing::info!("Loaded {} holdings from {}", loaded, store.name());
        Ok(loaded)
    }

    // -- Read views ----------------------------------------------------------

    pub async fn stocks(&self) -> Vec<Stock> {
        self.collections.read().await.stocks.clone()
    }

    pub async fn startups(&self) -> Vec<Startup> {
        self.collections.read().await.startups.clone()
    }

    /// Case-insensitive symbol lookup
    pub async fn stock(&self, symbol: &str) -> DashboardResult<Stock> {
        let symbol = symbol.trim();
        self.collections
            .read()
            .await
            .stocks
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
            .ok_or_else(|| DashboardError::NotFound(format!("Stock {} not found", symbol)))
    }

    pub async fn search_stocks(&self, query: &str) -> Vec<Stock> {
        recommend::search_stocks(&self.collections.read().await.stocks, query)
    }

    pub async fn portfolio(&self) -> Vec<Holding> {
        self.collections.read().await.portfolio.holdings().to_vec()
    }

    pub async fn portfolio_summary(&self) -> PortfolioSummary {
        self.collections.read().await.portfolio.summary()
    }

    /// Masked for display
    pub async fn credentials(&self) -> ApiKeys {
        self.collections.read().await.credentials.masked()
    }

    pub async fn credential(&self, name: CredentialName) -> String {
        self.collections.read().await.credentials.get(name).to_string()
    }

    pub async fn recommended_stocks(&self) -> Vec<Stock> {
        recommend::recommended_stocks(&self.collections.read().await.stocks)
    }

    pub async fn recommended_startups(&self) -> Vec<Startup> {
        recommend::recommended_startups(&self.collections.read().await.startups)
    }

    pub async fn recommendations(&self) -> Recommendations {
        let collections = self.collections.read().await;
        Recommendations {
            stocks: recommend::recommended_stocks(&collections.stocks),
            startups: recommend::recommended_startups(&collections.startups),
        }
    }

    pub async fn status(&self) -> DashboardStatus {
        let collections = self.collections.read().await;
        DashboardStatus {
            mode: self.refresh_mode(),
            market_data: self.market.name().to_string(),
            analytics: self.analytics.backend_name().to_string(),
            persistent: self.store.is_some(),
            last_refreshed: collections.last_refreshed,
            refresh_count: collections.refresh_count,
            stocks: collections.stocks.len(),
            startups: collections.startups.len(),
            holdings: collections.portfolio.len(),
        }
    }

    // -- Analysis ------------------------------------------------------------

    async fn priced(&self, symbol: &str) -> DashboardResult<(String, f64)> {
        let stock = self.stock(symbol).await?;
        let price = stock.price.to_f64().unwrap_or_default();
        Ok((stock.symbol, price))
    }

    async fn bounded<T>(&self, analysis: impl Future<Output = AnalyticsResult<T>>) -> DashboardResult<T> {
        match tokio::time::timeout(self.analysis_timeout, analysis).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(AnalyticsError::Provider(inner))) => Err(inner),
            Ok(Err(e)) => Err(DashboardError::Provider(e.to_string())),
            Err(_) => Err(DashboardError::Provider(format!(
                "analysis timed out after {}s",
                self.analysis_timeout.as_secs_f64()
            ))),
        }
    }

    pub async fn prediction(&self, symbol: &str) -> DashboardResult<PredictionData> {
        let (symbol, price) = self.priced(symbol).await?;
        self.bounded(self.analytics.predict(&symbol, price)).await
    }

    pub async fn sentiment(&self, symbol: &str) -> DashboardResult<NlpAnalysis> {
        let (symbol, _) = self.priced(symbol).await?;
        self.bounded(self.analytics.analyze_sentiment(&symbol)).await
    }

    pub async fn model_analysis(&self, symbol: &str) -> DashboardResult<ModelAnalysis> {
        let (symbol, price) = self.priced(symbol).await?;
        self.bounded(self.analytics.multi_model(&symbol, price)).await
    }

    /// Assistant reply over the current collections
    pub async fn chat(&self, query: &str) -> DashboardResult<String> {
        if query.trim().is_empty() {
            return Err(DashboardError::Validation("Message must not be empty".to_string()));
        }
        let collections = self.collections.read().await;
        Ok(ai_analysis::answer(query, &collections.stocks, &collections.startups))
    }
}
