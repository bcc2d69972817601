use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::{DashboardError, MarketDataProvider, Quote, Stock};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::rate_limit::RateLimiter;

const BASE_URL: &str = "https://api.twelvedata.com";

/// Live quote provider backed by the Twelve Data REST API.
#[derive(Clone)]
pub struct TwelveDataClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    close: Option<String>,
    #[serde(default)]
    change: Option<String>,
    #[serde(default)]
    percent_change: Option<String>,
}

/// Split an exchange-suffixed ticker ("TCS.NS") into Twelve Data's symbol/exchange pair.
fn split_symbol(symbol: &str) -> (&str, Option<&'static str>) {
    if let Some(base) = symbol.strip_suffix(".NS") {
        (base, Some("NSE"))
    } else if let Some(base) = symbol.strip_suffix(".BO") {
        (base, Some("BSE"))
    } else {
        (symbol, None)
    }
}

fn parse_decimal(field: &str, value: Option<&str>) -> Result<Decimal, DashboardError> {
    let raw = value.ok_or_else(|| DashboardError::Provider(format!("quote missing {}", field)))?;
    Decimal::from_str(raw.trim())
        .map_err(|e| DashboardError::Provider(format!("invalid {} '{}': {}", field, raw, e)))
}

impl TwelveDataClient {
    pub fn new(api_key: String) -> Self {
        // Free tier allows 8 requests per minute
        let rate_limit: usize = std::env::var("TWELVEDATA_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, DashboardError> {
        let request = builder.build().map_err(|e| DashboardError::Provider(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| DashboardError::Provider("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| DashboardError::Provider(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!("Twelve Data 429 rate limited, waiting {}s before retry {}/3", wait_secs, attempt + 1);
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(DashboardError::Provider("Rate limited by Twelve Data after 3 retries".to_string()))
    }

    /// Fetch one quote. `Ok(None)` means the API does not know the symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, DashboardError> {
        let (ticker, exchange) = split_symbol(symbol);
        let url = format!("{}/quote", self.base_url);

        let mut params = vec![("symbol", ticker), ("apikey", self.api_key.as_str())];
        if let Some(exchange) = exchange {
            params.push(("exchange", exchange));
        }

        let response = self.send_request(self.client.get(&url).query(&params)).await?;

        if !response.status().is_success() {
            return Err(DashboardError::Provider(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: QuoteResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Provider(e.to_string()))?;

        if body.status.as_deref() == Some("error") {
            tracing::warn!(
                "Twelve Data has no quote for {}: {}",
                symbol,
                body.message.unwrap_or_default()
            );
            return Ok(None);
        }

        let price = parse_decimal("close", body.close.as_deref())?;
        let change = parse_decimal("change", body.change.as_deref())?;
        let change_percent = body
            .percent_change
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .unwrap_or(0.0);

        Ok(Some(Quote {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            timestamp: Utc::now(),
        }))
    }
}

#[async_trait]
impl MarketDataProvider for TwelveDataClient {
    async fn fetch_quotes(&self, stocks: &[Stock]) -> Result<Vec<Quote>, DashboardError> {
        if self.api_key.is_empty() {
            return Err(DashboardError::Config("TWELVEDATA_API_KEY not set".to_string()));
        }

        let mut quotes = Vec::with_capacity(stocks.len());
        for stock in stocks {
            if let Some(quote) = self.get_quote(&stock.symbol).await? {
                quotes.push(quote);
            }
        }

        tracing::info!("Fetched {}/{} quotes from Twelve Data", quotes.len(), stocks.len());
        Ok(quotes)
    }

    fn name(&self) -> &str {
        "twelvedata"
    }
}
