use ai_analysis::{AnalyticsConfig, AnalyticsMode};
use anyhow::{anyhow, Context, Result};
use dashboard_core::ApiKeys;
use notification_service::NotificationConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Where quotes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketDataMode {
    #[default]
    Simulated,
    TwelveData,
}

impl MarketDataMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDataMode::Simulated => "simulated",
            MarketDataMode::TwelveData => "twelvedata",
        }
    }
}

impl FromStr for MarketDataMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(MarketDataMode::Simulated),
            "twelvedata" | "twelve_data" => Ok(MarketDataMode::TwelveData),
            other => Err(format!(
                "unknown market data mode '{}' (expected simulated or twelvedata)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub refresh_interval: Duration,
    pub retry: RetryPolicy,
    pub market_mode: MarketDataMode,
    /// Artificial delay for the simulated market
    pub simulated_latency: Duration,
    pub analytics: AnalyticsConfig,
    pub analysis_timeout: Duration,
    pub database_url: Option<String>,
    /// Defaults that reset and clear restore
    pub credentials: ApiKeys,
    pub notifications: NotificationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(600),
            retry: RetryPolicy::default(),
            market_mode: MarketDataMode::Simulated,
            simulated_latency: Duration::from_millis(1500),
            analytics: AnalyticsConfig::default(),
            analysis_timeout: Duration::from_secs(10),
            database_url: None,
            credentials: ApiKeys::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        let refresh_secs: u64 = parse_var("REFRESH_INTERVAL_SECS", 600)?;
        if refresh_secs == 0 {
            return Err(anyhow!("REFRESH_INTERVAL_SECS must be greater than zero"));
        }

        let max_attempts: u32 = parse_var("REFRESH_MAX_ATTEMPTS", 3)?;
        let backoff_ms: u64 = parse_var("REFRESH_BACKOFF_MS", 500)?;
        let simulated_latency_ms: u64 = parse_var("SIMULATED_LATENCY_MS", 1500)?;
        let analysis_timeout_secs: u64 = parse_var("ANALYSIS_TIMEOUT_SECS", 10)?;
        let analysis_timeout = Duration::from_secs(analysis_timeout_secs);

        let analytics = AnalyticsConfig {
            mode: parse_var("ANALYTICS_MODE", AnalyticsMode::Mock)?,
            latency: Duration::from_millis(simulated_latency_ms),
            inference_url: env::var("INFERENCE_URL")
                .unwrap_or_else(|_| AnalyticsConfig::default().inference_url),
            timeout: analysis_timeout,
        };

        let notifications =
            NotificationConfig::from_env().context("Failed to load notification config")?;

        Ok(Self {
            refresh_interval: Duration::from_secs(refresh_secs),
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
            market_mode: parse_var("MARKET_DATA_MODE", MarketDataMode::Simulated)?,
            simulated_latency: Duration::from_millis(simulated_latency_ms),
            analytics,
            analysis_timeout,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            credentials: ApiKeys::from_env(),
            notifications,
        })
    }
}
