pub mod assistant;
pub mod consensus;
pub mod error;
pub mod lexicon;
pub mod live;
pub mod mock;
pub mod provider;
pub mod types;

pub use assistant::answer;
pub use consensus::consensus;
pub use error::{AnalyticsError, AnalyticsResult};
pub use live::{HttpInferenceBackend, LiveAnalytics};
pub use mock::MockAnalytics;
pub use provider::AnalyticsProvider;
pub use types::*;

use dashboard_core::NewsFeedProvider;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which analytics implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsMode {
    #[default]
    Mock,
    Live,
}

impl FromStr for AnalyticsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(AnalyticsMode::Mock),
            "live" => Ok(AnalyticsMode::Live),
            other => Err(format!("unknown analytics mode '{}' (expected mock or live)", other)),
        }
    }
}

/// Configuration for the analytics backend
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub mode: AnalyticsMode,
    /// Artificial delay for the mock generators
    pub latency: Duration,
    pub inference_url: String,
    pub timeout: Duration,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            mode: AnalyticsMode::Mock,
            latency: Duration::from_millis(1500),
            inference_url: "http://localhost:8004".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Build the configured provider. Live mode reads headlines from `news`.
pub fn build_provider(config: &AnalyticsConfig, news: Arc<dyn NewsFeedProvider>) -> Arc<dyn AnalyticsProvider> {
    match config.mode {
        AnalyticsMode::Mock => Arc::new(MockAnalytics::new(config.latency)),
        AnalyticsMode::Live => {
            let backend = HttpInferenceBackend::new(config.inference_url.clone(), config.timeout);
            Arc::new(LiveAnalytics::new(Arc::new(backend), news))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("mock".parse::<AnalyticsMode>().unwrap(), AnalyticsMode::Mock);
        assert_eq!(" LIVE ".parse::<AnalyticsMode>().unwrap(), AnalyticsMode::Live);
        assert!("random".parse::<AnalyticsMode>().is_err());
    }

    #[test]
    fn test_build_provider_by_mode() {
        struct NoNews;

        #[async_trait::async_trait]
        impl NewsFeedProvider for NoNews {
            async fn headlines(
                &self,
                _symbol: &str,
                _limit: usize,
            ) -> Result<Vec<dashboard_core::Headline>, dashboard_core::DashboardError> {
                Ok(vec![])
            }

            fn name(&self) -> &str {
                "none"
            }
        }

        let mut config = AnalyticsConfig::default();
        assert_eq!(build_provider(&config, Arc::new(NoNews)).backend_name(), "mock");
        config.mode = AnalyticsMode::Live;
        assert_eq!(build_provider(&config, Arc::new(NoNews)).backend_name(), "live");
    }
}
