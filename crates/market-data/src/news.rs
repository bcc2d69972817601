use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashboard_core::{DashboardError, Headline, NewsFeedProvider};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";

const HEADLINE_TEMPLATES: &[&str] = &[
    "{} reports steady quarterly earnings ahead of estimates",
    "Analysts weigh {} valuation after recent rally",
    "{} announces expansion into new markets",
    "Regulatory review could weigh on {} guidance",
    "{} shares slip as sector sees profit booking",
    "Brokerages raise price target on {} citing strong demand",
    "{} management outlines digital transformation roadmap",
    "Investors track {} ahead of RBI policy meeting",
];

/// Offline feed built from canned headline templates.
#[derive(Debug, Clone, Default)]
pub struct CannedNewsFeed;

impl CannedNewsFeed {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NewsFeedProvider for CannedNewsFeed {
    async fn headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>, DashboardError> {
        let now = Utc::now();
        let mut templates: Vec<&str> = HEADLINE_TEMPLATES.to_vec();
        templates.shuffle(&mut rand::thread_rng());

        Ok(templates
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, template)| Headline {
                title: template.replace("{}", symbol),
                description: None,
                url: None,
                source: Some("canned".to_string()),
                published_at: Some(now - ChronoDuration::hours(i as i64 * 3)),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: String,
}

impl From<GNewsArticle> for Headline {
    fn from(article: GNewsArticle) -> Self {
        Headline {
            title: article.title,
            description: article.description,
            url: article.url,
            source: article.source.map(|s| s.name),
            published_at: article.published_at,
        }
    }
}

/// Headline search against the GNews API.
#[derive(Clone)]
pub struct GNewsClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GNewsClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: GNEWS_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// GNews matches on words, so drop the exchange suffix
fn search_term(symbol: &str) -> &str {
    symbol.split('.').next().unwrap_or(symbol)
}

#[async_trait]
impl NewsFeedProvider for GNewsClient {
    async fn headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>, DashboardError> {
        if self.api_key.is_empty() {
            return Err(DashboardError::Config("GNEWS_API_KEY not set".to_string()));
        }

        let url = format!("{}/search", self.base_url);
        let max = limit.clamp(1, 100).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", search_term(symbol)),
                ("lang", "en"),
                ("max", max.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DashboardError::Provider(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: GNewsResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Provider(e.to_string()))?;

        tracing::debug!("GNews returned {} articles for {}", body.articles.len(), symbol);
        Ok(body.articles.into_iter().take(limit).map(Headline::from).collect())
    }

    fn name(&self) -> &str {
        "gnews"
    }
}
