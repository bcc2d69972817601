use async_trait::async_trait;
use dashboard_core::{DashboardError, Headline, InferenceBackend, ModelVerdict, NewsFeedProvider};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::consensus::consensus;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::lexicon::{self, EventKind};
use crate::mock::{blend_sentiment, generate_prediction, sentiment_score};
use crate::provider::AnalyticsProvider;
use crate::types::{Entity, ModelAnalysis, NlpAnalysis, PredictionData, Topic};

const HEADLINE_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
struct AnalyzeRequest<'a> {
    symbol: &'a str,
    price: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalyzeResponse {
    results: Vec<ModelVerdict>,
}

/// Inference backend reached over HTTP (`POST {base}/analyze`)
#[derive(Clone)]
pub struct HttpInferenceBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInferenceBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn analyze(&self, symbol: &str, price: f64) -> AnalyticsResult<Vec<ModelVerdict>> {
        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .json(&AnalyzeRequest { symbol, price })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyticsError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let body = response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| AnalyticsError::InvalidResponse(e.to_string()))?;
        Ok(body.results)
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn infer(&self, symbol: &str, price: f64) -> Result<Vec<ModelVerdict>, DashboardError> {
        self.analyze(symbol, price)
            .await
            .map_err(|e| DashboardError::Provider(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Analytics backed by a real inference service and news feed.
///
/// Model verdicts come from the backend; sentiment is scored from headlines.
/// The price path is still synthetic since no price history feed is wired.
pub struct LiveAnalytics {
    backend: Arc<dyn InferenceBackend>,
    news: Arc<dyn NewsFeedProvider>,
}

impl LiveAnalytics {
    pub fn new(backend: Arc<dyn InferenceBackend>, news: Arc<dyn NewsFeedProvider>) -> Self {
        Self { backend, news }
    }

    async fn headlines(&self, symbol: &str) -> AnalyticsResult<Vec<Headline>> {
        Ok(self.news.headlines(symbol, HEADLINE_LIMIT).await?)
    }
}

/// Share of positive headlines on a 0..1 scale, 0.5 when there is nothing to read
fn news_score(headlines: &[Headline]) -> f64 {
    let tally = lexicon::tally(headlines);
    if tally.total() == 0 {
        return 0.5;
    }
    (tally.positive as f64 + tally.neutral as f64 * 0.5) / tally.total() as f64
}

fn build_nlp(symbol: &str, headlines: &[Headline]) -> NlpAnalysis {
    let tally = lexicon::tally(headlines);
    let total = tally.total().max(1) as f64;
    let sentiment = sentiment_score(tally.positive as f64 / total, tally.negative as f64 / total);

    let mut topic_counts: HashMap<EventKind, usize> = HashMap::new();
    for headline in headlines {
        let kind = lexicon::classify_event(&headline.title, headline.description.as_deref());
        *topic_counts.entry(kind).or_insert(0) += 1;
    }
    let mut ranked: Vec<(EventKind, usize)> = topic_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(b.0.label())));
    let topics = ranked
        .into_iter()
        .take(3)
        .map(|(kind, count)| Topic {
            name: kind.label().to_string(),
            confidence: count as f64 / total,
        })
        .collect();

    let mut entities = vec![Entity {
        name: symbol.to_string(),
        entity_type: "Organization".to_string(),
        sentiment: sentiment.overall,
    }];
    let mut sources: Vec<String> = headlines.iter().filter_map(|h| h.source.clone()).collect();
    sources.sort();
    sources.dedup();
    entities.extend(sources.into_iter().take(4).map(|name| Entity {
        name,
        entity_type: "Organization".to_string(),
        sentiment: 0.0,
    }));

    let keywords = lexicon::keywords(headlines, symbol, 8);
    let summary = format!(
        "Analysis of {} news articles reveals {} market sentiment toward {} ({} positive, {} negative).",
        headlines.len(),
        if sentiment.overall > 0.0 { "optimistic" } else { "cautious" },
        symbol,
        tally.positive,
        tally.negative
    );

    NlpAnalysis {
        symbol: symbol.to_string(),
        sentiment,
        keywords,
        entities,
        summary,
        topics,
        headlines_analyzed: headlines.len(),
    }
}

#[async_trait]
impl AnalyticsProvider for LiveAnalytics {
    async fn predict(&self, symbol: &str, price: f64) -> AnalyticsResult<PredictionData> {
        let headlines = self.headlines(symbol).await?;
        let news = news_score(&headlines);
        // no social feed, so news stands in for both sources
        let sentiment = blend_sentiment(news, news);
        let mut rng = StdRng::from_entropy();
        Ok(generate_prediction(&mut rng, symbol, price, sentiment))
    }

    async fn analyze_sentiment(&self, symbol: &str) -> AnalyticsResult<NlpAnalysis> {
        let headlines = self.headlines(symbol).await?;
        tracing::debug!("Scoring {} headlines for {} from {}", headlines.len(), symbol, self.news.name());
        Ok(build_nlp(symbol, &headlines))
    }

    async fn multi_model(&self, symbol: &str, price: f64) -> AnalyticsResult<ModelAnalysis> {
        let results = self.backend.infer(symbol, price).await?;
        if results.is_empty() {
            return Err(AnalyticsError::InvalidResponse(format!(
                "{} returned no model results for {}",
                self.backend.name(),
                symbol
            )));
        }
        Ok(ModelAnalysis {
            symbol: symbol.to_string(),
            current_price: price,
            consensus: consensus(&results),
            results,
        })
    }

    fn backend_name(&self) -> &'static str {
        "live"
    }
}
