use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dashboard_core::{Horizon, ModelVerdict, Recommendation, RiskLevel};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

use crate::consensus::consensus;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::provider::AnalyticsProvider;
use crate::types::{
    Entity, HorizonSignals, ModelAnalysis, NlpAnalysis, PredictionData, SentimentMix,
    SentimentScore, Topic,
};

pub const HISTORY_POINTS: usize = 30;
pub const FORECAST_POINTS: usize = 14;
pub const MODELS: [&str; 4] = ["gemini", "groq", "openai", "ensemble"];

/// Base level of the synthetic history before scaling to the quoted price
const SYNTHETIC_BASE: f64 = 1100.0;
const SIGNAL_THRESHOLD: f64 = 0.02;

const SUPPORTING_FACTORS: &[&str] = &[
    "Positive quarterly earnings report",
    "Expansion into new markets",
    "Favorable industry trends",
    "Strong technical indicators",
    "Positive analyst ratings",
];

const RISK_FACTORS: &[&str] = &[
    "Market volatility",
    "Regulatory challenges",
    "Competitive pressures",
    "Supply chain disruptions",
    "Valuation concerns",
];

const KEYWORDS: &[&str] = &[
    "earnings", "growth", "revenue", "profit", "loss", "expansion", "acquisition",
    "merger", "CEO", "quarterly", "forecast", "guidance", "dividend", "investment",
    "technology", "market", "competition", "regulation", "innovation",
    "sustainability", "digital", "transformation",
];

const ENTITIES: &[(&str, &str)] = &[
    ("SEBI", "Organization"),
    ("RBI", "Organization"),
    ("Finance Minister", "Person"),
    ("India", "Location"),
    ("Mumbai", "Location"),
    ("CEO", "Person"),
    ("Q2 2025", "Time"),
    ("Fiscal Year", "Time"),
];

const TOPICS: &[&str] = &[
    "Quarterly Earnings", "Market Expansion", "Product Launch", "Industry Trends",
    "Regulatory Changes", "Economic Outlook", "Competitive Analysis",
    "Technology Innovation", "Leadership Changes", "Financial Performance",
    "Market Share", "Customer Growth",
];

const MODEL_FACTORS: &[&str] = &[
    "Strong quarterly earnings",
    "Positive analyst ratings",
    "Expanding market share",
    "New product launches",
    "Strategic acquisitions",
    "Industry leadership",
    "Technical indicators",
    "Valuation metrics",
    "Sector performance",
    "Economic outlook",
    "Management changes",
    "Regulatory environment",
];

fn pick<R: Rng>(rng: &mut R, items: &[&str], count: usize) -> Vec<String> {
    items
        .choose_multiple(rng, count.min(items.len()))
        .map(|s| s.to_string())
        .collect()
}

/// News and social sentiment drawn from [0.2, 0.8), blended 60/40
pub fn draw_sentiment<R: Rng>(rng: &mut R) -> SentimentMix {
    let news = rng.gen_range(0.2..0.8);
    let social = rng.gen_range(0.2..0.8);
    blend_sentiment(news, social)
}

pub fn blend_sentiment(news: f64, social: f64) -> SentimentMix {
    SentimentMix {
        news,
        social,
        overall: news * 0.6 + social * 0.4,
    }
}

fn signal(trend: f64, sentiment: f64, weight: f64) -> Recommendation {
    let score = trend + (sentiment - 0.5) * weight;
    if score > SIGNAL_THRESHOLD {
        Recommendation::Buy
    } else if score < -SIGNAL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

/// Share of forecast steps moving the same way as the first step
fn trend_consistency(predicted: &[f64]) -> f64 {
    let changes: Vec<f64> = predicted.windows(2).map(|w| w[1] - w[0]).collect();
    let Some(first) = changes.first() else {
        return 0.0;
    };
    let agreeing = changes.iter().filter(|c| c.signum() == first.signum()).count();
    agreeing as f64 / changes.len() as f64
}

/// Synthetic 30-point history and 14-point forecast around `price`
pub fn generate_prediction<R: Rng>(
    rng: &mut R,
    symbol: &str,
    price: f64,
    sentiment: SentimentMix,
) -> PredictionData {
    let scale = if price > 0.0 { price / SYNTHETIC_BASE } else { 1.0 };

    let historical_prices: Vec<f64> = (0..HISTORY_POINTS)
        .map(|i| {
            let i = i as f64;
            (1000.0 + rng.gen_range(0.0..200.0) + i * 5.0 + (i / 3.0).sin() * 50.0) * scale
        })
        .collect();

    let last = historical_prices[HISTORY_POINTS - 1];
    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let predicted_prices: Vec<f64> = (0..FORECAST_POINTS)
        .map(|i| last + (direction * i as f64 * 10.0 + rng.gen_range(-25.0..25.0)) * scale)
        .collect();

    let today = Utc::now().date_naive();
    let time_labels = (0..HISTORY_POINTS + FORECAST_POINTS)
        .map(|i| {
            let date = today - ChronoDuration::days(HISTORY_POINTS as i64) + ChronoDuration::days(i as i64);
            date.format("%-m/%-d").to_string()
        })
        .collect();

    let confidence = 0.5 + trend_consistency(&predicted_prices) * 0.4 + rng.gen_range(0.0..0.1);

    let trend_at = |idx: usize| (predicted_prices[idx] - last) / last;
    let signals = HorizonSignals {
        short_term: signal(trend_at(3), sentiment.overall, 0.4),
        medium_term: signal(trend_at(7), sentiment.overall, 0.3),
        long_term: signal(trend_at(13), sentiment.overall, 0.2),
    };

    PredictionData {
        symbol: symbol.to_string(),
        historical_prices,
        predicted_prices,
        time_labels,
        confidence: confidence.min(1.0),
        sentiment,
        signals,
        supporting_factors: pick(rng, SUPPORTING_FACTORS, 3),
        risk_factors: pick(rng, RISK_FACTORS, 3),
    }
}

/// Neutral takes the remainder; overall maps (positive - negative) onto -1..1
pub fn sentiment_score(positive: f64, negative: f64) -> SentimentScore {
    SentimentScore {
        positive,
        negative,
        neutral: (1.0 - positive - negative).max(0.0),
        overall: ((positive - negative) * 2.0 - 1.0).clamp(-1.0, 1.0),
    }
}

pub fn generate_nlp<R: Rng>(rng: &mut R, symbol: &str) -> NlpAnalysis {
    let sentiment = sentiment_score(rng.gen_range(0.3..0.7), rng.gen_range(0.1..0.4));

    let keyword_count = rng.gen_range(5..10);
    let keywords = pick(rng, KEYWORDS, keyword_count);

    let mut candidates: Vec<(String, &str)> = ENTITIES
        .iter()
        .map(|(name, kind)| (name.to_string(), *kind))
        .collect();
    candidates.push((symbol.to_string(), "Organization"));
    candidates.shuffle(rng);
    let entity_count = rng.gen_range(3..6);
    let entities = candidates
        .into_iter()
        .take(entity_count)
        .map(|(name, kind)| Entity {
            name,
            entity_type: kind.to_string(),
            sentiment: rng.gen_range(-0.8..0.8),
        })
        .collect();

    let topics: Vec<Topic> = pick(rng, TOPICS, 3)
        .into_iter()
        .map(|name| Topic {
            name,
            confidence: rng.gen_range(0.6..1.0),
        })
        .collect();

    let headlines_analyzed = rng.gen_range(8..25);
    let upbeat = sentiment.overall > 0.0;
    let summary = match rng.gen_range(0..3) {
        0 => format!(
            "Recent news and social media sentiment for {} is predominantly {}, with discussions focused on {}.",
            symbol,
            if upbeat { "positive" } else { "negative" },
            keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        ),
        1 => format!(
            "Analysis of {} news articles reveals {} market sentiment toward {}.",
            headlines_analyzed,
            if upbeat { "optimistic" } else { "cautious" },
            symbol
        ),
        _ => format!(
            "{} is generating {} attention in financial media, with emphasis on {} and {}.",
            symbol,
            if upbeat { "favorable" } else { "mixed" },
            topics[0].name.to_lowercase(),
            topics[1].name.to_lowercase()
        ),
    };

    NlpAnalysis {
        symbol: symbol.to_string(),
        sentiment,
        keywords,
        entities,
        summary,
        topics,
        headlines_analyzed,
    }
}

fn reasoning(symbol: &str, rec: Recommendation, variant: usize) -> String {
    match (rec, variant) {
        (Recommendation::Buy, 0) => format!("{} shows strong growth potential based on recent performance metrics and industry trends.", symbol),
        (Recommendation::Buy, 1) => format!("Technical indicators and fundamental analysis suggest {} is undervalued at current price levels.", symbol),
        (Recommendation::Buy, _) => format!("{}'s strategic initiatives and market position indicate potential for significant upside.", symbol),
        (Recommendation::Sell, 0) => format!("{} faces significant headwinds that may impact future performance and valuation.", symbol),
        (Recommendation::Sell, 1) => format!("Technical analysis indicates {} is overbought and due for a correction.", symbol),
        (Recommendation::Sell, _) => format!("{}'s competitive position is weakening, suggesting potential downside risk.", symbol),
        (Recommendation::Hold, 0) => format!("{} is fairly valued at current levels, with balanced risk and reward potential.", symbol),
        (Recommendation::Hold, 1) => format!("While {} has positive long-term prospects, short-term volatility suggests caution.", symbol),
        (Recommendation::Hold, _) => format!("{} shows mixed signals, with some positive indicators offset by potential challenges.", symbol),
    }
}

/// Leans toward the biased recommendation 70% of the time
fn biased_pick<R: Rng>(rng: &mut R, bias: f64) -> Recommendation {
    use Recommendation::*;
    let (lead, second, third) = if bias > 0.7 {
        (Buy, Hold, Sell)
    } else if bias < 0.3 {
        (Sell, Hold, Buy)
    } else {
        (Hold, Buy, Sell)
    };
    if rng.gen_bool(0.7) {
        lead
    } else if rng.gen_bool(0.5) {
        second
    } else {
        third
    }
}

/// One verdict per model sharing a common bias so the models tend to agree
pub fn generate_verdicts<R: Rng>(rng: &mut R, symbol: &str, price: f64) -> Vec<ModelVerdict> {
    let bias: f64 = rng.gen();

    MODELS
        .iter()
        .map(|&model| {
            let recommendation = biased_pick(rng, bias);
            let confidence = if model == "ensemble" {
                rng.gen_range(0.7..0.95)
            } else {
                rng.gen_range(0.5..0.9)
            };

            let price_target = match recommendation {
                Recommendation::Buy => Some(price * (1.0 + rng.gen_range(0.05..0.25))),
                Recommendation::Sell => Some(price * (1.0 - rng.gen_range(0.05..0.20))),
                Recommendation::Hold => None,
            };

            let timeframe = if rng.gen_bool(0.4) {
                Horizon::Medium
            } else if rng.gen_bool(0.5) {
                Horizon::Short
            } else {
                Horizon::Long
            };

            let unlikely = rng.gen_bool(0.3);
            let risk_level = match (recommendation, unlikely) {
                (Recommendation::Buy, true) => RiskLevel::Medium,
                (Recommendation::Buy, false) => RiskLevel::High,
                (Recommendation::Sell, true) => RiskLevel::High,
                (Recommendation::Sell, false) => RiskLevel::Medium,
                (Recommendation::Hold, true) => RiskLevel::Medium,
                (Recommendation::Hold, false) => RiskLevel::Low,
            };

            let variant = rng.gen_range(0..3);
            let factor_count = rng.gen_range(2..5);

            ModelVerdict {
                model: model.to_string(),
                recommendation,
                confidence,
                reasoning: reasoning(symbol, recommendation, variant),
                price_target,
                risk_level,
                timeframe,
                supporting_factors: pick(rng, MODEL_FACTORS, factor_count),
            }
        })
        .collect()
}

/// Randomized analytics with an optional artificial delay
pub struct MockAnalytics {
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl MockAnalytics {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> AnalyticsResult<T> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AnalyticsError::ServiceUnavailable("mock analytics rng poisoned".to_string()))?;
        Ok(f(&mut rng))
    }
}

#[async_trait]
impl AnalyticsProvider for MockAnalytics {
    async fn predict(&self, symbol: &str, price: f64) -> AnalyticsResult<PredictionData> {
        self.delay().await;
        self.with_rng(|rng| {
            let sentiment = draw_sentiment(rng);
            generate_prediction(rng, symbol, price, sentiment)
        })
    }

    async fn analyze_sentiment(&self, symbol: &str) -> AnalyticsResult<NlpAnalysis> {
        self.delay().await;
        self.with_rng(|rng| generate_nlp(rng, symbol))
    }

    async fn multi_model(&self, symbol: &str, price: f64) -> AnalyticsResult<ModelAnalysis> {
        self.delay().await;
        let results = self.with_rng(|rng| generate_verdicts(rng, symbol, price))?;
        Ok(ModelAnalysis {
            symbol: symbol.to_string(),
            current_price: price,
            consensus: consensus(&results),
            results,
        })
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_prediction_shape() {
        let mut rng = rng();
        for _ in 0..20 {
            let sentiment = draw_sentiment(&mut rng);
            let data = generate_prediction(&mut rng, "TCS.NS", 3850.25, sentiment);
            assert_eq!(data.historical_prices.len(), 30);
            assert_eq!(data.predicted_prices.len(), 14);
            assert_eq!(data.time_labels.len(), 44);
            assert!(data.confidence >= 0.5 && data.confidence <= 1.0);
            assert_eq!(data.supporting_factors.len(), 3);
            assert_eq!(data.risk_factors.len(), 3);
            assert!(data.time_labels.iter().all(|l| l.contains('/')));
        }
    }

    #[test]
    fn test_sentiment_blend() {
        let mix = blend_sentiment(0.5, 0.75);
        assert!((mix.overall - 0.6).abs() < 1e-12);

        let mut rng = rng();
        for _ in 0..50 {
            let mix = draw_sentiment(&mut rng);
            assert!(mix.news >= 0.2 && mix.news < 0.8);
            assert!(mix.social >= 0.2 && mix.social < 0.8);
        }
    }

    #[test]
    fn test_signal_thresholds() {
        assert_eq!(signal(0.05, 0.5, 0.4), Recommendation::Buy);
        assert_eq!(signal(-0.05, 0.5, 0.4), Recommendation::Sell);
        assert_eq!(signal(0.0, 0.5, 0.4), Recommendation::Hold);
        // bullish sentiment alone can tip a flat trend
        assert_eq!(signal(0.0, 0.6, 0.4), Recommendation::Buy);
    }

    #[test]
    fn test_trend_consistency() {
        assert_eq!(trend_consistency(&[1.0, 2.0, 3.0, 4.0]), 1.0);
        assert!((trend_consistency(&[1.0, 2.0, 1.0, 2.0]) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(trend_consistency(&[1.0]), 0.0);
    }

    #[test]
    fn test_nlp_ranges() {
        let mut rng = rng();
        for _ in 0..50 {
            let nlp = generate_nlp(&mut rng, "INFY.NS");
            let s = &nlp.sentiment;
            assert!(s.positive >= 0.3 && s.positive < 0.7);
            assert!(s.negative >= 0.1 && s.negative < 0.4);
            assert!(s.neutral >= 0.0);
            assert!(s.overall >= -1.0 && s.overall <= 1.0);
            assert!((5..=9).contains(&nlp.keywords.len()));
            assert!((3..=5).contains(&nlp.entities.len()));
            assert_eq!(nlp.topics.len(), 3);
            assert!(!nlp.summary.is_empty());
        }
    }

    #[test]
    fn test_verdict_rules() {
        let mut rng = rng();
        for _ in 0..50 {
            let verdicts = generate_verdicts(&mut rng, "HDFCBANK.NS", 1678.45);
            assert_eq!(verdicts.len(), 4);
            for v in &verdicts {
                match v.recommendation {
                    Recommendation::Buy => {
                        assert!(v.price_target.unwrap() > 1678.45);
                        assert_ne!(v.risk_level, RiskLevel::Low);
                    }
                    Recommendation::Sell => {
                        assert!(v.price_target.unwrap() < 1678.45);
                        assert_ne!(v.risk_level, RiskLevel::Low);
                    }
                    Recommendation::Hold => {
                        assert!(v.price_target.is_none());
                        assert_ne!(v.risk_level, RiskLevel::High);
                    }
                }
                if v.model == "ensemble" {
                    assert!(v.confidence >= 0.7 && v.confidence < 0.95);
                } else {
                    assert!(v.confidence >= 0.5 && v.confidence < 0.9);
                }
                assert!((2..=4).contains(&v.supporting_factors.len()));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_provider_latency_and_consensus() {
        let mock = MockAnalytics::with_seed(Duration::from_millis(1500), 5);
        let start = tokio::time::Instant::now();
        let analysis = mock.multi_model("TCS.NS", 3850.25).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(analysis.results.len(), 4);
        assert_eq!(analysis.consensus.total, 4);
        assert_eq!(mock.backend_name(), "mock");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_future_cancels_delay() {
        let mock = MockAnalytics::with_seed(Duration::from_secs(60), 5);
        let result = tokio::time::timeout(Duration::from_secs(1), mock.predict("TCS.NS", 3850.25)).await;
        assert!(result.is_err());
    }
}
