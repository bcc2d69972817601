use async_trait::async_trait;

use crate::error::AnalyticsResult;
use crate::types::{ModelAnalysis, NlpAnalysis, PredictionData};

/// Backend-agnostic interface for the stock detail analytics.
///
/// Implemented by the randomized mock generators and by the live
/// inference/news-backed provider. Dropping a returned future cancels it.
#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    // -- Price Prediction ----------------------------------------------------
    async fn predict(&self, symbol: &str, price: f64) -> AnalyticsResult<PredictionData>;

    // -- NLP Sentiment -------------------------------------------------------
    async fn analyze_sentiment(&self, symbol: &str) -> AnalyticsResult<NlpAnalysis>;

    // -- Multi-Model ---------------------------------------------------------
    async fn multi_model(&self, symbol: &str, price: f64) -> AnalyticsResult<ModelAnalysis>;

    // -- Meta ----------------------------------------------------------------
    fn backend_name(&self) -> &'static str;
}
