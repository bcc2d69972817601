use dashboard_core::{ModelVerdict, Recommendation};
use serde::{Deserialize, Serialize};

/// Blended sentiment from news and social sources, each 0.0 to 1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentMix {
    pub news: f64,
    pub social: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonSignals {
    pub short_term: Recommendation,
    pub medium_term: Recommendation,
    pub long_term: Recommendation,
}

/// Price path forecast for the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionData {
    pub symbol: String,
    pub historical_prices: Vec<f64>,
    pub predicted_prices: Vec<f64>,
    /// One label per historical and predicted point, "M/D"
    pub time_labels: Vec<String>,
    pub confidence: f64,
    pub sentiment: SentimentMix,
    pub signals: HorizonSignals,
    pub supporting_factors: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Positive/negative/neutral shares sum to 1; `overall` is on a -1 to 1 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentScore {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpAnalysis {
    pub symbol: String,
    pub sentiment: SentimentScore,
    pub keywords: Vec<String>,
    pub entities: Vec<Entity>,
    pub summary: String,
    pub topics: Vec<Topic>,
    pub headlines_analyzed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLabel {
    Buy,
    Sell,
    Hold,
    Mixed,
}

impl From<Recommendation> for ConsensusLabel {
    fn from(rec: Recommendation) -> Self {
        match rec {
            Recommendation::Buy => ConsensusLabel::Buy,
            Recommendation::Sell => ConsensusLabel::Sell,
            Recommendation::Hold => ConsensusLabel::Hold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consensus {
    pub label: ConsensusLabel,
    /// Votes for the leading recommendation
    pub agreeing: usize,
    pub total: usize,
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

/// Per-model verdicts plus the vote over them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnalysis {
    pub symbol: String,
    pub current_price: f64,
    pub results: Vec<ModelVerdict>,
    pub consensus: Consensus,
}
