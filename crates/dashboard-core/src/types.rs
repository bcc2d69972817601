use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buy/sell/hold call attached to a stock or produced by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Sell => "sell",
            Recommendation::Hold => "hold",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listed stock. `symbol` is the identity and never changes after seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: f64,
    pub recommendation: Recommendation,
    /// 0 to 10
    pub ai_score: f64,
    pub reason: String,
}

impl Stock {
    /// Overwrite the numeric fields from a quote. Identity fields are untouched.
    pub fn apply_quote(&mut self, quote: &Quote) {
        self.price = quote.price;
        self.change = quote.change;
        self.change_percent = quote.change_percent;
    }
}

/// An unlisted company tracked for its growth story. Never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Startup {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub description: String,
    pub ai_score: f64,
    /// Percent
    pub growth_potential: f64,
    /// Free-text label such as "Strong Buy"
    pub recommendation: String,
    pub reason: String,
}

/// Latest price data for one symbol, as delivered by a market-data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// News headline or social post about a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

/// One inference backend's opinion on a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVerdict {
    pub model: String,
    pub recommendation: Recommendation,
    pub confidence: f64, // 0.0 to 1.0
    pub reasoning: String,
    #[serde(default)]
    pub price_target: Option<f64>,
    pub risk_level: RiskLevel,
    #[serde(default = "default_horizon")]
    pub timeframe: Horizon,
    #[serde(default)]
    pub supporting_factors: Vec<String>,
}

fn default_horizon() -> Horizon {
    Horizon::Medium
}
