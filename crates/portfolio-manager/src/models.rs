use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A recorded position: user-entered fields plus the derived P/L fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
    pub buy_date: String,
    pub current_price: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: f64,
}

/// Caller input for a new holding. The name comes from the stock it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub symbol: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
    pub buy_date: String,
}

/// Persisted form of a holding (derived fields are recomputed on load)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HoldingRecord {
    pub id: Option<i64>,
    pub symbol: String,
    pub name: String,
    /// Decimal columns are stored as text to keep them exact
    pub shares: String,
    pub buy_price: String,
    pub buy_date: String,
    pub last_price: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_holdings: usize,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: f64,
    pub holdings: Vec<Holding>,
}
