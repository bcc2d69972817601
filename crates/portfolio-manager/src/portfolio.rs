use crate::models::*;
use chrono::NaiveDate;
use dashboard_core::{DashboardError, DashboardResult, Stock};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Largest accepted position value (`shares * buy_price`), one quadrillion
pub const MAX_POSITION_VALUE: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// `(ratio - 1) * 100` as f64, or 0 when it cannot be represented
fn percent_change(ratio: Option<Decimal>) -> f64 {
    ratio
        .and_then(|r| r.checked_sub(Decimal::ONE))
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Profit/loss of a position at `current_price`.
///
/// Returns `(profit_loss, profit_loss_percent)` where
/// `profit_loss = (current - buy) * shares` and
/// `profit_loss_percent = (current / buy - 1) * 100`.
/// A non-positive buy price yields a percent of 0. Results beyond the
/// `Decimal` range saturate.
pub fn compute_pnl(current_price: Decimal, buy_price: Decimal, shares: Decimal) -> (Decimal, f64) {
    let profit_loss = current_price.saturating_sub(buy_price).saturating_mul(shares);
    let profit_loss_percent = if buy_price > Decimal::ZERO {
        percent_change(current_price.checked_div(buy_price))
    } else {
        0.0
    };
    (profit_loss, profit_loss_percent)
}

/// Reject non-positive quantities and malformed dates before anything is looked up
pub fn validate_holding(input: &NewHolding) -> DashboardResult<()> {
    if input.symbol.trim().is_empty() {
        return Err(DashboardError::Validation("Symbol must not be empty".to_string()));
    }
    if input.shares <= Decimal::ZERO {
        return Err(DashboardError::Validation(format!(
            "Shares must be positive (got {})",
            input.shares
        )));
    }
    if input.buy_price <= Decimal::ZERO {
        return Err(DashboardError::Validation(format!(
            "Buy price must be positive (got {})",
            input.buy_price
        )));
    }
    match input.shares.checked_mul(input.buy_price) {
        Some(value) if value <= MAX_POSITION_VALUE => {}
        _ => {
            return Err(DashboardError::Validation(format!(
                "Position value {} x {} exceeds the limit of {}",
                input.shares, input.buy_price, MAX_POSITION_VALUE
            )))
        }
    }
    if NaiveDate::parse_from_str(&input.buy_date, "%Y-%m-%d").is_err() {
        return Err(DashboardError::Validation(format!(
            "Buy date must be YYYY-MM-DD (got {})",
            input.buy_date
        )));
    }
    Ok(())
}

/// Aggregate totals over a set of holdings. Totals saturate instead of overflowing.
pub fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    let mut total_investment = Decimal::ZERO;
    let mut current_value = Decimal::ZERO;

    for holding in holdings {
        total_investment = total_investment.saturating_add(holding.buy_price.saturating_mul(holding.shares));
        current_value = current_value.saturating_add(holding.current_price.saturating_mul(holding.shares));
    }

    let total_profit_loss = current_value.saturating_sub(total_investment);
    let total_profit_loss_percent = if total_investment > Decimal::ZERO {
        percent_change(current_value.checked_div(total_investment))
    } else {
        0.0
    };

    PortfolioSummary {
        total_holdings: holdings.len(),
        total_investment,
        current_value,
        total_profit_loss,
        total_profit_loss_percent,
        holdings: holdings.to_vec(),
    }
}

impl Holding {
    /// Price a new holding against the stock it references
    pub fn open(input: NewHolding, stock: &Stock) -> Self {
        let (profit_loss, profit_loss_percent) =
            compute_pnl(stock.price, input.buy_price, input.shares);
        Self {
            symbol: input.symbol,
            name: stock.name.clone(),
            shares: input.shares,
            buy_price: input.buy_price,
            buy_date: input.buy_date,
            current_price: stock.price,
            profit_loss,
            profit_loss_percent,
        }
    }

    /// Recompute the derived fields at a new price
    pub fn reprice(&mut self, current_price: Decimal) {
        let (profit_loss, profit_loss_percent) =
            compute_pnl(current_price, self.buy_price, self.shares);
        self.current_price = current_price;
        self.profit_loss = profit_loss;
        self.profit_loss_percent = profit_loss_percent;
    }

    /// Rebuild a holding from its stored row. Numeric columns hold exact decimal text.
    pub fn from_record(record: HoldingRecord) -> DashboardResult<Self> {
        let parse = |column: &str, raw: &str| {
            Decimal::from_str(raw.trim()).map_err(|e| {
                DashboardError::Storage(format!(
                    "Invalid {} '{}' for {}: {}",
                    column, raw, record.symbol, e
                ))
            })
        };
        let shares = parse("shares", &record.shares)?;
        let buy_price = parse("buy_price", &record.buy_price)?;
        let current_price = parse("last_price", &record.last_price)?;

        let (profit_loss, profit_loss_percent) = compute_pnl(current_price, buy_price, shares);
        Ok(Self {
            symbol: record.symbol,
            name: record.name,
            shares,
            buy_price,
            buy_date: record.buy_date,
            current_price,
            profit_loss,
            profit_loss_percent,
        })
    }
}

/// Ordered collection of holdings. Several entries may share a symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.holdings.iter().any(|h| h.symbol == symbol)
    }

    pub fn push(&mut self, holding: Holding) {
        self.holdings.push(holding);
    }

    /// Drop every holding for `symbol`. Returns how many were removed (0 is not an error).
    pub fn remove(&mut self, symbol: &str) -> usize {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.symbol != symbol);
        before - self.holdings.len()
    }

    pub fn clear(&mut self) {
        self.holdings.clear();
    }

    /// New portfolio with every holding repriced from `stocks`.
    /// Holdings whose stock is missing keep their last price.
    pub fn repriced(&self, stocks: &[Stock]) -> Portfolio {
        let prices: HashMap<&str, Decimal> =
            stocks.iter().map(|s| (s.symbol.as_str(), s.price)).collect();

        let holdings = self
            .holdings
            .iter()
            .map(|holding| {
                let mut updated = holding.clone();
                let price = prices
                    .get(holding.symbol.as_str())
                    .copied()
                    .unwrap_or(holding.current_price);
                updated.reprice(price);
                updated
            })
            .collect();

        Portfolio { holdings }
    }

    pub fn summary(&self) -> PortfolioSummary {
        summarize(&self.holdings)
    }
}
