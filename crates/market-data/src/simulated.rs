use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::{DashboardError, MarketDataProvider, Quote, Stock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::*;
use std::sync::Mutex;
use std::time::Duration;

/// Market-data stand-in that nudges each price by a bounded random percentage.
pub struct SimulatedMarket {
    latency: Duration,
    max_move: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedMarket {
    /// Price moves are drawn from `[-2%, +2%)`
    pub const DEFAULT_MAX_MOVE: f64 = 0.02;

    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            max_move: Self::DEFAULT_MAX_MOVE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for reproducible runs
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            max_move: Self::DEFAULT_MAX_MOVE,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn with_max_move(mut self, max_move: f64) -> Self {
        self.max_move = max_move.abs();
        self
    }

    fn perturb(&self, stocks: &[Stock]) -> Result<Vec<Quote>, DashboardError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DashboardError::Provider("simulated market rng poisoned".to_string()))?;
        let now = Utc::now();

        Ok(stocks
            .iter()
            .map(|stock| {
                let factor = if self.max_move > 0.0 {
                    1.0 + rng.gen_range(-self.max_move..self.max_move)
                } else {
                    1.0
                };
                let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ONE);
                let change = Decimal::from_f64(rng.gen_range(-10.0..10.0))
                    .unwrap_or_default()
                    .round_dp(2);
                let change_percent = (rng.gen_range(-1.0..1.0_f64) * 100.0).round() / 100.0;

                Quote {
                    symbol: stock.symbol.clone(),
                    price: (stock.price * factor).round_dp(2),
                    change,
                    change_percent,
                    timestamp: now,
                }
            })
            .collect())
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedMarket {
    async fn fetch_quotes(&self, stocks: &[Stock]) -> Result<Vec<Quote>, DashboardError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let quotes = self.perturb(stocks)?;
        tracing::debug!("Simulated {} quotes", quotes.len());
        Ok(quotes)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
