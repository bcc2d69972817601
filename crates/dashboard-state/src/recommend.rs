use dashboard_core::{Recommendation, Startup, Stock};
use serde::Serialize;

/// Most items any recommended view returns
pub const RECOMMENDED_CAP: usize = 3;

/// Startup label that qualifies for the recommended view
pub const STRONG_BUY: &str = "Strong Buy";

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub stocks: Vec<Stock>,
    pub startups: Vec<Startup>,
}

/// Buy-rated stocks in collection order, capped
pub fn recommended_stocks(stocks: &[Stock]) -> Vec<Stock> {
    stocks
        .iter()
        .filter(|s| s.recommendation == Recommendation::Buy)
        .take(RECOMMENDED_CAP)
        .cloned()
        .collect()
}

/// "Strong Buy" startups in collection order, capped
pub fn recommended_startups(startups: &[Startup]) -> Vec<Startup> {
    startups
        .iter()
        .filter(|s| s.recommendation == STRONG_BUY)
        .take(RECOMMENDED_CAP)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on symbol or name. A blank query matches everything.
pub fn search_stocks(stocks: &[Stock], query: &str) -> Vec<Stock> {
    let query = query.trim().to_lowercase();
    stocks
        .iter()
        .filter(|s| {
            query.is_empty()
                || s.symbol.to_lowercase().contains(&query)
                || s.name.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
