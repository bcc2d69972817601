//! Sample data the dashboard starts from before any provider has been queried.

use rust_decimal_macros::dec;

use crate::{Recommendation, Startup, Stock};

pub fn sample_stocks() -> Vec<Stock> {
    vec![
        Stock {
            symbol: "TCS.NS".to_string(),
            name: "Tata Consultancy Services".to_string(),
            price: dec!(3850.25),
            change: dec!(42.75),
            change_percent: 1.12,
            recommendation: Recommendation::Buy,
            ai_score: 8.7,
            reason: "Strong IT service demand and cloud migration trends".to_string(),
        },
        Stock {
            symbol: "RELIANCE.NS".to_string(),
            name: "Reliance Industries".to_string(),
            price: dec!(2756.80),
            change: dec!(-15.20),
            change_percent: -0.55,
            recommendation: Recommendation::Hold,
            ai_score: 7.5,
            reason: "Oil price volatility affecting short-term outlook".to_string(),
        },
        Stock {
            symbol: "HDFCBANK.NS".to_string(),
            name: "HDFC Bank".to_string(),
            price: dec!(1678.45),
            change: dec!(22.30),
            change_percent: 1.35,
            recommendation: Recommendation::Buy,
            ai_score: 8.2,
            reason: "Strong credit growth and improving asset quality".to_string(),
        },
        Stock {
            symbol: "INFY.NS".to_string(),
            name: "Infosys".to_string(),
            price: dec!(1456.70),
            change: dec!(-8.30),
            change_percent: -0.57,
            recommendation: Recommendation::Hold,
            ai_score: 7.8,
            reason: "Margin pressure despite strong deal pipeline".to_string(),
        },
        Stock {
            symbol: "BAJFINANCE.NS".to_string(),
            name: "Bajaj Finance".to_string(),
            price: dec!(7245.60),
            change: dec!(125.40),
            change_percent: 1.76,
            recommendation: Recommendation::Buy,
            ai_score: 8.5,
            reason: "Digital transformation driving customer acquisition".to_string(),
        },
    ]
}

pub fn sample_startups() -> Vec<Startup> {
    let startup = |id: &str,
                   name: &str,
                   sector: &str,
                   description: &str,
                   ai_score: f64,
                   growth_potential: f64,
                   recommendation: &str,
                   reason: &str| Startup {
        id: id.to_string(),
        name: name.to_string(),
        sector: sector.to_string(),
        description: description.to_string(),
        ai_score,
        growth_potential,
        recommendation: recommendation.to_string(),
        reason: reason.to_string(),
    };

    vec![
        startup(
            "1",
            "AgriTech Solutions",
            "Agriculture",
            "AI-powered crop monitoring and yield optimization",
            8.9,
            85.0,
            "Strong Buy",
            "Addressing critical food security needs with scalable technology",
        ),
        startup(
            "2",
            "HealthVision",
            "Healthcare",
            "Remote diagnostic platform for rural healthcare",
            9.2,
            92.0,
            "Strong Buy",
            "Solving accessibility issues in healthcare with proven technology",
        ),
        startup(
            "3",
            "EduLearn",
            "Education",
            "Personalized learning platform with AI tutoring",
            7.8,
            75.0,
            "Buy",
            "Growing edtech market but facing competition",
        ),
        startup(
            "4",
            "FinSecure",
            "Fintech",
            "Blockchain-based payment security for rural banks",
            8.4,
            80.0,
            "Buy",
            "Strong product-market fit with regulatory tailwinds",
        ),
        startup(
            "5",
            "CleanEnergy",
            "Renewable Energy",
            "Affordable solar solutions for residential use",
            9.0,
            88.0,
            "Strong Buy",
            "Aligned with government initiatives and growing demand",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_keys_are_unique() {
        let stocks = sample_stocks();
        let symbols: HashSet<_> = stocks.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols.len(), stocks.len());

        let startups = sample_startups();
        let ids: HashSet<_> = startups.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), startups.len());
    }

    #[test]
    fn test_seed_scores_in_range() {
        for stock in sample_stocks() {
            assert!((0.0..=10.0).contains(&stock.ai_score), "{}", stock.symbol);
        }
        for startup in sample_startups() {
            assert!((0.0..=10.0).contains(&startup.ai_score), "{}", startup.name);
        }
    }
}
