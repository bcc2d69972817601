use dashboard_core::{Recommendation, Startup, Stock};

const MARKET_REPLY: &str = "Current market trends show strong performance in technology and healthcare sectors, \
while energy and traditional retail are facing challenges. The Indian market is showing resilience despite \
global economic pressures, with domestic consumption driving growth.";

const PORTFOLIO_REPLY: &str = "Your portfolio tracks profit and loss against the latest refreshed prices. \
Add a holding with its buy price and date to see how it performs.";

const STOCKS_REPLY: &str = "Based on our analysis of Indian stocks, the IT and financial sectors are showing \
strong performance this quarter. Would you like specific information about any particular stock?";

const FALLBACK_REPLY: &str = "I can help you with information about Indian stocks, startups, market trends, \
and investment recommendations. Feel free to ask specific questions about any company, sector, or market conditions.";

const STARTUP_HINTS: &[&str] = &["startup", "agri", "health", "edu", "fintech", "energy"];

fn base_symbol(symbol: &str) -> String {
    symbol.split('.').next().unwrap_or(symbol).to_lowercase()
}

fn mentioned_stock<'a>(query: &str, stocks: &'a [Stock]) -> Option<&'a Stock> {
    stocks.iter().find(|s| {
        query.contains(&s.symbol.to_lowercase())
            || query.contains(&base_symbol(&s.symbol))
            || query.contains(&s.name.to_lowercase())
    })
}

fn mentioned_startup<'a>(query: &str, startups: &'a [Startup]) -> Option<&'a Startup> {
    startups.iter().find(|s| {
        query.contains(&s.name.to_lowercase()) || query.contains(&s.sector.to_lowercase())
    })
}

fn top_by_score<'a, T>(items: impl Iterator<Item = &'a T>, score: impl Fn(&T) -> f64) -> Option<&'a T>
where
    T: 'a,
{
    items.max_by(|a, b| score(a).total_cmp(&score(b)))
}

fn stock_reply(stock: &Stock) -> String {
    format!(
        "{} ({}) is currently trading at ₹{:.2}. It has {} by {:.2}% today. Based on our AI analysis, we {} this stock due to {}.",
        stock.name,
        stock.symbol,
        stock.price,
        if stock.change.is_sign_negative() { "decreased" } else { "increased" },
        stock.change_percent.abs(),
        stock.recommendation.as_str().to_uppercase(),
        stock.reason.to_lowercase()
    )
}

fn startup_reply(startup: &Startup) -> String {
    format!(
        "{} is a promising startup in the {} sector. {}. Our AI gives it a score of {:.1}/10 with a growth potential of {}%. We rate it {} because {}.",
        startup.name,
        startup.sector,
        startup.description,
        startup.ai_score,
        startup.growth_potential,
        startup.recommendation,
        startup.reason.to_lowercase()
    )
}

/// Keyword-driven reply to a chat message over the current collections
pub fn answer(query: &str, stocks: &[Stock], startups: &[Startup]) -> String {
    let query = query.trim().to_lowercase();

    if let Some(stock) = mentioned_stock(&query, stocks) {
        return stock_reply(stock);
    }
    if query.contains("stock") && !query.contains("recommend") {
        return STOCKS_REPLY.to_string();
    }

    if let Some(startup) = mentioned_startup(&query, startups) {
        return startup_reply(startup);
    }
    if STARTUP_HINTS.iter().any(|hint| query.contains(hint)) {
        return match top_by_score(startups.iter(), |s| s.ai_score) {
            Some(top) => format!(
                "The Indian startup ecosystem is thriving. Our top-rated startup right now is {} ({}, AI score {:.1}/10, {}% growth potential).",
                top.name, top.sector, top.ai_score, top.growth_potential
            ),
            None => "There are no startups tracked right now.".to_string(),
        };
    }

    if query.contains("market") || query.contains("trend") {
        return MARKET_REPLY.to_string();
    }
    if query.contains("portfolio") || query.contains("holding") {
        return PORTFOLIO_REPLY.to_string();
    }

    if query.contains("recommend") || query.contains("suggest") || query.contains("buy") {
        let buys = stocks.iter().filter(|s| s.recommendation == Recommendation::Buy);
        return match top_by_score(buys, |s| s.ai_score) {
            Some(top) => format!(
                "Based on our AI analysis, we recommend considering {} ({}) which is currently trading at ₹{:.2}. It has an AI score of {:.1}/10 due to {}. Always conduct your own research before making investment decisions.",
                top.name,
                top.symbol,
                top.price,
                top.ai_score,
                top.reason.to_lowercase()
            ),
            None => "None of the tracked stocks carry a buy rating right now.".to_string(),
        };
    }

    FALLBACK_REPLY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::seed::{sample_startups, sample_stocks};

    fn ask(query: &str) -> String {
        answer(query, &sample_stocks(), &sample_startups())
    }

    #[test]
    fn test_named_stock_reports_price() {
        let reply = ask("How is TCS doing?");
        assert!(reply.contains("TCS.NS"));
        assert!(reply.contains("3850.25"));

        let reply = ask("tell me about infosys");
        assert!(reply.contains("INFY.NS"));
    }

    #[test]
    fn test_startup_query_lists_top_by_score() {
        let reply = ask("any good startups?");
        assert!(reply.contains("HealthVision"));
    }

    #[test]
    fn test_startup_by_sector() {
        let reply = ask("what about education");
        assert!(reply.contains("EduLearn"));
    }

    #[test]
    fn test_recommendation_picks_best_buy() {
        let reply = ask("what do you recommend?");
        assert!(reply.contains("TCS.NS"), "{}", reply);
    }

    #[test]
    fn test_market_and_fallback() {
        assert_eq!(ask("market trend"), MARKET_REPLY);
        assert_eq!(ask("show my portfolio"), PORTFOLIO_REPLY);
        assert_eq!(ask("hello"), FALLBACK_REPLY);
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(
            answer("recommend something", &[], &[]),
            "None of the tracked stocks carry a buy rating right now."
        );
    }
}
