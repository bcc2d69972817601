use dashboard_core::Headline;
use std::collections::{HashMap, HashSet};

const POSITIVE_WORDS: &[&str] = &[
    "bullish", "rally", "surge", "gain", "profit", "growth", "beat", "upgrade",
    "outperform", "strong", "positive", "rise", "increase", "breakthrough",
    "innovation", "success", "exceed", "momentum", "buy", "recommend",
    "optimistic", "record", "high", "advance", "steady", "dividend", "buyback",
    "upside", "recovery", "rebound", "expansion", "robust", "raise", "demand",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bearish", "decline", "loss", "fall", "plunge", "crash", "miss", "downgrade",
    "underperform", "weak", "negative", "drop", "decrease", "concern", "risk",
    "fail", "disappoint", "slump", "sell", "warning", "pessimistic", "low",
    "retreat", "fear", "trouble", "slip", "weigh", "headwind", "lawsuit",
    "probe", "default", "layoff", "downside", "overvalued", "bubble", "booking",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "won't", "hardly", "barely", "without",
];

const NEGATION_WINDOW: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "on", "in", "to", "for", "as", "at",
    "by", "with", "after", "ahead", "into", "over", "its", "is", "are", "new",
    "from", "could", "sees", "amid", "citing",
];

/// Headline topic buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Earnings,
    MergersAcq,
    Regulatory,
    AnalystAction,
    Management,
    Product,
    Macro,
    General,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Earnings => "Quarterly Earnings",
            EventKind::MergersAcq => "Mergers & Acquisitions",
            EventKind::Regulatory => "Regulatory Changes",
            EventKind::AnalystAction => "Analyst Ratings",
            EventKind::Management => "Leadership Changes",
            EventKind::Product => "Market Expansion",
            EventKind::Macro => "Economic Outlook",
            EventKind::General => "General News",
        }
    }
}

pub fn classify_event(title: &str, description: Option<&str>) -> EventKind {
    let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();

    if text.contains("earnings") || text.contains("quarterly") || text.contains("guidance")
        || text.contains("revenue") || text.contains("profit") {
        EventKind::Earnings
    } else if text.contains("acqui") || text.contains("merger") || text.contains("buyout")
        || text.contains("takeover") {
        EventKind::MergersAcq
    } else if text.contains("sebi") || text.contains("regulat") || text.contains("approval")
        || text.contains("compliance") {
        EventKind::Regulatory
    } else if text.contains("upgrade") || text.contains("downgrade") || text.contains("price target")
        || text.contains("analyst") || text.contains("brokerage") || text.contains("rating") {
        EventKind::AnalystAction
    } else if text.contains("ceo") || text.contains("management") || text.contains("board")
        || text.contains("appoint") {
        EventKind::Management
    } else if text.contains("launch") || text.contains("product") || text.contains("expansion")
        || text.contains("roadmap") {
        EventKind::Product
    } else if text.contains("rbi") || text.contains("policy") || text.contains("interest rate")
        || text.contains("inflation") || text.contains("gdp") {
        EventKind::Macro
    } else {
        EventKind::General
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?' | ':' | '"'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Net lexicon hits for a piece of text. Positive and negative words flip
/// when a negation appears within [`NEGATION_WINDOW`] words before them.
pub fn score_text(text: &str) -> i32 {
    let words = tokenize(text);
    let positive: HashSet<&str> = POSITIVE_WORDS.iter().copied().collect();
    let negative: HashSet<&str> = NEGATIVE_WORDS.iter().copied().collect();
    let negation: HashSet<&str> = NEGATION_WORDS.iter().copied().collect();

    let negation_positions: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| negation.contains(w.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut score = 0;
    for (i, word) in words.iter().enumerate() {
        let is_positive = positive.contains(word.as_str());
        let is_negative = negative.contains(word.as_str());
        if !is_positive && !is_negative {
            continue;
        }

        let negated = negation_positions
            .iter()
            .any(|&pos| pos < i && i - pos <= NEGATION_WINDOW);

        score += match (is_positive, negated) {
            (true, false) | (false, true) => 1,
            _ => -1,
        };
    }
    score
}

/// Counts of positive, negative and neutral headlines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

pub fn tally(headlines: &[Headline]) -> Tally {
    let mut tally = Tally::default();
    for headline in headlines {
        let mut score = score_text(&headline.title) * 2;
        if let Some(desc) = &headline.description {
            score += score_text(desc);
        }
        match score.signum() {
            1 => tally.positive += 1,
            -1 => tally.negative += 1,
            _ => tally.neutral += 1,
        }
    }
    tally
}

/// Most frequent non-trivial words across the headlines
pub fn keywords(headlines: &[Headline], symbol: &str, limit: usize) -> Vec<String> {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let symbol = symbol.to_lowercase();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for headline in headlines {
        for word in tokenize(&headline.title) {
            if word.len() < 4 || stop.contains(word.as_str()) || word == symbol {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}
