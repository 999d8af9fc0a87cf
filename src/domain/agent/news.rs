//! Headline keyword sentiment.
//!
//! Each headline scores (positive keyword hits - negative keyword hits); the
//! net over all headlines picks the direction and its magnitude the
//! confidence (20 points per net hit, capped at 100).

use super::Agent;
use crate::domain::ohlcv::PriceBar;
use crate::domain::regime::RegimeAnalysis;
use crate::domain::signal::{AgentRole, AgentVote, Signal};

const CONFIDENCE_PER_POINT: f64 = 20.0;

const POSITIVE_KEYWORDS: &[&str] = &[
    "beat", "beats", "boom", "breakthrough", "bullish", "buy", "gain", "gains", "growth",
    "jump", "jumps", "outperform", "profit", "rally", "record", "rise", "rises", "soar",
    "soars", "strong", "surge", "surges", "upgrade", "upgraded",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bearish", "crash", "cut", "cuts", "decline", "declines", "downgrade", "downgraded",
    "drop", "drops", "fall", "falls", "fraud", "investigation", "lawsuit", "loss", "losses",
    "miss", "misses", "plunge", "plunges", "recall", "sell", "slump", "weak",
];

pub struct NewsSentimentAgent {
    id: String,
}

impl NewsSentimentAgent {
    pub fn new() -> Self {
        NewsSentimentAgent {
            id: "news".to_string(),
        }
    }

    /// Positive minus negative keyword hits in one headline.
    pub fn score_headline(headline: &str) -> i64 {
        headline
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .map(|w| {
                if POSITIVE_KEYWORDS.contains(&w.as_str()) {
                    1
                } else if NEGATIVE_KEYWORDS.contains(&w.as_str()) {
                    -1
                } else {
                    0
                }
            })
            .sum()
    }
}

impl Default for NewsSentimentAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for NewsSentimentAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> AgentRole {
        AgentRole::News
    }

    fn analyze(
        &self,
        _history: &[PriceBar],
        _regime: Option<&RegimeAnalysis>,
        headlines: &[String],
    ) -> AgentVote {
        if headlines.is_empty() {
            return AgentVote::hold(&self.id, self.role(), 0.0, "No headlines");
        }

        let net: i64 = headlines.iter().map(|h| Self::score_headline(h)).sum();
        let confidence = (net.unsigned_abs() as f64 * CONFIDENCE_PER_POINT).min(100.0);
        let reason = format!("Net keyword score {net:+} across {} headlines", headlines.len());

        match net.signum() {
            1 => AgentVote::new(&self.id, self.role(), Signal::Buy, confidence, reason),
            -1 => AgentVote::new(&self.id, self.role(), Signal::Sell, confidence, reason),
            _ => AgentVote::hold(&self.id, self.role(), 0.0, reason),
        }
    }
}
