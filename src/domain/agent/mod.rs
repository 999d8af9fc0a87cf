//! Analyst agents.
//!
//! Every agent scores the same price history independently and returns an
//! [`AgentVote`]. Agents never fail: short histories produce a HOLD vote with
//! zero confidence and an "Insufficient data" reason.

pub mod chairman;
pub mod news;
pub mod reversal;
pub mod trend;
pub mod volatility;

pub use chairman::ChairmanAgent;
pub use news::NewsSentimentAgent;
pub use reversal::ReversalAgent;
pub use trend::TrendAgent;
pub use volatility::VolatilityAgent;

use crate::domain::ohlcv::PriceBar;
use crate::domain::regime::{classify, RegimeAnalysis};
use crate::domain::signal::{AgentRole, AgentVote};

pub trait Agent: Send + Sync {
    fn id(&self) -> &str;

    fn role(&self) -> AgentRole;

    /// Scores `history` (ascending, most recent bar last). `regime` is the
    /// caller's classification of the same history when one is available;
    /// `headlines` is auxiliary news text, possibly empty.
    fn analyze(
        &self,
        history: &[PriceBar],
        regime: Option<&RegimeAnalysis>,
        headlines: &[String],
    ) -> AgentVote;
}

/// Uses the caller's classification when given, otherwise classifies `history`.
pub(crate) fn resolve_regime(history: &[PriceBar], regime: Option<&RegimeAnalysis>) -> RegimeAnalysis {
    match regime {
        Some(r) => *r,
        None => classify(history),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ohlcv::PriceBar;
    use chrono::NaiveDate;

    /// Bars opening at the previous close, with a small wick around the body.
    pub fn bars_from_closes(values: &[f64]) -> Vec<PriceBar> {
        let mut prev = values.first().copied().unwrap_or(0.0);
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let open = prev;
                prev = c;
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(c) * 1.002,
                    low: open.min(c) * 0.998,
                    close: c,
                    volume: None,
                }
            })
            .collect()
    }

    pub fn compounding(start: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start * (1.0 + rate).powi(i as i32)).collect()
    }

    pub fn oscillating(center: f64, amplitude: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| center + amplitude * ((i as f64) * 0.7).sin())
            .collect()
    }
}
