//! Volatility-breakout analyst.
//!
//! Measures how far the last close sits from SMA20 in ATR units. Beyond
//! ±2 ATR the move is treated as a breakout in that direction; expanding
//! short-term ATR relative to the 14-bar ATR adds confidence.

use super::Agent;
use crate::domain::indicator::{atr, sma, DEFAULT_ATR_PERIOD, SLOW_SMA_PERIOD};
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::regime::RegimeAnalysis;
use crate::domain::signal::{AgentRole, AgentVote, Signal};

const MIN_BARS: usize = SLOW_SMA_PERIOD + 1;
const BREAKOUT_ATRS: f64 = 2.0;
const SHORT_ATR_PERIOD: usize = 5;

pub struct VolatilityAgent {
    id: String,
}

impl VolatilityAgent {
    pub fn new() -> Self {
        VolatilityAgent {
            id: "volatility".to_string(),
        }
    }
}

impl Default for VolatilityAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for VolatilityAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> AgentRole {
        AgentRole::Volatile
    }

    fn analyze(
        &self,
        history: &[PriceBar],
        _regime: Option<&RegimeAnalysis>,
        _headlines: &[String],
    ) -> AgentVote {
        if history.len() < MIN_BARS {
            return AgentVote::insufficient_data(&self.id, self.role(), history.len(), MIN_BARS);
        }

        let long_atr = atr(history, DEFAULT_ATR_PERIOD);
        if long_atr <= 0.0 {
            return AgentVote::hold(&self.id, self.role(), 0.0, "No measurable volatility");
        }
        let short_atr = atr(history, SHORT_ATR_PERIOD);
        let expansion = short_atr / long_atr;

        let closes = closes(history);
        let mid = sma(&closes, SLOW_SMA_PERIOD);
        let last = closes[closes.len() - 1];
        let distance = (last - mid) / long_atr;

        let expansion_bonus = ((expansion - 1.0) * 20.0).clamp(0.0, 15.0);
        let confidence = (40.0 + (distance.abs() - BREAKOUT_ATRS) * 8.0 + expansion_bonus).min(90.0);

        if distance > BREAKOUT_ATRS {
            AgentVote::new(
                &self.id,
                self.role(),
                Signal::Buy,
                confidence,
                format!(
                    "Upside breakout: {:.1} ATR above SMA20, ATR ratio {:.2}",
                    distance, expansion
                ),
            )
        } else if distance < -BREAKOUT_ATRS {
            AgentVote::new(
                &self.id,
                self.role(),
                Signal::Sell,
                confidence,
                format!(
                    "Downside breakout: {:.1} ATR below SMA20, ATR ratio {:.2}",
                    -distance, expansion
                ),
            )
        } else {
            AgentVote::hold(
                &self.id,
                self.role(),
                20.0,
                format!("Inside volatility envelope: {:+.1} ATR from SMA20", distance),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::test_support::*;

    #[test]
    fn steady_rally_is_upside_breakout() {
        let bars = bars_from_closes(&compounding(100.0, 0.01, 60));
        let vote = VolatilityAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.signal, Signal::Buy);
        assert!(vote.confidence >= 60.0, "confidence {}", vote.confidence);
    }

    #[test]
    fn steady_decline_is_downside_breakout() {
        let bars = bars_from_closes(&compounding(100.0, -0.01, 60));
        let vote = VolatilityAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.signal, Signal::Sell);
    }

    #[test]
    fn range_bound_market_holds() {
        let bars = bars_from_closes(&oscillating(100.0, 2.0, 60));
        let vote = VolatilityAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.signal, Signal::Hold);
    }

    #[test]
    fn zero_range_bars_hold_without_confidence() {
        let bars: Vec<PriceBar> = bars_from_closes(&[100.0; 30])
            .into_iter()
            .map(|mut b| {
                b.high = 100.0;
                b.low = 100.0;
                b
            })
            .collect();
        let vote = VolatilityAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.signal, Signal::Hold);
        assert_eq!(vote.confidence, 0.0);
    }

    #[test]
    fn short_history_holds() {
        let bars = bars_from_closes(&[100.0; 20]);
        let vote = VolatilityAgent::new().analyze(&bars, None, &[]);
        assert!(vote.reason.starts_with("Insufficient data"));
    }
}
