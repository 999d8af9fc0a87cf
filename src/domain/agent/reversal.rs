//! Mean-reversion analyst: fades RSI extremes and 2σ stretches from SMA20,
//! standing aside while the regime is a strong trend.

use super::{resolve_regime, Agent};
use crate::domain::indicator::{sma, stddev, SLOW_SMA_PERIOD};
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::regime::{RegimeAnalysis, MIN_REGIME_BARS};
use crate::domain::signal::{AgentRole, AgentVote, Signal};

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;
const BAND_WIDTH: f64 = 2.0;

pub struct ReversalAgent {
    id: String,
}

impl ReversalAgent {
    pub fn new() -> Self {
        ReversalAgent {
            id: "reversal".to_string(),
        }
    }
}

impl Default for ReversalAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ReversalAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> AgentRole {
        AgentRole::Reversal
    }

    fn analyze(
        &self,
        history: &[PriceBar],
        regime: Option<&RegimeAnalysis>,
        _headlines: &[String],
    ) -> AgentVote {
        if history.len() < MIN_REGIME_BARS {
            return AgentVote::insufficient_data(&self.id, self.role(), history.len(), MIN_REGIME_BARS);
        }

        let r = resolve_regime(history, regime);
        if r.regime.is_trending() {
            return AgentVote::hold(
                &self.id,
                self.role(),
                20.0,
                format!("{} too strong to fade (RSI {:.1})", r.regime, r.rsi),
            );
        }

        if r.rsi > OVERBOUGHT {
            return AgentVote::new(
                &self.id,
                self.role(),
                Signal::Sell,
                (50.0 + (r.rsi - OVERBOUGHT) * 2.0).min(90.0),
                format!("Overbought: RSI {:.1}", r.rsi),
            );
        }
        if r.rsi < OVERSOLD {
            return AgentVote::new(
                &self.id,
                self.role(),
                Signal::Buy,
                (50.0 + (OVERSOLD - r.rsi) * 2.0).min(90.0),
                format!("Oversold: RSI {:.1}", r.rsi),
            );
        }

        let closes = closes(history);
        let mid = sma(&closes, SLOW_SMA_PERIOD);
        let sigma = stddev(&closes, SLOW_SMA_PERIOD);
        let last = closes[closes.len() - 1];
        if sigma > 0.0 {
            let z = (last - mid) / sigma;
            if z > BAND_WIDTH {
                return AgentVote::new(
                    &self.id,
                    self.role(),
                    Signal::Sell,
                    (40.0 + (z - BAND_WIDTH) * 15.0).min(70.0),
                    format!("Stretched above upper band: z {:.2}", z),
                );
            }
            if z < -BAND_WIDTH {
                return AgentVote::new(
                    &self.id,
                    self.role(),
                    Signal::Buy,
                    (40.0 + (-z - BAND_WIDTH) * 15.0).min(70.0),
                    format!("Stretched below lower band: z {:.2}", z),
                );
            }
        }

        AgentVote::hold(
            &self.id,
            self.role(),
            10.0,
            format!("No extreme: RSI {:.1}", r.rsi),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::test_support::*;
    use crate::domain::regime::{MarketRegime, RegimeAnalysis};
    use crate::domain::signal::Sentiment;

    fn sideways_regime(rsi: f64) -> RegimeAnalysis {
        RegimeAnalysis {
            rsi,
            adx: 15.0,
            regime: MarketRegime::Sideways,
            ..RegimeAnalysis::neutral()
        }
    }

    #[test]
    fn stands_aside_in_strong_trend() {
        let bars = bars_from_closes(&compounding(100.0, 0.01, 60));
        let vote = ReversalAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.signal, Signal::Hold);
        assert!(vote.reason.contains("BULL_TREND"));
    }

    #[test]
    fn overbought_sells() {
        let bars = bars_from_closes(&oscillating(100.0, 2.0, 40));
        let vote = ReversalAgent::new().analyze(&bars, Some(&sideways_regime(85.0)), &[]);
        assert_eq!(vote.signal, Signal::Sell);
        assert_eq!(vote.sentiment, Sentiment::Bearish);
        assert!((vote.confidence - 80.0).abs() < 1e-9);
    }

    #[test]
    fn oversold_buys() {
        let bars = bars_from_closes(&oscillating(100.0, 2.0, 40));
        let vote = ReversalAgent::new().analyze(&bars, Some(&sideways_regime(10.0)), &[]);
        assert_eq!(vote.signal, Signal::Buy);
        assert!((vote.confidence - 90.0).abs() < 1e-9);
    }

    #[test]
    fn band_stretch_without_rsi_extreme() {
        let mut closes = vec![100.0; 30];
        closes.push(95.0);
        let bars = bars_from_closes(&closes);
        let vote = ReversalAgent::new().analyze(&bars, Some(&sideways_regime(50.0)), &[]);
        assert_eq!(vote.signal, Signal::Buy);
        assert!(vote.reason.contains("lower band"));
    }

    #[test]
    fn short_history_holds() {
        let bars = bars_from_closes(&[100.0; 5]);
        let vote = ReversalAgent::new().analyze(&bars, None, &[]);
        assert_eq!(vote.confidence, 0.0);
    }
}
