//! Trend-following analyst: rides the 5/20 SMA direction, scaled by ADX.

use super::{resolve_regime, Agent};
use crate::domain::ohlcv::PriceBar;
use crate::domain::regime::{RegimeAnalysis, MIN_REGIME_BARS};
use crate::domain::signal::{AgentRole, AgentVote, Signal};

const STRONG_ADX: f64 = 25.0;
const WEAK_FOLLOW_STRENGTH: f64 = 1.0;

pub struct TrendAgent {
    id: String,
}

impl TrendAgent {
    pub fn new() -> Self {
        TrendAgent {
            id: "trend".to_string(),
        }
    }
}

impl Default for TrendAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for TrendAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> AgentRole {
        AgentRole::Trend
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
        let strength = r.trend_strength;
        let direction = if strength > 0.0 {
            Signal::Buy
        } else if strength < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        };

        if direction != Signal::Hold && r.adx > STRONG_ADX {
            let confidence = (50.0 + (r.adx - STRONG_ADX) + strength.abs() * 2.0).min(95.0);
            return AgentVote::new(
                &self.id,
                self.role(),
                direction,
                confidence,
                format!(
                    "Strong trend: ADX {:.1}, SMA5/SMA20 spread {:+.2}%",
                    r.adx, strength
                ),
            );
        }

        if direction != Signal::Hold && strength.abs() > WEAK_FOLLOW_STRENGTH {
            let confidence = (30.0 + strength.abs() * 5.0).min(60.0);
            return AgentVote::new(
                &self.id,
                self.role(),
                direction,
                confidence,
                format!(
                    "Developing trend: ADX {:.1}, SMA5/SMA20 spread {:+.2}%",
                    r.adx, strength
                ),
            );
        }

        AgentVote::hold(
            &self.id,
            self.role(),
            30.0,
            format!("No clear trend: ADX {:.1}, spread {:+.2}%", r.adx, strength),
        )
    }
}
