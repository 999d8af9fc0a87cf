//! The chairman's own opinion: the regime classifier's sentiment and
//! confidence. Aggregating the council's votes is a separate concern handled
//! by [`crate::domain::consensus::ConsensusAggregator`].

use super::{resolve_regime, Agent};
use crate::domain::ohlcv::PriceBar;
use crate::domain::regime::{RegimeAnalysis, MIN_REGIME_BARS};
use crate::domain::signal::{AgentRole, AgentVote};

pub struct ChairmanAgent {
    id: String,
}

impl ChairmanAgent {
    pub fn new() -> Self {
        ChairmanAgent {
            id: "chairman".to_string(),
        }
    }
}

impl Default for ChairmanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ChairmanAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> AgentRole {
        AgentRole::Chairman
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
        AgentVote::new(
            &self.id,
            self.role(),
            r.sentiment.signal(),
            r.confidence,
            format!(
                "Regime {} (RSI {:.1}, ADX {:.1}, trend {:+.2}%)",
                r.regime, r.rsi, r.adx, r.trend_strength
            ),
        )
    }
}
