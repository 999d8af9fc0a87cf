//! Weighted consensus over agent votes, and the council that produces them.
//!
//! score = Σ(direction × confidence × weight) / Σ(weight), clamped to
//! [-100, 100]. A score beyond the deadband maps to BUY/SELL, anything else
//! (including exactly 0) is HOLD. Final confidence is |score|.

use crate::domain::agent::{
    Agent, ChairmanAgent, NewsSentimentAgent, ReversalAgent, TrendAgent, VolatilityAgent,
};
use crate::domain::ohlcv::PriceBar;
use crate::domain::regime::{classify, MarketRegime, RegimeAnalysis};
use crate::domain::signal::{AgentVote, ConsensusResult, Signal};
use serde::Serialize;

pub const DEFAULT_DEADBAND: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusAggregator {
    pub deadband: f64,
}

impl Default for ConsensusAggregator {
    fn default() -> Self {
        ConsensusAggregator {
            deadband: DEFAULT_DEADBAND,
        }
    }
}

impl ConsensusAggregator {
    /// Signed consensus score in [-100, 100]; 0 when there are no votes.
    pub fn score(&self, votes: &[AgentVote]) -> f64 {
        let total_weight: f64 = votes.iter().map(|v| v.role.weight()).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = votes
            .iter()
            .map(|v| v.signal.direction() * v.confidence * v.role.weight())
            .sum();
        (weighted / total_weight).clamp(-100.0, 100.0)
    }

    pub fn aggregate(&self, votes: &[AgentVote], regime: MarketRegime) -> ConsensusResult {
        let score = self.score(votes);
        let signal = if score > self.deadband {
            Signal::Buy
        } else if score < -self.deadband {
            Signal::Sell
        } else {
            Signal::Hold
        };

        let count = |s: Signal| votes.iter().filter(|v| v.signal == s).count();
        let mut reason = format!(
            "Score {:+.1} ({} BUY / {} SELL / {} HOLD)",
            score,
            count(Signal::Buy),
            count(Signal::Sell),
            count(Signal::Hold)
        );
        for vote in votes {
            reason.push_str(&format!("; {}: {} {:.0}", vote.role, vote.signal, vote.confidence));
        }

        ConsensusResult {
            signal,
            confidence: score.abs(),
            sentiment: signal.sentiment(),
            regime,
            reason,
        }
    }
}

/// Everything one analysis pass produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliberation {
    pub analysis: RegimeAnalysis,
    pub votes: Vec<AgentVote>,
    pub consensus: ConsensusResult,
}

/// The analyst pool, the chairman and the aggregator composed into one
/// decision pass. Holds no mutable state; one council can serve many threads.
pub struct Council {
    analysts: Vec<Box<dyn Agent>>,
    chairman: ChairmanAgent,
    aggregator: ConsensusAggregator,
}

impl Council {
    pub fn new(analysts: Vec<Box<dyn Agent>>, aggregator: ConsensusAggregator) -> Self {
        Council {
            analysts,
            chairman: ChairmanAgent::new(),
            aggregator,
        }
    }

    /// Trend, reversal and volatility analysts plus the chairman. Used by the
    /// backtests, where no headline history exists.
    pub fn technical() -> Self {
        Council::new(
            vec![
                Box::new(TrendAgent::new()),
                Box::new(ReversalAgent::new()),
                Box::new(VolatilityAgent::new()),
            ],
            ConsensusAggregator::default(),
        )
    }

    /// The technical council plus the news-sentiment analyst.
    pub fn with_news() -> Self {
        Council::new(
            vec![
                Box::new(TrendAgent::new()),
                Box::new(ReversalAgent::new()),
                Box::new(VolatilityAgent::new()),
                Box::new(NewsSentimentAgent::new()),
            ],
            ConsensusAggregator::default(),
        )
    }

    pub fn deliberate(&self, history: &[PriceBar], headlines: &[String]) -> Deliberation {
        let analysis = classify(history);
        let mut votes: Vec<AgentVote> = self
            .analysts
            .iter()
            .map(|agent| agent.analyze(history, Some(&analysis), headlines))
            .collect();
        votes.push(self.chairman.analyze(history, Some(&analysis), headlines));

        let consensus = self.aggregator.aggregate(&votes, analysis.regime);
        Deliberation {
            analysis,
            votes,
            consensus,
        }
    }

    pub fn analyze(&self, history: &[PriceBar], headlines: &[String]) -> ConsensusResult {
        self.deliberate(history, headlines).consensus
    }
}
