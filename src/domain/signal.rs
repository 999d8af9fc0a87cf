//! Votes and consensus results exchanged between agents, the council and
//! the execution layer.

use crate::domain::regime::MarketRegime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// BUY → +1, SELL → -1, HOLD → 0
    pub fn direction(self) -> f64 {
        match self {
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
            Signal::Hold => 0.0,
        }
    }

    /// BUY ↔ SELL; HOLD stays HOLD.
    pub fn opposite(self) -> Signal {
        match self {
            Signal::Buy => Signal::Sell,
            Signal::Sell => Signal::Buy,
            Signal::Hold => Signal::Hold,
        }
    }

    pub fn sentiment(self) -> Sentiment {
        match self {
            Signal::Buy => Sentiment::Bullish,
            Signal::Sell => Sentiment::Bearish,
            Signal::Hold => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn signal(self) -> Signal {
        match self {
            Sentiment::Bullish => Signal::Buy,
            Sentiment::Bearish => Signal::Sell,
            Sentiment::Neutral => Signal::Hold,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "BULLISH"),
            Sentiment::Bearish => write!(f, "BEARISH"),
            Sentiment::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentRole {
    Trend,
    Reversal,
    Volatile,
    News,
    Chairman,
}

impl AgentRole {
    /// Fixed consensus weight for votes cast under this role.
    pub fn weight(self) -> f64 {
        match self {
            AgentRole::Chairman => 2.0,
            AgentRole::Volatile => 1.5,
            AgentRole::Trend | AgentRole::Reversal | AgentRole::News => 1.0,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Trend => write!(f, "TREND"),
            AgentRole::Reversal => write!(f, "REVERSAL"),
            AgentRole::Volatile => write!(f, "VOLATILE"),
            AgentRole::News => write!(f, "NEWS"),
            AgentRole::Chairman => write!(f, "CHAIRMAN"),
        }
    }
}

/// One agent's opinion on one price history. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentVote {
    pub agent_id: String,
    pub role: AgentRole,
    pub signal: Signal,
    /// 0..=100
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub reason: String,
}

impl AgentVote {
    /// Builds a vote whose sentiment follows the signal, clamping confidence
    /// into 0..=100.
    pub fn new(
        agent_id: &str,
        role: AgentRole,
        signal: Signal,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        AgentVote {
            agent_id: agent_id.to_string(),
            role,
            signal,
            confidence: clamp_confidence(confidence),
            sentiment: signal.sentiment(),
            reason: reason.into(),
        }
    }

    pub fn hold(agent_id: &str, role: AgentRole, confidence: f64, reason: impl Into<String>) -> Self {
        AgentVote::new(agent_id, role, Signal::Hold, confidence, reason)
    }

    pub fn insufficient_data(agent_id: &str, role: AgentRole, have: usize, need: usize) -> Self {
        AgentVote::hold(
            agent_id,
            role,
            0.0,
            format!("Insufficient data: have {have} bars, need {need}"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub signal: Signal,
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub regime: MarketRegime,
    pub reason: String,
}

pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
