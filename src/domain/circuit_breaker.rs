//! Pre-trade risk gate.
//!
//! Three checks run in order and the first failure wins: daily loss,
//! per-symbol cooldown, then (BUY only) maximum exposure. The gate holds no
//! state of its own and never fails; configuration and the clock are passed
//! in by the caller.

use crate::domain::ledger::Portfolio;
use crate::domain::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreakerConfig {
    pub max_daily_loss_percent: f64,
    pub cooldown_ms: i64,
    pub max_position_size_percent: f64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        CircuitBreakerConfig {
            max_daily_loss_percent: 5.0,
            cooldown_ms: 60_000,
            max_position_size_percent: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub symbol: String,
    pub side: Signal,
    pub quantity: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggeredRule {
    DailyLoss,
    Cooldown,
    MaxExposure,
}

impl fmt::Display for TriggeredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggeredRule::DailyLoss => write!(f, "DAILY_LOSS"),
            TriggeredRule::Cooldown => write!(f, "COOLDOWN"),
            TriggeredRule::MaxExposure => write!(f, "MAX_EXPOSURE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeVerdict {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_rule: Option<TriggeredRule>,
}

impl TradeVerdict {
    pub fn allow() -> Self {
        TradeVerdict {
            allowed: true,
            reason: None,
            triggered_rule: None,
        }
    }

    pub fn deny(rule: TriggeredRule, reason: String) -> Self {
        TradeVerdict {
            allowed: false,
            reason: Some(reason),
            triggered_rule: Some(rule),
        }
    }
}

pub fn check_trade(
    portfolio: &Portfolio,
    request: &TradeRequest,
    config: &CircuitBreakerConfig,
    now: DateTime<Utc>,
) -> TradeVerdict {
    let verdict = check_daily_loss(portfolio, config)
        .or_else(|| check_cooldown(portfolio, request, config, now))
        .or_else(|| check_exposure(portfolio, request, config))
        .unwrap_or_else(TradeVerdict::allow);

    if let (Some(rule), Some(reason)) = (verdict.triggered_rule, verdict.reason.as_deref()) {
        info!(
            symbol = %request.symbol,
            side = %request.side,
            rule = %rule,
            reason,
            "trade denied by circuit breaker"
        );
    }
    verdict
}

fn check_daily_loss(portfolio: &Portfolio, config: &CircuitBreakerConfig) -> Option<TradeVerdict> {
    let baseline = portfolio
        .daily_start_equity
        .or(portfolio.initial_balance)
        .unwrap_or(portfolio.equity);
    if baseline <= 0.0 || !baseline.is_finite() {
        return None;
    }

    let loss_percent = (baseline - portfolio.equity) * 100.0 / baseline;
    if loss_percent > config.max_daily_loss_percent {
        return Some(TradeVerdict::deny(
            TriggeredRule::DailyLoss,
            format!(
                "Daily loss {:.2}% exceeds limit of {}%",
                loss_percent, config.max_daily_loss_percent
            ),
        ));
    }
    None
}

fn check_cooldown(
    portfolio: &Portfolio,
    request: &TradeRequest,
    config: &CircuitBreakerConfig,
    now: DateTime<Utc>,
) -> Option<TradeVerdict> {
    let last = portfolio.last_trade(&request.symbol)?;
    let elapsed_ms = (now - last.timestamp).num_milliseconds();
    if elapsed_ms < config.cooldown_ms {
        let remaining = config.cooldown_ms - elapsed_ms.max(0);
        return Some(TradeVerdict::deny(
            TriggeredRule::Cooldown,
            format!(
                "Cooldown active for {}: {}s remaining",
                request.symbol,
                (remaining + 999) / 1000
            ),
        ));
    }
    None
}

fn check_exposure(
    portfolio: &Portfolio,
    request: &TradeRequest,
    config: &CircuitBreakerConfig,
) -> Option<TradeVerdict> {
    if request.side != Signal::Buy {
        return None;
    }
    let existing = portfolio
        .position(&request.symbol)
        .map(|p| p.market_value(request.price))
        .unwrap_or(0.0);
    let cost = request.quantity * request.price;

    if portfolio.equity <= 0.0 {
        return Some(TradeVerdict::deny(
            TriggeredRule::MaxExposure,
            format!("No equity available to size {} position", request.symbol),
        ));
    }

    let exposure_percent = (existing + cost) * 100.0 / portfolio.equity;
    if exposure_percent > config.max_position_size_percent {
        return Some(TradeVerdict::deny(
            TriggeredRule::MaxExposure,
            format!(
                "Position in {} would be {:.2}% of equity, limit {}%",
                request.symbol, exposure_percent, config.max_position_size_percent
            ),
        ));
    }
    None
}
