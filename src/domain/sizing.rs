//! Order sizing bounded by risk rules, and the limit price to submit it at.

use crate::domain::signal::{clamp_confidence, Sentiment, Signal};
use serde::{Deserialize, Serialize};

/// Offset applied at zero confidence, as a fraction of the reference price.
pub const MIN_LIMIT_OFFSET: f64 = 0.0005;
/// Hard ceiling on the offset at full confidence.
pub const MAX_LIMIT_OFFSET: f64 = 0.002;

/// Caller-supplied risk budget for one decision. Percentages are in percent
/// units (2.0 means 2%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskParameters {
    pub account_equity: f64,
    pub risk_per_trade_percent: f64,
    pub max_position_size_percent: f64,
    /// Cash the order may spend; defaults to `account_equity` when absent.
    #[serde(default)]
    pub available_cash: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub price: f64,
    pub signal: Signal,
    pub confidence: f64,
    pub sentiment: Sentiment,
}

/// Whole-share quantity for `setup` under `risk`:
/// floor(min(equity × risk%, equity × max%) / price), never more than the
/// available cash buys. Zero for a non-positive price or budget.
pub fn calculate_position_size(setup: &TradeSetup, risk: &RiskParameters) -> u64 {
    if setup.price <= 0.0 || !setup.price.is_finite() {
        return 0;
    }
    let risk_cap = risk.account_equity * risk.risk_per_trade_percent / 100.0;
    let exposure_cap = risk.account_equity * risk.max_position_size_percent / 100.0;
    let budget = risk_cap.min(exposure_cap);
    if budget <= 0.0 || !budget.is_finite() {
        return 0;
    }

    let by_budget = (budget / setup.price).floor();
    let cash = risk.available_cash.unwrap_or(risk.account_equity).max(0.0);
    let by_cash = (cash / setup.price).floor();
    by_budget.min(by_cash).max(0.0) as u64
}

/// Limit price offset from `setup.price` in the trade's direction: BUY bids
/// above, SELL offers below, HOLD returns the reference price. The offset
/// grows linearly with confidence from [`MIN_LIMIT_OFFSET`] to
/// [`MAX_LIMIT_OFFSET`]; a sentiment that contradicts the side falls back to
/// the minimum offset.
pub fn calculate_limit_price(setup: &TradeSetup) -> f64 {
    let direction = setup.signal.direction();
    if direction == 0.0 {
        return setup.price;
    }
    let offset = if setup.sentiment.signal() == setup.signal.opposite() {
        MIN_LIMIT_OFFSET
    } else {
        let span = MAX_LIMIT_OFFSET - MIN_LIMIT_OFFSET;
        MIN_LIMIT_OFFSET + span * clamp_confidence(setup.confidence) / 100.0
    };
    setup.price * (1.0 + direction * offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup(price: f64, signal: Signal, confidence: f64) -> TradeSetup {
        TradeSetup {
            price,
            signal,
            confidence,
            sentiment: signal.sentiment(),
        }
    }

    fn risk(equity: f64, risk_pct: f64, max_pct: f64) -> RiskParameters {
        RiskParameters {
            account_equity: equity,
            risk_per_trade_percent: risk_pct,
            max_position_size_percent: max_pct,
            available_cash: None,
        }
    }

    #[test]
    fn risk_cap_binds() {
        // min(200, 1000) / 15 = 13.33 → 13
        let qty = calculate_position_size(&setup(15.0, Signal::Buy, 80.0), &risk(10_000.0, 2.0, 10.0));
        assert_eq!(qty, 13);
    }

    #[test]
    fn exposure_cap_binds() {
        // min(5000, 1000) / 100 = 10
        let qty = calculate_position_size(&setup(100.0, Signal::Buy, 80.0), &risk(10_000.0, 50.0, 10.0));
        assert_eq!(qty, 10);
    }

    #[test]
    fn cash_bounds_quantity() {
        let mut r = risk(10_000.0, 50.0, 50.0);
        r.available_cash = Some(250.0);
        let qty = calculate_position_size(&setup(100.0, Signal::Buy, 80.0), &r);
        assert_eq!(qty, 2);
    }

    #[test]
    fn degenerate_inputs_size_zero() {
        assert_eq!(calculate_position_size(&setup(0.0, Signal::Buy, 80.0), &risk(10_000.0, 2.0, 10.0)), 0);
        assert_eq!(calculate_position_size(&setup(-5.0, Signal::Buy, 80.0), &risk(10_000.0, 2.0, 10.0)), 0);
        assert_eq!(calculate_position_size(&setup(50.0, Signal::Buy, 80.0), &risk(-100.0, 2.0, 10.0)), 0);
        assert_eq!(calculate_position_size(&setup(500.0, Signal::Buy, 80.0), &risk(10_000.0, 2.0, 10.0)), 0);
    }

    #[test]
    fn limit_price_direction() {
        let buy = calculate_limit_price(&setup(100.0, Signal::Buy, 50.0));
        let sell = calculate_limit_price(&setup(100.0, Signal::Sell, 50.0));
        assert!(buy > 100.0);
        assert!(sell < 100.0);
        assert_eq!(calculate_limit_price(&setup(100.0, Signal::Hold, 90.0)), 100.0);
    }

    #[test]
    fn limit_price_monotonic_and_bounded() {
        let mut prev = 100.0;
        for conf in [0.0, 10.0, 25.0, 50.0, 75.0, 100.0, 150.0] {
            let p = calculate_limit_price(&setup(100.0, Signal::Buy, conf));
            assert!(p >= prev);
            assert!(p <= 100.0 * (1.0 + MAX_LIMIT_OFFSET) + 1e-9);
            prev = p;
        }
        assert_relative_eq!(calculate_limit_price(&setup(100.0, Signal::Buy, 100.0)), 100.2);
        assert_relative_eq!(calculate_limit_price(&setup(100.0, Signal::Sell, 0.0)), 99.95);
    }

    #[test]
    fn contradicting_sentiment_uses_minimum_offset() {
        let s = TradeSetup {
            price: 200.0,
            signal: Signal::Buy,
            confidence: 90.0,
            sentiment: Sentiment::Bearish,
        };
        assert_relative_eq!(calculate_limit_price(&s), 200.0 * (1.0 + MIN_LIMIT_OFFSET));
    }
}
