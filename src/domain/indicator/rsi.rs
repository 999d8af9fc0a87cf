//! RSI (Relative Strength Index).
//!
//! Simple-average variant over the last `period` price changes (no Wilder
//! smoothing):
//! - avg_gain = sum(gains) / period, avg_loss = sum(losses) / period
//! - rs = 100 when avg_loss == 0, otherwise avg_gain / avg_loss
//! - RSI = 100 - 100 / (1 + rs)
//!
//! The avg_loss == 0 branch caps the result at 100 - 100/101 ≈ 99.01; a
//! series with no losses never reports exactly 100.
//!
//! Fewer than `period + 1` closes yields the neutral value 50.

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &closes[closes.len() - (period + 1)..];
    let mut gains = 0.0;
    let mut losses = 0.0;
    for w in window.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
