//! Technical indicators over price-bar sequences.
//!
//! Every function here returns a plain `f64` for the most recent bar and never
//! fails: short inputs degrade to documented neutral values (RSI 50, ADX 20,
//! SMA = last value) instead of returning an error.

pub mod adx;
pub mod atr;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use adx::{adx, DEFAULT_ADX_PERIOD, NEUTRAL_ADX};
pub use atr::{atr, DEFAULT_ATR_PERIOD};
pub use rsi::{rsi, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
pub use sma::sma;
pub use stddev::{pct_returns, stddev};

use crate::domain::ohlcv::{closes, PriceBar};
use serde::{Deserialize, Serialize};

pub const FAST_SMA_PERIOD: usize = 5;
pub const SLOW_SMA_PERIOD: usize = 20;

/// The indicator readings shared by the regime classifier and the agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub adx: f64,
    pub sma_fast: f64,
    pub sma_slow: f64,
}

impl IndicatorSnapshot {
    pub fn compute(bars: &[PriceBar]) -> Self {
        let closes = closes(bars);
        IndicatorSnapshot {
            rsi: rsi(&closes, DEFAULT_RSI_PERIOD),
            adx: adx(bars, DEFAULT_ADX_PERIOD),
            sma_fast: sma(&closes, FAST_SMA_PERIOD),
            sma_slow: sma(&closes, SLOW_SMA_PERIOD),
        }
    }

    /// (SMA5 - SMA20) / SMA20 * 100, zero when the slow average is zero.
    pub fn trend_strength(&self) -> f64 {
        if self.sma_slow == 0.0 {
            return 0.0;
        }
        (self.sma_fast - self.sma_slow) / self.sma_slow * 100.0
    }

    pub fn is_bullish(&self) -> bool {
        self.sma_fast > self.sma_slow
    }
}
