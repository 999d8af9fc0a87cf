//! ADX (Average Directional Index), simplified.
//!
//! For each adjacent pair of bars in the trailing window:
//! - TR = true range, +DM / -DM = directional movement
//! - +DI = +DM / TR * 100, -DI = -DM / TR * 100
//! - DX = |+DI - -DI| / (+DI + -DI) * 100, skipped when +DI + -DI == 0
//!
//! The result is the plain average of DX over the `period` pairs, with
//! skipped pairs contributing zero. There is no Wilder smoothing of TR, DM
//! or DX, so the numbers differ from a textbook ADX; this is the canonical
//! trend-strength value used by the regime classifier and the agents.
//!
//! Fewer than `period + 1` bars yields the neutral value 20.

use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_ADX_PERIOD: usize = 14;
pub const NEUTRAL_ADX: f64 = 20.0;

pub fn adx(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return NEUTRAL_ADX;
    }

    let window = &bars[bars.len() - (period + 1)..];
    let mut dx_sum = 0.0;

    for w in window.windows(2) {
        let (prev, bar) = (&w[0], &w[1]);
        let tr = bar.true_range(prev.close);
        if tr <= 0.0 {
            continue;
        }

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        let plus_di = plus_dm / tr * 100.0;
        let minus_di = minus_dm / tr * 100.0;
        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            continue;
        }
        dx_sum += (plus_di - minus_di).abs() / di_sum * 100.0;
    }

    dx_sum / period as f64
}
