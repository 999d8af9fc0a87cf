//! Average True Range, simple mean over the trailing `period` true ranges.
//!
//! With fewer than `period + 1` bars the mean high-low range of the
//! available bars is returned (0 for no bars).

use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_ATR_PERIOD: usize = 14;

pub fn atr(bars: &[PriceBar], period: usize) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    if period == 0 || bars.len() < period + 1 {
        return bars.iter().map(|b| b.high - b.low).sum::<f64>() / bars.len() as f64;
    }
    let window = &bars[bars.len() - (period + 1)..];
    window
        .windows(2)
        .map(|w| w[1].true_range(w[0].close))
        .sum::<f64>()
        / period as f64
}
