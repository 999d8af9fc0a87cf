//! Market regime classification from RSI, ADX and the 5/20 SMA pair.
//!
//! Sentiment policy, first matching branch wins:
//! 1. Strong trend (ADX > 25): follow the SMA direction.
//! 2. Weak trend (ADX < 20): fade RSI extremes.
//! 3. Medium trend: fade an RSI extreme that opposes the SMA direction,
//!    otherwise follow a trend strength beyond ±2%, otherwise neutral.
//!
//! Regime label: BULL_TREND / BEAR_TREND for strong trends, VOLATILE when
//! ADX > 30 and |trend strength| > 3, SIDEWAYS otherwise. Because the strong
//! trend labels are checked first, VOLATILE only appears for a strong trend
//! with no SMA direction, which the strength condition rules out. SQUEEZE is
//! part of the label set but is never produced here.

use crate::domain::indicator::{IndicatorSnapshot, NEUTRAL_ADX, NEUTRAL_RSI, SLOW_SMA_PERIOD};
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Sentiment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum bars before the classifier produces anything but the neutral default.
pub const MIN_REGIME_BARS: usize = SLOW_SMA_PERIOD;

const STRONG_TREND_ADX: f64 = 25.0;
const WEAK_TREND_ADX: f64 = 20.0;
const VOLATILE_ADX: f64 = 30.0;
const VOLATILE_TREND_STRENGTH: f64 = 3.0;
const DIRECTIONAL_TREND_STRENGTH: f64 = 2.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const NEUTRAL_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    BullTrend,
    BearTrend,
    Sideways,
    Volatile,
    Squeeze,
}

impl MarketRegime {
    pub fn is_trending(self) -> bool {
        matches!(self, MarketRegime::BullTrend | MarketRegime::BearTrend)
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketRegime::BullTrend => write!(f, "BULL_TREND"),
            MarketRegime::BearTrend => write!(f, "BEAR_TREND"),
            MarketRegime::Sideways => write!(f, "SIDEWAYS"),
            MarketRegime::Volatile => write!(f, "VOLATILE"),
            MarketRegime::Squeeze => write!(f, "SQUEEZE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeAnalysis {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub rsi: f64,
    pub adx: f64,
    pub regime: MarketRegime,
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub trend_strength: f64,
}

impl RegimeAnalysis {
    /// Returned for histories too short to classify.
    pub fn neutral() -> Self {
        RegimeAnalysis {
            sentiment: Sentiment::Neutral,
            confidence: NEUTRAL_CONFIDENCE,
            rsi: NEUTRAL_RSI,
            adx: NEUTRAL_ADX,
            regime: MarketRegime::Sideways,
            sma_fast: 0.0,
            sma_slow: 0.0,
            trend_strength: 0.0,
        }
    }
}

pub fn classify(bars: &[PriceBar]) -> RegimeAnalysis {
    if bars.len() < MIN_REGIME_BARS {
        return RegimeAnalysis::neutral();
    }
    classify_snapshot(&IndicatorSnapshot::compute(bars))
}

pub fn classify_snapshot(snap: &IndicatorSnapshot) -> RegimeAnalysis {
    let rsi = snap.rsi;
    let adx = snap.adx;
    let trend_strength = snap.trend_strength();
    let is_bullish = snap.sma_fast > snap.sma_slow;
    let is_bearish = snap.sma_fast < snap.sma_slow;
    let is_strong_trend = adx > STRONG_TREND_ADX;
    let is_weak_trend = adx < WEAK_TREND_ADX;

    let (sentiment, confidence) = if is_strong_trend {
        let trend_bonus = (adx - STRONG_TREND_ADX) * 0.5;
        if is_bullish {
            (
                Sentiment::Bullish,
                (60.0 + (rsi - 50.0) * 0.5 + trend_bonus).min(85.0),
            )
        } else if is_bearish {
            (
                Sentiment::Bearish,
                (60.0 + (50.0 - rsi) * 0.5 + trend_bonus).min(85.0),
            )
        } else {
            (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
        }
    } else if is_weak_trend {
        if rsi > RSI_OVERBOUGHT {
            (
                Sentiment::Bearish,
                (50.0 + (rsi - RSI_OVERBOUGHT) * 1.5).min(80.0),
            )
        } else if rsi < RSI_OVERSOLD {
            (
                Sentiment::Bullish,
                (50.0 + (RSI_OVERSOLD - rsi) * 1.5).min(80.0),
            )
        } else {
            (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
        }
    } else if rsi > RSI_OVERBOUGHT && is_bullish {
        (
            Sentiment::Bearish,
            (50.0 + (rsi - RSI_OVERBOUGHT)).min(75.0),
        )
    } else if rsi < RSI_OVERSOLD && is_bearish {
        (
            Sentiment::Bullish,
            (50.0 + (RSI_OVERSOLD - rsi)).min(75.0),
        )
    } else if trend_strength.abs() > DIRECTIONAL_TREND_STRENGTH {
        let sentiment = if trend_strength > 0.0 {
            Sentiment::Bullish
        } else {
            Sentiment::Bearish
        };
        (sentiment, (50.0 + trend_strength.abs() * 2.0).min(70.0))
    } else {
        (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
    };

    let regime = if is_strong_trend && is_bullish {
        MarketRegime::BullTrend
    } else if is_strong_trend && is_bearish {
        MarketRegime::BearTrend
    } else if adx > VOLATILE_ADX && trend_strength.abs() > VOLATILE_TREND_STRENGTH {
        MarketRegime::Volatile
    } else {
        MarketRegime::Sideways
    };

    RegimeAnalysis {
        sentiment,
        confidence: confidence.clamp(0.0, 100.0),
        rsi,
        adx,
        regime,
        sma_fast: snap.sma_fast,
        sma_slow: snap.sma_slow,
        trend_strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bars_from_closes(values: &[f64], spread: f64) -> Vec<PriceBar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: c,
                high: c + spread,
                low: c - spread,
                close: c,
                volume: None,
            })
            .collect()
    }

    fn snap(rsi: f64, adx: f64, sma_fast: f64, sma_slow: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi,
            adx,
            sma_fast,
            sma_slow,
        }
    }

    #[test]
    fn short_history_is_neutral() {
        let bars = bars_from_closes(&[100.0; 19], 1.0);
        let analysis = classify(&bars);
        assert_eq!(analysis, RegimeAnalysis::neutral());
        assert_eq!(analysis.confidence, 50.0);
        assert_eq!(analysis.rsi, 50.0);
        assert_eq!(analysis.adx, 20.0);
        assert_eq!(analysis.regime, MarketRegime::Sideways);
    }

    #[test]
    fn strong_uptrend_is_bull_trend() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let analysis = classify(&bars_from_closes(&closes, 0.2));
        assert_eq!(analysis.regime, MarketRegime::BullTrend);
        assert_eq!(analysis.sentiment, Sentiment::Bullish);
        assert_relative_eq!(analysis.confidence, 85.0);
    }

    #[test]
    fn strong_downtrend_is_bear_trend() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 * 0.99f64.powi(i)).collect();
        let analysis = classify(&bars_from_closes(&closes, 0.2));
        assert_eq!(analysis.regime, MarketRegime::BearTrend);
        assert_eq!(analysis.sentiment, Sentiment::Bearish);
    }

    #[test]
    fn strong_trend_confidence_formula() {
        // 60 + (60-50)*0.5 + (30-25)*0.5 = 67.5
        let a = classify_snapshot(&snap(60.0, 30.0, 105.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bullish);
        assert_relative_eq!(a.confidence, 67.5);

        // mirrored: 60 + (50-40)*0.5 + 2.5 = 67.5
        let a = classify_snapshot(&snap(40.0, 30.0, 95.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bearish);
        assert_relative_eq!(a.confidence, 67.5);
    }

    #[test]
    fn weak_trend_fades_rsi_extremes() {
        let a = classify_snapshot(&snap(80.0, 15.0, 101.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bearish);
        assert_relative_eq!(a.confidence, 65.0);

        let a = classify_snapshot(&snap(5.0, 15.0, 99.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bullish);
        assert_relative_eq!(a.confidence, 80.0);

        let a = classify_snapshot(&snap(50.0, 15.0, 110.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert_eq!(a.regime, MarketRegime::Sideways);
    }

    #[test]
    fn medium_trend_reversal_only_against_sma_direction() {
        // overbought in an uptrend → reversal
        let a = classify_snapshot(&snap(75.0, 22.0, 101.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bearish);

        // overbought in a downtrend is not a reversal; strength -5% confirms bearish
        let a = classify_snapshot(&snap(75.0, 22.0, 95.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bearish);
        assert_relative_eq!(a.confidence, 60.0);

        // oversold in a downtrend → reversal up
        let a = classify_snapshot(&snap(25.0, 22.0, 99.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bullish);
    }

    #[test]
    fn medium_trend_directional_bias() {
        let a = classify_snapshot(&snap(55.0, 22.0, 103.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Bullish);
        assert_relative_eq!(a.confidence, 56.0);

        let a = classify_snapshot(&snap(55.0, 22.0, 101.0, 100.0));
        assert_eq!(a.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn never_emits_squeeze() {
        for rsi in [10.0, 50.0, 90.0] {
            for adx in [5.0, 22.0, 35.0] {
                for fast in [90.0, 100.0, 110.0] {
                    let a = classify_snapshot(&snap(rsi, adx, fast, 100.0));
                    assert_ne!(a.regime, MarketRegime::Squeeze);
                }
            }
        }
    }

    #[test]
    fn regime_serializes_screaming_case() {
        let json = serde_json::to_string(&MarketRegime::BullTrend).unwrap();
        assert_eq!(json, "\"BULL_TREND\"");
        assert_eq!(MarketRegime::BearTrend.to_string(), "BEAR_TREND");
    }
}
