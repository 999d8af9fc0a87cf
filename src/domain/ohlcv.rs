//! Daily price bar representation.
//!
//! Every sequence of bars handed to the indicators, agents and backtests is
//! assumed strictly ascending by date.

use crate::domain::error::CouncilError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Closing prices of a bar slice, oldest first.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Returns the index of the first bar whose date is not strictly after its
/// predecessor, or `None` when the sequence is strictly ascending.
pub fn first_unsorted_index(bars: &[PriceBar]) -> Option<usize> {
    bars.windows(2)
        .position(|w| w[1].date <= w[0].date)
        .map(|i| i + 1)
}

pub fn validate_ascending(symbol: &str, bars: &[PriceBar]) -> Result<(), CouncilError> {
    match first_unsorted_index(bars) {
        Some(index) => Err(CouncilError::UnsortedBars {
            symbol: symbol.to_string(),
            index,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        // high-low=20, |high-100|=10, |low-100|=10 → 20
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // |110-70| = 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        // |90-130| = 40
        assert!((bar.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unsorted_index_detects_duplicate_dates() {
        let a = sample_bar();
        let mut b = sample_bar();
        b.date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let c = sample_bar();
        assert_eq!(first_unsorted_index(&[a.clone(), b.clone()]), None);
        assert_eq!(first_unsorted_index(&[a, b, c]), Some(2));
    }

    #[test]
    fn validate_ascending_names_symbol() {
        let a = sample_bar();
        let err = validate_ascending("AAPL", &[a.clone(), a]).unwrap_err();
        assert!(matches!(err, CouncilError::UnsortedBars { ref symbol, index: 1 } if symbol == "AAPL"));
        assert!(validate_ascending("AAPL", &[]).is_ok());
    }

    #[test]
    fn volume_is_optional_on_the_wire() {
        let json = r#"{"date":"2024-01-15","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: PriceBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, None);
        let out = serde_json::to_string(&bar).unwrap();
        assert!(!out.contains("volume"));
    }
}
