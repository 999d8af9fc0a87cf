//! Per-symbol bar series with a date index, and the common timeline across
//! several series.

use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub date_index: HashMap<NaiveDate, usize>,
}

impl SymbolSeries {
    pub fn new(symbol: String, bars: Vec<PriceBar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            symbol,
            bars,
            date_index,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    /// Keeps only the most recent `days` bars.
    pub fn truncate_to_last(&mut self, days: usize) {
        if self.bars.len() > days {
            self.bars.drain(..self.bars.len() - days);
            self.date_index = self
                .bars
                .iter()
                .enumerate()
                .map(|(i, bar)| (bar.date, i))
                .collect();
        }
    }
}

/// symbol → date → bar, built once per backtest.
#[derive(Debug, Clone, Default)]
pub struct SeriesIndex {
    series: Vec<SymbolSeries>,
}

impl SeriesIndex {
    pub fn new(series: Vec<SymbolSeries>) -> Self {
        SeriesIndex { series }
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolSeries> {
        self.series.iter().find(|s| s.symbol == symbol)
    }

    pub fn close_on(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.get(symbol)?.get_bar(date).map(|b| b.close)
    }

    pub fn series(&self) -> &[SymbolSeries] {
        &self.series
    }
}

/// Ascending dates present in every series. Empty if any series is empty.
pub fn build_common_timeline(series: &[SymbolSeries]) -> Vec<NaiveDate> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };
    let common: BTreeSet<NaiveDate> = first
        .bars
        .iter()
        .map(|bar| bar.date)
        .filter(|date| rest.iter().all(|s| s.date_index.contains_key(date)))
        .collect();
    common.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: Some(1000.0),
        }
    }

    #[test]
    fn series_builds_date_index() {
        let s = SymbolSeries::new(
            "AAPL".into(),
            vec![make_bar("2024-01-01", 100.0), make_bar("2024-01-02", 101.0)],
        );
        assert_eq!(s.bar_count(), 2);
        let bar = s.get_bar(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!((bar.unwrap().close - 101.0).abs() < f64::EPSILON);
        assert!(s.get_bar(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).is_none());
    }

    #[test]
    fn truncate_keeps_latest_and_reindexes() {
        let mut s = SymbolSeries::new(
            "AAPL".into(),
            vec![
                make_bar("2024-01-01", 100.0),
                make_bar("2024-01-02", 101.0),
                make_bar("2024-01-03", 102.0),
            ],
        );
        s.truncate_to_last(2);
        assert_eq!(s.bar_count(), 2);
        assert_eq!(s.bars[0].close, 101.0);
        assert_eq!(
            s.date_index.get(&NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            Some(&1)
        );
        assert!(s.get_bar(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).is_none());
    }

    #[test]
    fn common_timeline_intersects() {
        let a = SymbolSeries::new(
            "A".into(),
            vec![
                make_bar("2024-01-01", 1.0),
                make_bar("2024-01-02", 1.0),
                make_bar("2024-01-04", 1.0),
            ],
        );
        let b = SymbolSeries::new(
            "B".into(),
            vec![
                make_bar("2024-01-02", 1.0),
                make_bar("2024-01-03", 1.0),
                make_bar("2024-01-04", 1.0),
            ],
        );
        let timeline = build_common_timeline(&[a, b]);
        assert_eq!(
            timeline,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            ]
        );
    }

    #[test]
    fn common_timeline_empty_when_a_series_is_empty() {
        let a = SymbolSeries::new("A".into(), vec![make_bar("2024-01-01", 1.0)]);
        let b = SymbolSeries::new("B".into(), Vec::new());
        assert!(build_common_timeline(&[a, b]).is_empty());
        assert!(build_common_timeline(&[]).is_empty());
    }

    #[test]
    fn index_lookup() {
        let idx = SeriesIndex::new(vec![SymbolSeries::new(
            "A".into(),
            vec![make_bar("2024-01-01", 42.0)],
        )]);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(idx.close_on("A", d), Some(42.0));
        assert_eq!(idx.close_on("B", d), None);
    }
}
