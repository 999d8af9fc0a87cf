//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with header
//! `date,open,high,low,close[,volume]`.

use crate::domain::error::CouncilError;
use crate::domain::ohlcv::{validate_ascending, PriceBar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_price(record: &csv::StringRecord, index: usize, column: &str) -> Result<f64, CouncilError> {
    record
        .get(index)
        .ok_or_else(|| CouncilError::Data {
            reason: format!("missing {} column", column),
        })?
        .trim()
        .parse()
        .map_err(|e| CouncilError::Data {
            reason: format!("invalid {} value: {}", column, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, CouncilError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| CouncilError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| CouncilError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| CouncilError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                CouncilError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let volume = match record.get(5).map(str::trim) {
                None | Some("") => None,
                Some(v) => Some(v.parse::<f64>().map_err(|e| CouncilError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?),
            };

            bars.push(PriceBar {
                date,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        validate_ascending(symbol, &bars)?;
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CouncilError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CouncilError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CouncilError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
