//! Domain error types.
//!
//! Indicators, agents, sizing and the circuit breaker never fail; only the
//! backtest entry points, adapters and the CLI surface these errors.

/// Top-level error type for tradecouncil.
#[derive(Debug, thiserror::Error)]
pub enum CouncilError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("data query error: {reason}")]
    DataQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bars for {symbol} are not strictly ascending at index {index}")]
    UnsortedBars { symbol: String, index: usize },

    #[error("portfolio weights must sum to 100%, got {total:.2}%")]
    WeightSum { total: f64 },

    #[error("invalid weight {weight} for {symbol}: must be between 0 and 100")]
    InvalidWeight { symbol: String, weight: f64 },

    #[error("insufficient common trading dates across {}", symbols.join(", "))]
    NoCommonDates { symbols: Vec<String> },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CouncilError> for std::process::ExitCode {
    fn from(err: &CouncilError) -> Self {
        let code: u8 = match err {
            CouncilError::Io(_) | CouncilError::Json(_) | CouncilError::Report { .. } => 1,
            CouncilError::ConfigParse { .. }
            | CouncilError::ConfigMissing { .. }
            | CouncilError::ConfigInvalid { .. } => 2,
            CouncilError::Data { .. }
            | CouncilError::DataQuery { .. }
            | CouncilError::Ledger { .. } => 3,
            CouncilError::NoData { .. }
            | CouncilError::InsufficientData { .. }
            | CouncilError::UnsortedBars { .. } => 5,
            CouncilError::WeightSum { .. }
            | CouncilError::InvalidWeight { .. }
            | CouncilError::NoCommonDates { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_sum_message() {
        let err = CouncilError::WeightSum { total: 50.0 };
        assert_eq!(
            err.to_string(),
            "portfolio weights must sum to 100%, got 50.00%"
        );
    }

    #[test]
    fn no_common_dates_lists_symbols() {
        let err = CouncilError::NoCommonDates {
            symbols: vec!["AAPL".into(), "UNKNOWN".into()],
        };
        assert_eq!(
            err.to_string(),
            "insufficient common trading dates across AAPL, UNKNOWN"
        );
    }

    #[test]
    fn exit_codes_by_class() {
        use std::process::ExitCode;
        let cases: Vec<(CouncilError, ExitCode)> = vec![
            (
                CouncilError::ConfigMissing {
                    section: "arena".into(),
                    key: "buy_threshold".into(),
                },
                ExitCode::from(2),
            ),
            (
                CouncilError::Data {
                    reason: "down".into(),
                },
                ExitCode::from(3),
            ),
            (
                CouncilError::NoData {
                    symbol: "AAPL".into(),
                },
                ExitCode::from(5),
            ),
            (CouncilError::WeightSum { total: 90.0 }, ExitCode::from(6)),
        ];
        for (err, expected) in cases {
            // ExitCode has no PartialEq; compare the debug form
            assert_eq!(
                format!("{:?}", ExitCode::from(&err)),
                format!("{:?}", expected),
                "{err}"
            );
        }
    }
}
