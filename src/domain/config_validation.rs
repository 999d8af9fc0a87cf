//! Configuration validation.
//!
//! Every section is checked before a run starts so that a bad value fails
//! fast with the section and key that caused it.

use crate::domain::error::CouncilError;
use crate::domain::portfolio_backtest::{validate_weights, PortfolioAssetConfig};
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());
    match source.trim() {
        "csv" => require(config, "data", "csv_dir").map(|_| ()),
        "sqlite" => {
            require(config, "data", "sqlite_path")?;
            if config.get_int("data", "pool_size", 4) < 1 {
                return Err(invalid("data", "pool_size", "pool_size must be at least 1"));
            }
            Ok(())
        }
        other => Err(invalid(
            "data",
            "source",
            &format!("unknown data source '{}', expected csv or sqlite", other),
        )),
    }
}

pub fn validate_arena_config(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    positive(config, "arena", "initial_balance", 10_000.0)?;
    percent(config, "arena", "risk_percent", 2.0)?;
    percent(config, "arena", "max_position_percent", 10.0)?;
    let threshold = config.get_double("arena", "buy_threshold", 50.0);
    if !(0.0..=100.0).contains(&threshold) {
        return Err(invalid("arena", "buy_threshold", "buy_threshold must be between 0 and 100"));
    }
    positive(config, "arena", "stop_loss_percent", 5.0)?;
    positive(config, "arena", "take_profit_percent", 10.0)?;
    if config.get_int("arena", "warmup_bars", 50) < 0 {
        return Err(invalid("arena", "warmup_bars", "warmup_bars must be non-negative"));
    }
    non_negative(config, "arena", "commission_pct")?;
    non_negative(config, "arena", "slippage_pct")?;
    Ok(())
}

pub fn validate_circuit_breaker_config(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    percent(config, "circuit_breaker", "max_daily_loss_percent", 5.0)?;
    if config.get_int("circuit_breaker", "cooldown_ms", 60_000) < 0 {
        return Err(invalid(
            "circuit_breaker",
            "cooldown_ms",
            "cooldown_ms must be non-negative",
        ));
    }
    percent(config, "circuit_breaker", "max_position_size_percent", 20.0)?;
    Ok(())
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    positive(config, "portfolio", "initial_capital", 10_000.0)?;
    if config.get_int("portfolio", "period_days", 365) < 1 {
        return Err(invalid("portfolio", "period_days", "period_days must be at least 1"));
    }
    let rate = config.get_double("portfolio", "commission_rate", 0.0);
    if !(0.0..1.0).contains(&rate) {
        return Err(invalid(
            "portfolio",
            "commission_rate",
            "commission_rate must be a fraction between 0 and 1",
        ));
    }
    let assets = parse_assets(&require(config, "portfolio", "assets")?)?;
    validate_weights(&assets)
}

pub fn validate_log_config(config: &dyn ConfigPort) -> Result<(), CouncilError> {
    match config.get_string("log", "format").as_deref().map(str::trim) {
        None | Some("text") | Some("json") => Ok(()),
        Some(other) => Err(invalid(
            "log",
            "format",
            &format!("unknown log format '{}', expected text or json", other),
        )),
    }
}

/// Parses `SYMBOL:WEIGHT` pairs separated by commas, e.g. `AAPL:60,MSFT:40`.
pub fn parse_assets(value: &str) -> Result<Vec<PortfolioAssetConfig>, CouncilError> {
    let mut assets = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (symbol, weight) = entry.split_once(':').ok_or_else(|| {
            invalid(
                "portfolio",
                "assets",
                &format!("'{}' is not SYMBOL:WEIGHT", entry),
            )
        })?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(invalid("portfolio", "assets", "empty symbol"));
        }
        let weight: f64 = weight.trim().parse().map_err(|_| {
            invalid(
                "portfolio",
                "assets",
                &format!("invalid weight '{}' for {}", weight.trim(), symbol),
            )
        })?;
        assets.push(PortfolioAssetConfig {
            symbol: symbol.to_string(),
            weight,
        });
    }
    if assets.is_empty() {
        return Err(invalid("portfolio", "assets", "at least one asset is required"));
    }
    Ok(assets)
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, CouncilError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(CouncilError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn positive(config: &dyn ConfigPort, section: &str, key: &str, default: f64) -> Result<(), CouncilError> {
    if config.get_double(section, key, default) <= 0.0 {
        return Err(invalid(section, key, &format!("{} must be positive", key)));
    }
    Ok(())
}

fn non_negative(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), CouncilError> {
    if config.get_double(section, key, 0.0) < 0.0 {
        return Err(invalid(section, key, &format!("{} must be non-negative", key)));
    }
    Ok(())
}

fn percent(config: &dyn ConfigPort, section: &str, key: &str, default: f64) -> Result<(), CouncilError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 || value > 100.0 {
        return Err(invalid(
            section,
            key,
            &format!("{} must be greater than 0 and at most 100", key),
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CouncilError {
    CouncilError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestConfig {
        values: HashMap<(String, String), String>,
    }

    impl TestConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            let values = entries
                .iter()
                .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                .collect();
            TestConfig { values }
        }
    }

    impl ConfigPort for TestConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn assert_invalid(result: Result<(), CouncilError>, expected_key: &str) {
        match result {
            Err(CouncilError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {}, got {:?}", expected_key, other),
        }
    }

    #[test]
    fn empty_arena_section_uses_valid_defaults() {
        assert!(validate_arena_config(&TestConfig::new(&[])).is_ok());
        assert!(validate_circuit_breaker_config(&TestConfig::new(&[])).is_ok());
        assert!(validate_log_config(&TestConfig::new(&[])).is_ok());
    }

    #[test]
    fn arena_rejects_bad_values() {
        assert_invalid(
            validate_arena_config(&TestConfig::new(&[("arena", "initial_balance", "0")])),
            "initial_balance",
        );
        assert_invalid(
            validate_arena_config(&TestConfig::new(&[("arena", "risk_percent", "150")])),
            "risk_percent",
        );
        assert_invalid(
            validate_arena_config(&TestConfig::new(&[("arena", "buy_threshold", "101")])),
            "buy_threshold",
        );
        assert_invalid(
            validate_arena_config(&TestConfig::new(&[("arena", "warmup_bars", "-1")])),
            "warmup_bars",
        );
        assert_invalid(
            validate_arena_config(&TestConfig::new(&[("arena", "slippage_pct", "-0.1")])),
            "slippage_pct",
        );
    }

    #[test]
    fn circuit_breaker_rejects_bad_values() {
        assert_invalid(
            validate_circuit_breaker_config(&TestConfig::new(&[(
                "circuit_breaker",
                "max_daily_loss_percent",
                "0",
            )])),
            "max_daily_loss_percent",
        );
        assert_invalid(
            validate_circuit_breaker_config(&TestConfig::new(&[(
                "circuit_breaker",
                "cooldown_ms",
                "-5",
            )])),
            "cooldown_ms",
        );
    }

    #[test]
    fn data_source_requirements() {
        let missing = validate_data_config(&TestConfig::new(&[("data", "source", "csv")]));
        assert!(matches!(missing, Err(CouncilError::ConfigMissing { ref key, .. }) if key == "csv_dir"));

        assert!(validate_data_config(&TestConfig::new(&[
            ("data", "source", "sqlite"),
            ("data", "sqlite_path", "/tmp/x.db"),
        ]))
        .is_ok());

        assert_invalid(
            validate_data_config(&TestConfig::new(&[("data", "source", "postgres")])),
            "source",
        );
    }

    #[test]
    fn portfolio_assets_parse_and_sum() {
        let ok = TestConfig::new(&[("portfolio", "assets", "AAPL:60, MSFT:40")]);
        assert!(validate_portfolio_config(&ok).is_ok());

        let bad_sum = TestConfig::new(&[("portfolio", "assets", "AAPL:50")]);
        assert!(matches!(
            validate_portfolio_config(&bad_sum),
            Err(CouncilError::WeightSum { .. })
        ));

        let missing = TestConfig::new(&[]);
        assert!(matches!(
            validate_portfolio_config(&missing),
            Err(CouncilError::ConfigMissing { .. })
        ));

        let rate = TestConfig::new(&[
            ("portfolio", "assets", "AAPL:100"),
            ("portfolio", "commission_rate", "1.5"),
        ]);
        assert_invalid(validate_portfolio_config(&rate), "commission_rate");
    }

    #[test]
    fn parse_assets_formats() {
        let assets = parse_assets("AAPL:50,MSFT:50").unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].symbol, "MSFT");
        assert_eq!(assets[1].weight, 50.0);

        assert!(parse_assets("AAPL").is_err());
        assert!(parse_assets("AAPL:abc").is_err());
        assert!(parse_assets(":50").is_err());
        assert!(parse_assets(" , ").is_err());
    }

    #[test]
    fn log_format_checked() {
        assert!(validate_log_config(&TestConfig::new(&[("log", "format", "json")])).is_ok());
        assert_invalid(
            validate_log_config(&TestConfig::new(&[("log", "format", "xml")])),
            "format",
        );
    }
}
