//! JSON report adapter implementing ReportPort.
//!
//! Writes the serialized reports pretty-printed, creating parent
//! directories as needed.

use crate::domain::arena::BacktestReport;
use crate::domain::error::CouncilError;
use crate::domain::portfolio_backtest::PortfolioBacktestResult;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn write_json<T: Serialize>(value: &T, output_path: &str) -> Result<(), CouncilError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| CouncilError::Report {
            reason: format!("failed to serialize report: {}", e),
        })?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_backtest(&self, report: &BacktestReport, output_path: &str) -> Result<(), CouncilError> {
        Self::write_json(report, output_path)
    }

    fn write_portfolio(
        &self,
        result: &PortfolioBacktestResult,
        output_path: &str,
    ) -> Result<(), CouncilError> {
        Self::write_json(result, output_path)
    }
}
