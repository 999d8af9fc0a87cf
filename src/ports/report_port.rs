//! Report output port.

use crate::domain::arena::BacktestReport;
use crate::domain::error::CouncilError;
use crate::domain::portfolio_backtest::PortfolioBacktestResult;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write_backtest(&self, report: &BacktestReport, output_path: &str) -> Result<(), CouncilError>;

    fn write_portfolio(
        &self,
        result: &PortfolioBacktestResult,
        output_path: &str,
    ) -> Result<(), CouncilError>;
}
