//! Weight-based buy-and-drift portfolio backtest.
//!
//! Capital is split across assets by weight on the first common trading date
//! and never rebalanced. Each common date revalues every holding at that
//! date's close.

use crate::domain::error::CouncilError;
use crate::domain::metrics::{annualized_volatility, cagr, sharpe_ratio, DrawdownTracker};
use crate::domain::ohlcv::first_unsorted_index;
use crate::domain::series::{build_common_timeline, SeriesIndex, SymbolSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

/// Allowed deviation of the weight sum from 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAssetConfig {
    pub symbol: String,
    /// Percent of capital, 0..=100.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioBacktestConfig {
    pub initial_capital: f64,
    /// Most recent bars kept per symbol before intersecting dates.
    pub period_days: usize,
    /// Fraction of each allocation charged up front (0.01 = 1%).
    pub commission_rate: f64,
    pub assets: Vec<PortfolioAssetConfig>,
}

impl Default for PortfolioBacktestConfig {
    fn default() -> Self {
        PortfolioBacktestConfig {
            initial_capital: 10_000.0,
            period_days: 365,
            commission_rate: 0.0,
            assets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResult {
    pub symbol: String,
    pub weight: f64,
    pub allocation: f64,
    pub commission: f64,
    pub quantity: f64,
    pub initial_price: f64,
    pub final_price: f64,
    pub final_value: f64,
    pub return_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Percent below the running peak.
    pub drawdown: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioBacktestResult {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return_percent: f64,
    /// CAGR in percent.
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    /// Annualized volatility in percent.
    pub volatility: f64,
    pub max_drawdown: f64,
    pub total_commission: f64,
    pub trading_days: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub asset_results: Vec<AssetResult>,
    pub portfolio_history: Vec<PortfolioPoint>,
}

/// Each weight within 0..=100 and the total within 100 ± 0.01.
pub fn validate_weights(assets: &[PortfolioAssetConfig]) -> Result<(), CouncilError> {
    for asset in assets {
        if !(0.0..=100.0).contains(&asset.weight) {
            return Err(CouncilError::InvalidWeight {
                symbol: asset.symbol.clone(),
                weight: asset.weight,
            });
        }
    }
    let total: f64 = assets.iter().map(|a| a.weight).sum();
    if (total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(CouncilError::WeightSum { total });
    }
    Ok(())
}

pub fn run_portfolio_backtest(
    data: &dyn DataPort,
    config: &PortfolioBacktestConfig,
) -> Result<PortfolioBacktestResult, CouncilError> {
    validate_weights(&config.assets)?;

    let span = info_span!("portfolio_backtest", assets = config.assets.len());
    let _guard = span.enter();

    let mut series = Vec::with_capacity(config.assets.len());
    for asset in &config.assets {
        let bars = data.fetch_bars(&asset.symbol)?;
        if let Some(index) = first_unsorted_index(&bars) {
            return Err(CouncilError::UnsortedBars {
                symbol: asset.symbol.clone(),
                index,
            });
        }
        let mut s = SymbolSeries::new(asset.symbol.clone(), bars);
        s.truncate_to_last(config.period_days);
        debug!(symbol = %asset.symbol, bars = s.bar_count(), "loaded series");
        series.push(s);
    }

    let timeline = build_common_timeline(&series);
    let (Some(&start_date), Some(&end_date)) = (timeline.first(), timeline.last()) else {
        return Err(CouncilError::NoCommonDates {
            symbols: config.assets.iter().map(|a| a.symbol.clone()).collect(),
        });
    };
    let index = SeriesIndex::new(series);

    let mut holdings = Vec::with_capacity(config.assets.len());
    let mut total_commission = 0.0;
    for asset in &config.assets {
        let first_close = close_on(&index, &asset.symbol, start_date)?;
        let allocation = config.initial_capital * asset.weight / 100.0;
        let commission = allocation * config.commission_rate;
        let quantity = if first_close > 0.0 {
            (allocation - commission) / first_close
        } else {
            0.0
        };
        total_commission += commission;
        holdings.push(AssetResult {
            symbol: asset.symbol.clone(),
            weight: asset.weight,
            allocation,
            commission,
            quantity,
            initial_price: first_close,
            final_price: first_close,
            final_value: quantity * first_close,
            return_percent: 0.0,
        });
    }

    let mut drawdown = DrawdownTracker::new(config.initial_capital);
    let mut history = Vec::with_capacity(timeline.len());
    for &date in &timeline {
        let mut value = 0.0;
        for holding in &mut holdings {
            let close = close_on(&index, &holding.symbol, date)?;
            holding.final_price = close;
            holding.final_value = holding.quantity * close;
            value += holding.final_value;
        }
        let dd = drawdown.update(value);
        history.push(PortfolioPoint {
            date,
            value,
            drawdown: dd,
        });
    }

    for holding in &mut holdings {
        holding.return_percent = if holding.allocation > 0.0 {
            (holding.final_value - holding.allocation) / holding.allocation * 100.0
        } else {
            0.0
        };
    }

    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let final_value = values.last().copied().unwrap_or(config.initial_capital);
    let growth = cagr(config.initial_capital, final_value, timeline.len());
    let vol = annualized_volatility(&values);
    let total_return_percent = if config.initial_capital > 0.0 {
        (final_value - config.initial_capital) / config.initial_capital * 100.0
    } else {
        0.0
    };

    info!(
        trading_days = timeline.len(),
        final_value,
        total_return_percent,
        "portfolio backtest complete"
    );

    Ok(PortfolioBacktestResult {
        initial_capital: config.initial_capital,
        final_value,
        total_return_percent,
        annualized_return: growth * 100.0,
        sharpe_ratio: sharpe_ratio(growth, vol),
        volatility: vol * 100.0,
        max_drawdown: drawdown.max_drawdown(),
        total_commission,
        trading_days: timeline.len(),
        start_date,
        end_date,
        asset_results: holdings,
        portfolio_history: history,
    })
}

fn close_on(index: &SeriesIndex, symbol: &str, date: NaiveDate) -> Result<f64, CouncilError> {
    index
        .close_on(symbol, date)
        .ok_or_else(|| CouncilError::NoData {
            symbol: symbol.to_string(),
        })
}
