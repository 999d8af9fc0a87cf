//! Core decision engine: indicators, regime, agents, consensus, risk and the
//! two backtests. Nothing in here performs I/O.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod regime;
pub mod agent;
pub mod consensus;
pub mod sizing;
pub mod ledger;
pub mod circuit_breaker;
pub mod metrics;
pub mod arena;
pub mod series;
pub mod portfolio_backtest;
pub mod config_validation;
pub mod error;
