//! tradecouncil: multi-agent trading-signal engine with risk gating and
//! backtesting.
//!
//! Hexagonal architecture: the decision core in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod obs;
