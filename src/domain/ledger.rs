//! Snapshot of the external trading ledger read by the circuit breaker.
//!
//! The core never mutates a ledger it was handed; `mark_to_market` exists for
//! the adapters and tests that build snapshots.

use crate::domain::signal::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPosition {
    pub symbol: String,
    pub quantity: f64,
    pub entry_price: f64,
    pub side: PositionSide,
    /// Last known price; falls back to `entry_price` when absent.
    #[serde(default)]
    pub mark_price: Option<f64>,
}

impl LedgerPosition {
    pub fn price(&self) -> f64 {
        self.mark_price.unwrap_or(self.entry_price)
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTrade {
    pub symbol: String,
    pub side: Signal,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub cash: f64,
    pub equity: f64,
    #[serde(default)]
    pub daily_start_equity: Option<f64>,
    /// Legacy daily-loss baseline written by older ledgers.
    #[serde(default)]
    pub initial_balance: Option<f64>,
    #[serde(default)]
    pub positions: Vec<LedgerPosition>,
    #[serde(default)]
    pub trades: Vec<LedgerTrade>,
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Portfolio {
            cash,
            equity: cash,
            daily_start_equity: None,
            initial_balance: None,
            positions: Vec::new(),
            trades: Vec::new(),
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&LedgerPosition> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Most recent trade on `symbol` by timestamp, whatever the list order.
    pub fn last_trade(&self, symbol: &str) -> Option<&LedgerTrade> {
        self.trades
            .iter()
            .filter(|t| t.symbol == symbol)
            .max_by_key(|t| t.timestamp)
    }

    /// cash + Σ(quantity × price), using `price_map` where it has the symbol
    /// and each position's own mark otherwise.
    pub fn total_equity(&self, price_map: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|pos| {
                let price = price_map.get(&pos.symbol).copied().unwrap_or(pos.price());
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    /// Applies new marks and recomputes `equity` so that
    /// equity == cash + Σ(quantity × mark).
    pub fn mark_to_market(&mut self, price_map: &HashMap<String, f64>) {
        for pos in &mut self.positions {
            if let Some(&price) = price_map.get(&pos.symbol) {
                pos.mark_price = Some(price);
            }
        }
        self.equity = self.total_equity(&HashMap::new());
    }
}
