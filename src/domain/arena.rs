//! Single-asset backtest ("arena").
//!
//! Replays a bar series through the technical council one bar at a time over
//! an expanding window. Per symbol the simulator is FLAT, LONG or (when
//! `allow_shorting` is set) SHORT. Open positions exit in priority order on
//! stop-loss, take-profit, then a consensus flip; fills happen at the bar's
//! close, adjusted for slippage and charged commission.

use crate::domain::consensus::Council;
use crate::domain::error::CouncilError;
use crate::domain::ledger::PositionSide;
use crate::domain::metrics::{DrawdownTracker, TradeStats};
use crate::domain::ohlcv::{first_unsorted_index, PriceBar};
use crate::domain::signal::{ConsensusResult, Sentiment, Signal};
use crate::domain::sizing::{calculate_position_size, RiskParameters, TradeSetup};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

pub const END_OF_BACKTEST: &str = "End of Backtest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaConfig {
    pub initial_balance: f64,
    pub risk_percent: f64,
    pub max_position_percent: f64,
    /// Minimum consensus confidence to open a position.
    pub buy_threshold: f64,
    pub stop_loss_percent: f64,
    pub take_profit_percent: f64,
    pub warmup_bars: usize,
    /// Percent of notional charged per fill.
    pub commission_pct: f64,
    pub slippage_pct: f64,
    pub allow_shorting: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            initial_balance: 10_000.0,
            risk_percent: 2.0,
            max_position_percent: 10.0,
            buy_threshold: 50.0,
            stop_loss_percent: 5.0,
            take_profit_percent: 10.0,
            warmup_bars: 50,
            commission_pct: 0.0,
            slippage_pct: 0.0,
            allow_shorting: false,
        }
    }
}

/// Commission on a fill of `notional`.
pub fn calculate_commission(notional: f64, commission_pct: f64) -> f64 {
    notional * commission_pct / 100.0
}

/// Execution price for a fill. Buying (long entry, short cover) pays above
/// market; selling (long exit, short entry) receives below.
pub fn apply_slippage(market_price: f64, slippage_pct: f64, buying: bool) -> f64 {
    if buying {
        market_price * (1.0 + slippage_pct / 100.0)
    } else {
        market_price * (1.0 - slippage_pct / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedPosition {
    pub symbol: String,
    pub quantity: u64,
    pub entry_price: f64,
    pub side: PositionSide,
}

impl SimulatedPosition {
    /// Unrealized PnL in percent of entry price, signed for the side.
    pub fn pnl_percent(&self, price: f64) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        let move_pct = (price - self.entry_price) / self.entry_price * 100.0;
        match self.side {
            PositionSide::Long => move_pct,
            PositionSide::Short => -move_pct,
        }
    }

    /// Cash the position would return if closed at `price` before costs.
    /// A short holds its entry notional in escrow and settles the difference.
    pub fn value(&self, price: f64) -> f64 {
        let qty = self.quantity as f64;
        match self.side {
            PositionSide::Long => qty * price,
            PositionSide::Short => qty * self.entry_price + qty * (self.entry_price - price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedTrade {
    pub side: PositionSide,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub quantity: u64,
    pub pnl: f64,
    /// Entry reason while open, exit reason once closed.
    pub reason: String,
    pub entry_reason: String,
}

impl SimulatedTrade {
    pub fn is_closed(&self) -> bool {
        self.exit_date.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub symbol: String,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub profit: f64,
    pub profit_percent: f64,
    pub trade_count: usize,
    /// Percent of closed trades with positive PnL.
    pub win_rate: f64,
    /// Percent of peak equity.
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub trades: Vec<SimulatedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

struct OpenPosition {
    position: SimulatedPosition,
    entry_commission: f64,
    trade_index: usize,
}

struct Arena<'a> {
    symbol: &'a str,
    config: &'a ArenaConfig,
    cash: f64,
    open: Option<OpenPosition>,
    trades: Vec<SimulatedTrade>,
}

impl Arena<'_> {
    fn equity(&self, price: f64) -> f64 {
        self.cash
            + self
                .open
                .as_ref()
                .map(|o| o.position.value(price))
                .unwrap_or(0.0)
    }

    fn exit_reason(&self, position: &SimulatedPosition, bar: &PriceBar, consensus: &ConsensusResult) -> Option<String> {
        let pnl_pct = position.pnl_percent(bar.close);
        if pnl_pct < -self.config.stop_loss_percent {
            return Some(format!("Stop Loss (-{}%)", self.config.stop_loss_percent));
        }
        if pnl_pct > self.config.take_profit_percent {
            return Some(format!("Take Profit (+{}%)", self.config.take_profit_percent));
        }
        let flipped = match position.side {
            PositionSide::Long => consensus.sentiment == Sentiment::Bearish,
            PositionSide::Short => consensus.sentiment == Sentiment::Bullish,
        };
        if flipped {
            return Some(format!(
                "Signal Exit ({}, Conf: {:.0}%)",
                consensus.sentiment, consensus.confidence
            ));
        }
        None
    }

    fn try_enter(&mut self, bar: &PriceBar, consensus: &ConsensusResult) {
        let side = match consensus.sentiment {
            Sentiment::Bullish => PositionSide::Long,
            Sentiment::Bearish if self.config.allow_shorting => PositionSide::Short,
            _ => return,
        };
        if consensus.confidence < self.config.buy_threshold {
            return;
        }

        let buying = side == PositionSide::Long;
        let fill = apply_slippage(bar.close, self.config.slippage_pct, buying);
        let setup = TradeSetup {
            price: fill,
            signal: if buying { Signal::Buy } else { Signal::Sell },
            confidence: consensus.confidence,
            sentiment: consensus.sentiment,
        };
        let risk = RiskParameters {
            account_equity: self.cash,
            risk_per_trade_percent: self.config.risk_percent,
            max_position_size_percent: self.config.max_position_percent,
            available_cash: Some(self.cash),
        };
        let quantity = calculate_position_size(&setup, &risk);
        if quantity == 0 {
            return;
        }

        let notional = quantity as f64 * fill;
        let commission = calculate_commission(notional, self.config.commission_pct);
        if notional + commission > self.cash {
            return;
        }
        // shorts escrow their entry notional the same way longs pay for shares
        self.cash -= notional + commission;

        let reason = format!("Smart Entry (Conf: {:.0}%)", consensus.confidence);
        debug!(
            symbol = self.symbol,
            date = %bar.date,
            side = ?side,
            quantity,
            price = fill,
            "arena entry"
        );
        self.trades.push(SimulatedTrade {
            side,
            entry_date: bar.date,
            entry_price: fill,
            exit_date: None,
            exit_price: None,
            quantity,
            pnl: 0.0,
            reason: reason.clone(),
            entry_reason: reason,
        });
        self.open = Some(OpenPosition {
            position: SimulatedPosition {
                symbol: self.symbol.to_string(),
                quantity,
                entry_price: fill,
                side,
            },
            entry_commission: commission,
            trade_index: self.trades.len() - 1,
        });
    }

    fn close(&mut self, bar: &PriceBar, reason: String) {
        let Some(open) = self.open.take() else {
            return;
        };
        let position = &open.position;
        let buying = position.side == PositionSide::Short;
        let fill = apply_slippage(bar.close, self.config.slippage_pct, buying);
        let qty = position.quantity as f64;
        let exit_commission = calculate_commission(qty * fill, self.config.commission_pct);

        let price_pnl = match position.side {
            PositionSide::Long => qty * (fill - position.entry_price),
            PositionSide::Short => qty * (position.entry_price - fill),
        };
        let pnl = price_pnl - open.entry_commission - exit_commission;
        self.cash += position.value(fill) - exit_commission;

        debug!(
            symbol = self.symbol,
            date = %bar.date,
            price = fill,
            pnl,
            reason = %reason,
            "arena exit"
        );
        if let Some(trade) = self.trades.get_mut(open.trade_index) {
            trade.exit_date = Some(bar.date);
            trade.exit_price = Some(fill);
            trade.pnl = pnl;
            trade.reason = reason;
        }
    }
}

/// Runs the arena over `bars` (ascending by date).
///
/// Fails when the series is empty, unsorted, or no longer than the warm-up.
pub fn run_arena(symbol: &str, bars: &[PriceBar], config: &ArenaConfig) -> Result<BacktestReport, CouncilError> {
    if bars.is_empty() {
        return Err(CouncilError::NoData {
            symbol: symbol.to_string(),
        });
    }
    if let Some(index) = first_unsorted_index(bars) {
        return Err(CouncilError::UnsortedBars {
            symbol: symbol.to_string(),
            index,
        });
    }
    if bars.len() <= config.warmup_bars {
        return Err(CouncilError::InsufficientData {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum: config.warmup_bars + 1,
        });
    }

    let span = info_span!("arena", symbol, bars = bars.len());
    let _guard = span.enter();

    let council = Council::technical();
    let mut arena = Arena {
        symbol,
        config,
        cash: config.initial_balance,
        open: None,
        trades: Vec::new(),
    };
    let mut drawdown = DrawdownTracker::new(config.initial_balance);
    let mut equity_curve = Vec::with_capacity(bars.len() - config.warmup_bars);

    for i in config.warmup_bars..bars.len() {
        let bar = &bars[i];
        let consensus = council.analyze(&bars[..=i], &[]);

        let exit = arena
            .open
            .as_ref()
            .and_then(|o| arena.exit_reason(&o.position, bar, &consensus));
        match exit {
            Some(reason) => arena.close(bar, reason),
            None if arena.open.is_none() => arena.try_enter(bar, &consensus),
            None => {}
        }

        let equity = arena.equity(bar.close);
        drawdown.update(equity);
        equity_curve.push(EquityPoint {
            date: bar.date,
            equity,
        });
    }

    if arena.open.is_some() {
        if let Some(last) = bars.last() {
            arena.close(last, END_OF_BACKTEST.to_string());
        }
        if let Some(point) = equity_curve.last_mut() {
            point.equity = arena.cash;
            drawdown.update(arena.cash);
        }
    }

    let final_balance = arena.cash;
    let stats = TradeStats::from_pnls(arena.trades.iter().filter(|t| t.is_closed()).map(|t| t.pnl));
    let profit = final_balance - config.initial_balance;
    let profit_percent = if config.initial_balance > 0.0 {
        profit / config.initial_balance * 100.0
    } else {
        0.0
    };

    info!(
        trades = stats.trades,
        final_balance,
        profit_percent,
        max_drawdown = drawdown.max_drawdown(),
        "arena complete"
    );

    Ok(BacktestReport {
        symbol: symbol.to_string(),
        initial_balance: config.initial_balance,
        final_balance,
        profit,
        profit_percent,
        trade_count: stats.trades,
        win_rate: stats.win_rate(),
        max_drawdown: drawdown.max_drawdown(),
        profit_factor: stats.profit_factor(),
        gross_profit: stats.gross_profit,
        gross_loss: stats.gross_loss,
        trades: arena.trades,
        equity_curve,
    })
}
