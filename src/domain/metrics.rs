//! Performance statistics shared by the arena and the portfolio backtest.

use crate::domain::indicator::{pct_returns, stddev};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const RISK_FREE_RATE: f64 = 0.02;

/// Running peak-to-trough tracker. Drawdown is reported in percent of peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    pub fn new(initial: f64) -> Self {
        DrawdownTracker {
            peak: initial,
            max_drawdown: 0.0,
        }
    }

    /// Feeds one equity observation; returns the current drawdown percent.
    pub fn update(&mut self, value: f64) -> f64 {
        if value > self.peak {
            self.peak = value;
        }
        let drawdown = if self.peak > 0.0 {
            (self.peak - value) / self.peak * 100.0
        } else {
            0.0
        };
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        drawdown
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

/// Win/loss tallies over closed-trade PnLs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TradeStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub gross_profit: f64,
    /// Sum of losing PnLs as a positive number.
    pub gross_loss: f64,
}

impl TradeStats {
    pub fn from_pnls<I: IntoIterator<Item = f64>>(pnls: I) -> Self {
        let mut stats = TradeStats::default();
        for pnl in pnls {
            stats.trades += 1;
            if pnl > 0.0 {
                stats.wins += 1;
                stats.gross_profit += pnl;
            } else if pnl < 0.0 {
                stats.losses += 1;
                stats.gross_loss += pnl.abs();
            }
        }
        stats
    }

    /// Percent of trades with positive PnL; 0 with no trades.
    pub fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            return 0.0;
        }
        self.wins as f64 / self.trades as f64 * 100.0
    }

    /// gross profit / gross loss. With no losing trade this is the gross
    /// profit itself, never infinity.
    pub fn profit_factor(&self) -> f64 {
        if self.gross_loss == 0.0 {
            self.gross_profit
        } else {
            self.gross_profit / self.gross_loss
        }
    }
}

/// (final / initial)^(252 / days) - 1, as a fraction. Zero when any input is
/// degenerate.
pub fn cagr(initial: f64, final_value: f64, trading_days: usize) -> f64 {
    if initial <= 0.0 || final_value <= 0.0 || trading_days == 0 {
        return 0.0;
    }
    (final_value / initial).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0
}

/// Population standard deviation of day-over-day returns, scaled by √252.
pub fn annualized_volatility(values: &[f64]) -> f64 {
    let returns = pct_returns(values);
    stddev(&returns, returns.len()) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// (CAGR - risk free) / volatility, 0 when volatility is 0.
pub fn sharpe_ratio(cagr: f64, volatility: f64) -> f64 {
    if volatility == 0.0 {
        return 0.0;
    }
    (cagr - RISK_FREE_RATE) / volatility
}
