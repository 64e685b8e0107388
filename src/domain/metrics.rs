//! Performance metrics computed from a finished backtest.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::backtest::{BacktestResult, PortfolioSnapshot};
use super::signal::Action;
use super::trade::Trade;

/// Stand-in profit factor when there are winning pairs and no losses.
pub const PROFIT_FACTOR_CAP: Decimal = dec!(999);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Percent change from initial to final value.
    pub total_return: Decimal,
    pub total_profit: Decimal,
    /// Calendar days between the first and last bar.
    pub trading_days: i64,
    /// Largest peak-to-trough decline of the equity curve, in percent.
    pub max_drawdown: Decimal,
    pub total_trades: usize,
    pub total_pairs: usize,
    pub winning_trades: usize,
    /// Pairs with profit <= 0, break-evens included.
    pub losing_trades: usize,
    pub win_rate: Decimal,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
    pub profit_factor: Decimal,
    pub total_commissions: Decimal,
}

/// A buy matched with the sell that closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePair {
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub share_count: u64,
    pub profit: Decimal,
}

impl TradePair {
    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

/// Match buys with the sells that close them.
///
/// Scans in date order holding at most one open buy. A buy replaces any open
/// buy; a sell closes the open buy, or is skipped if there is none. Profit is
/// scaled by the buy's share count since a sell always liquidates the whole
/// position. A buy still open at the end is left unpaired.
pub fn pair_trades(trades: &[Trade]) -> Vec<TradePair> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.date());

    let mut pairs = Vec::new();
    let mut open_buy: Option<&Trade> = None;

    for trade in ordered {
        match trade.action() {
            Action::Buy => open_buy = Some(trade),
            Action::Sell => {
                let Some(buy) = open_buy.take() else {
                    continue;
                };
                let profit = (trade.price_per_share() - buy.price_per_share())
                    * Decimal::from(buy.share_count())
                    - buy.commission()
                    - trade.commission();
                pairs.push(TradePair {
                    buy_date: buy.date(),
                    sell_date: trade.date(),
                    buy_price: buy.price_per_share(),
                    sell_price: trade.price_per_share(),
                    share_count: buy.share_count(),
                    profit,
                });
            }
        }
    }

    pairs
}

impl PerformanceMetrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let total_profit = result.final_value - result.initial_value;
        let total_return = if result.initial_value.is_zero() {
            Decimal::ZERO
        } else {
            total_profit / result.initial_value * Decimal::ONE_HUNDRED
        };
        let trading_days = (result.end_date - result.start_date).num_days();
        let max_drawdown = compute_drawdown(&result.equity_curve);

        let pairs = pair_trades(&result.trades);
        let (wins, losses): (Vec<&TradePair>, Vec<&TradePair>) =
            pairs.iter().partition(|p| p.is_win());

        let total_win: Decimal = wins.iter().map(|p| p.profit).sum();
        let total_loss: Decimal = losses.iter().map(|p| p.profit).sum();

        let win_rate = ratio(wins.len(), pairs.len()) * Decimal::ONE_HUNDRED;
        let average_win = mean(total_win, wins.len());
        let average_loss = mean(total_loss, losses.len());
        let largest_win = wins.iter().map(|p| p.profit).max().unwrap_or_default();
        let largest_loss = losses.iter().map(|p| p.profit).min().unwrap_or_default();

        let profit_factor = if !total_loss.is_zero() {
            total_win / total_loss.abs()
        } else if total_win > Decimal::ZERO {
            PROFIT_FACTOR_CAP
        } else {
            Decimal::ZERO
        };

        let total_commissions = result.trades.iter().map(Trade::commission).sum();

        PerformanceMetrics {
            total_return,
            total_profit,
            trading_days,
            max_drawdown,
            total_trades: result.trades.len(),
            total_pairs: pairs.len(),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate,
            average_win,
            average_loss,
            largest_win,
            largest_loss,
            profit_factor,
            total_commissions,
        }
    }
}

fn ratio(count: usize, total: usize) -> Decimal {
    if total == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(count) / Decimal::from(total)
    }
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

fn compute_drawdown(equity_curve: &[PortfolioSnapshot]) -> Decimal {
    let Some(first) = equity_curve.first() else {
        return Decimal::ZERO;
    };

    let mut peak = first.total_value;
    let mut max_dd = Decimal::ZERO;

    for point in equity_curve {
        if point.total_value > peak {
            peak = point.total_value;
        } else if peak > Decimal::ZERO {
            let dd = (peak - point.total_value) / peak * Decimal::ONE_HUNDRED;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
