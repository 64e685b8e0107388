//! Cash-and-shares portfolio for a single instrument.
//!
//! The only mutation path is [`Portfolio::execute_trade`], which keeps
//! `cash >= 0` and never lets the share count go negative.

use rust_decimal::Decimal;

use super::error::TradesimError;
use super::signal::Action;
use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    cash: Decimal,
    shares_owned: u64,
    trade_history: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_cash: Decimal) -> Result<Self, TradesimError> {
        if initial_cash < Decimal::ZERO {
            return Err(TradesimError::invalid_parameter(
                "initial_cash",
                format!("must be non-negative, got {initial_cash}"),
            ));
        }
        Ok(Portfolio {
            cash: initial_cash,
            shares_owned: 0,
            trade_history: Vec::new(),
        })
    }

    /// Apply `trade` if the portfolio can afford it.
    ///
    /// Returns `false` without touching any state when a buy costs more than
    /// the available cash or a sell asks for more shares than are held. A sell
    /// whose commission exceeds its proceeds is also refused if the shortfall
    /// would take cash below zero.
    pub fn execute_trade(&mut self, trade: Trade) -> bool {
        if self.cash < trade.total_cost() {
            return false;
        }
        match trade.action() {
            Action::Buy => {
                self.shares_owned += trade.share_count();
            }
            Action::Sell => {
                if self.shares_owned < trade.share_count() {
                    return false;
                }
                self.shares_owned -= trade.share_count();
            }
        }
        self.cash -= trade.total_cost();
        self.trade_history.push(trade);
        true
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn shares_owned(&self) -> u64 {
        self.shares_owned
    }

    pub fn trade_history(&self) -> &[Trade] {
        &self.trade_history
    }

    pub fn into_trade_history(self) -> Vec<Trade> {
        self.trade_history
    }

    pub fn total_value(&self, market_price: Decimal) -> Decimal {
        self.cash + Decimal::from(self.shares_owned) * market_price
    }

    pub fn total_commissions_paid(&self) -> Decimal {
        self.trade_history.iter().map(Trade::commission).sum()
    }

    pub fn trade_count(&self) -> usize {
        self.trade_history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn buy(price: Decimal, shares: u64, commission: Decimal) -> Trade {
        Trade::new(day(2), Action::Buy, price, shares, commission).unwrap()
    }

    fn sell(price: Decimal, shares: u64, commission: Decimal) -> Trade {
        Trade::new(day(5), Action::Sell, price, shares, commission).unwrap()
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert_eq!(portfolio.cash(), dec!(1000));
        assert_eq!(portfolio.shares_owned(), 0);
        assert!(portfolio.trade_history().is_empty());
        assert_eq!(portfolio.trade_count(), 0);
    }

    #[test]
    fn zero_cash_allowed() {
        let portfolio = Portfolio::new(Decimal::ZERO).unwrap();
        assert_eq!(portfolio.total_value(dec!(100)), dec!(0));
    }

    #[test]
    fn negative_cash_rejected() {
        let err = Portfolio::new(dec!(-1)).unwrap_err();
        assert!(matches!(err, TradesimError::InvalidParameter { .. }));
    }

    #[test]
    fn buy_deducts_cost_and_adds_shares() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(10), 50, dec!(5))));

        assert_eq!(portfolio.cash(), dec!(495));
        assert_eq!(portfolio.shares_owned(), 50);
        assert_eq!(portfolio.trade_count(), 1);
    }

    #[test]
    fn buy_using_exactly_all_cash() {
        let mut portfolio = Portfolio::new(dec!(505)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(10), 50, dec!(5))));
        assert_eq!(portfolio.cash(), dec!(0));
    }

    #[test]
    fn unaffordable_buy_rejected_without_mutation() {
        let mut portfolio = Portfolio::new(dec!(100)).unwrap();
        let before = portfolio.clone();

        assert!(!portfolio.execute_trade(buy(dec!(10), 10, dec!(1))));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn oversized_sell_rejected_without_mutation() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(10), 10, dec!(0))));
        let before = portfolio.clone();

        assert!(!portfolio.execute_trade(sell(dec!(10), 11, dec!(0))));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn sell_with_no_shares_rejected() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(!portfolio.execute_trade(sell(dec!(10), 1, dec!(0))));
        assert_eq!(portfolio.cash(), dec!(1000));
        assert_eq!(portfolio.trade_count(), 0);
    }

    #[test]
    fn sell_commission_cannot_overdraw_cash() {
        let mut portfolio = Portfolio::new(dec!(1)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(1), 1, dec!(0))));
        let before = portfolio.clone();

        // proceeds 1, commission 5 → net outflow 4 with 0 cash
        assert!(!portfolio.execute_trade(sell(dec!(1), 1, dec!(5))));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn round_trip_restores_shares_and_accounts_for_costs() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(20), 40, dec!(2.50))));
        assert!(portfolio.execute_trade(sell(dec!(21.5), 40, dec!(2.50))));

        assert_eq!(portfolio.shares_owned(), 0);
        // +1.5 * 40 price gain, minus two commissions
        assert_eq!(portfolio.cash(), dec!(1000) + dec!(60) - dec!(5));
        assert_eq!(portfolio.total_commissions_paid(), dec!(5));
        assert_eq!(portfolio.trade_count(), 2);
    }

    #[test]
    fn total_value_marks_shares_to_market() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(10), 60, dec!(0))));

        assert_eq!(portfolio.total_value(dec!(10)), dec!(1000));
        assert_eq!(portfolio.total_value(dec!(12.5)), dec!(1150));
    }

    #[test]
    fn history_is_in_execution_order() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert!(portfolio.execute_trade(buy(dec!(10), 10, dec!(1))));
        assert!(portfolio.execute_trade(sell(dec!(12), 10, dec!(1))));

        let actions: Vec<_> = portfolio
            .into_trade_history()
            .iter()
            .map(Trade::action)
            .collect();
        assert_eq!(actions, vec![Action::Buy, Action::Sell]);
    }
}
