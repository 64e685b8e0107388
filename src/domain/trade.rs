//! Executed trades.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::TradesimError;
use super::signal::Action;

/// A single fill. Validated on construction and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    date: NaiveDate,
    action: Action,
    price_per_share: Decimal,
    share_count: u64,
    commission: Decimal,
}

impl Trade {
    pub fn new(
        date: NaiveDate,
        action: Action,
        price_per_share: Decimal,
        share_count: u64,
        commission: Decimal,
    ) -> Result<Self, TradesimError> {
        if price_per_share <= Decimal::ZERO {
            return Err(TradesimError::invalid_trade(format!(
                "price per share must be positive, got {price_per_share}"
            )));
        }
        if share_count == 0 {
            return Err(TradesimError::invalid_trade("share count must be positive"));
        }
        if commission < Decimal::ZERO {
            return Err(TradesimError::invalid_trade(format!(
                "commission must be non-negative, got {commission}"
            )));
        }

        Ok(Trade {
            date,
            action,
            price_per_share,
            share_count,
            commission,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn price_per_share(&self) -> Decimal {
        self.price_per_share
    }

    pub fn share_count(&self) -> u64 {
        self.share_count
    }

    pub fn commission(&self) -> Decimal {
        self.commission
    }

    /// price * shares
    pub fn gross_value(&self) -> Decimal {
        self.price_per_share * Decimal::from(self.share_count)
    }

    /// Signed cash effect: `cash -= total_cost` applies the trade.
    /// Buy: gross + commission. Sell: -(gross - commission).
    pub fn total_cost(&self) -> Decimal {
        match self.action {
            Action::Buy => self.gross_value() + self.commission,
            Action::Sell => -(self.gross_value() - self.commission),
        }
    }
}
