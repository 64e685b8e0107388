//! Trade signals emitted by strategies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

/// A strategy's recommendation for one date. `rationale` is diagnostic text
/// only; nothing downstream reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSignal {
    pub date: NaiveDate,
    pub action: Action,
    pub reference_price: Decimal,
    pub rationale: String,
}

impl TradeSignal {
    pub fn buy(date: NaiveDate, reference_price: Decimal, rationale: impl Into<String>) -> Self {
        TradeSignal {
            date,
            action: Action::Buy,
            reference_price,
            rationale: rationale.into(),
        }
    }

    pub fn sell(date: NaiveDate, reference_price: Decimal, rationale: impl Into<String>) -> Self {
        TradeSignal {
            date,
            action: Action::Sell,
            reference_price,
            rationale: rationale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn action_display() {
        assert_eq!(Action::Buy.to_string(), "BUY");
        assert_eq!(Action::Sell.to_string(), "SELL");
    }

    #[test]
    fn constructors_set_action() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let buy = TradeSignal::buy(date, dec!(12.5), "cross up");
        let sell = TradeSignal::sell(date, dec!(11), "cross down");

        assert_eq!(buy.action, Action::Buy);
        assert_eq!(buy.reference_price, dec!(12.5));
        assert_eq!(buy.rationale, "cross up");
        assert_eq!(sell.action, Action::Sell);
    }
}
