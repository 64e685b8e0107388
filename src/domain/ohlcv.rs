//! Daily OHLC bars and the ordered series a backtest consumes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::TradesimError;

/// One day's OHLC record. Fields are private so the OHLC relationships
/// checked in [`PriceBar::new`] hold for the bar's whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBar {
    date: NaiveDate,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
}

impl PriceBar {
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Result<Self, TradesimError> {
        let fail = |reason: String| TradesimError::DataValidation {
            date: date.to_string(),
            reason,
        };

        if high < low {
            return Err(fail(format!("high {high} is below low {low}")));
        }
        if high < open || high < close {
            return Err(fail(format!(
                "high {high} must be >= open {open} and close {close}"
            )));
        }
        if low > open || low > close {
            return Err(fail(format!(
                "low {low} must be <= open {open} and close {close}"
            )));
        }

        Ok(PriceBar {
            date,
            open,
            high,
            low,
            close,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn open(&self) -> Decimal {
        self.open
    }

    pub fn high(&self) -> Decimal {
        self.high
    }

    pub fn low(&self) -> Decimal {
        self.low
    }

    pub fn close(&self) -> Decimal {
        self.close
    }
}

/// Bars in strictly ascending date order, one per trading day.
///
/// May be empty; consumers that need data (indicators, the engine) reject an
/// empty series themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, TradesimError> {
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(TradesimError::DataValidation {
                date: pair[1].date.to_string(),
                reason: format!("bar is not after previous bar dated {}", pair[0].date),
            });
        }
        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}
