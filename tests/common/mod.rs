#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tradesim::domain::backtest::BacktestConfig;
use tradesim::domain::error::TradesimError;
pub use tradesim::domain::ohlcv::{PriceBar, PriceSeries};
use tradesim::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: PriceSeries) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, TradesimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradesimError::Data {
                reason: reason.clone(),
            });
        }
        let series = self.data.get(symbol).ok_or_else(|| TradesimError::NoData {
            symbol: symbol.to_string(),
        })?;

        let bars: Vec<PriceBar> = series
            .bars()
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date() >= s))
            .filter(|b| end_date.is_none_or(|e| b.date() <= e))
            .cloned()
            .collect();
        if bars.is_empty() {
            return Err(TradesimError::NoData {
                symbol: symbol.to_string(),
            });
        }
        PriceSeries::new(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradesimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Bar with open/high/low collapsed onto the close.
pub fn make_bar(date_str: &str, close: Decimal) -> PriceBar {
    PriceBar::new(date(date_str), close, close, close, close).unwrap()
}

/// Consecutive daily bars starting 2024-01-01, one per close.
pub fn make_series(closes: &[Decimal]) -> PriceSeries {
    let start = date("2024-01-01");
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let d = start + chrono::Duration::days(i as i64);
            PriceBar::new(d, c, c, c, c).unwrap()
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Like [`make_series`] but from whole-number closes.
pub fn series_of(closes: &[i64]) -> PriceSeries {
    let closes: Vec<Decimal> = closes.iter().map(|&c| Decimal::from(c)).collect();
    make_series(&closes)
}

pub fn sample_config(initial_cash: i64) -> BacktestConfig {
    BacktestConfig {
        initial_cash: Decimal::from(initial_cash),
        commission_per_trade: Decimal::ZERO,
    }
}

/// Write `<dir>/<symbol>.csv` from a series.
pub fn write_csv(dir: &std::path::Path, symbol: &str, series: &PriceSeries) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in series.bars() {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            bar.date(),
            bar.open(),
            bar.high(),
            bar.low(),
            bar.close()
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
