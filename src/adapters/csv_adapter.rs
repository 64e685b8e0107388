//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<symbol>.csv`, with a header row naming
//! at least `date,open,high,low,close`. Rows that fail to parse or break the
//! OHLC rules are skipped with a warning; the domain only ever sees a
//! validated, ascending [`PriceSeries`].

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const REQUIRED_COLUMNS: [&str; 5] = ["date", "open", "high", "low", "close"];

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

/// Positions of the required columns, matched case-insensitively.
fn column_indices(headers: &StringRecord) -> Result<[usize; 5], TradesimError> {
    let mut indices = [0usize; 5];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| TradesimError::Data {
                reason: format!("missing {} column", name),
            })?;
    }
    Ok(indices)
}

fn parse_row(record: &StringRecord, cols: &[usize; 5]) -> Result<PriceBar, String> {
    let field = |i: usize| {
        record
            .get(cols[i])
            .map(str::trim)
            .ok_or_else(|| format!("missing {} value", REQUIRED_COLUMNS[i]))
    };
    let price = |i: usize| -> Result<Decimal, String> {
        let raw = field(i)?;
        Decimal::from_str(raw).map_err(|e| format!("invalid {} value {:?}: {}", REQUIRED_COLUMNS[i], raw, e))
    };

    let date_str = field(0)?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| format!("invalid date {:?}: {}", date_str, e))?;

    PriceBar::new(date, price(1)?, price(2)?, price(3)?, price(4)?).map_err(|e| e.to_string())
}

impl DataPort for CsvAdapter {
    fn load_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, TradesimError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TradesimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| TradesimError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let cols = column_indices(headers)?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for (line, result) in rdr.records().enumerate() {
            let parsed = result
                .map_err(|e| e.to_string())
                .and_then(|record| parse_row(&record, &cols));
            let bar = match parsed {
                Ok(bar) => bar,
                Err(reason) => {
                    tracing::warn!(symbol, row = line + 2, %reason, "skipping malformed row");
                    skipped += 1;
                    continue;
                }
            };

            if start_date.is_some_and(|s| bar.date() < s) || end_date.is_some_and(|e| bar.date() > e)
            {
                continue;
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date());
        let before_dedup = bars.len();
        bars.dedup_by_key(|b| b.date());
        if bars.len() < before_dedup {
            tracing::warn!(
                symbol,
                duplicates = before_dedup - bars.len(),
                "dropped bars with repeated dates"
            );
        }

        if bars.is_empty() {
            return Err(TradesimError::NoData {
                symbol: symbol.to_string(),
            });
        }

        tracing::debug!(symbol, bars = bars.len(), skipped, "loaded price series");
        PriceSeries::new(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradesimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradesimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TradesimError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
