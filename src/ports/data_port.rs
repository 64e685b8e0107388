//! Data access port trait.

use crate::domain::error::TradesimError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Load the validated, ascending series for `symbol`, optionally bounded
    /// to `[start_date, end_date]` inclusive.
    fn load_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, TradesimError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradesimError>;
}
