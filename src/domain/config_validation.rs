//! Configuration validation.
//!
//! Checks every config field before a run so a bad value is reported against
//! its `[section] key` rather than surfacing later as a domain error.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const STRATEGY_TYPES: [&str; 3] = ["sma_crossover", "rsi", "buy_and_hold"];

pub const DEFAULT_SHORT_PERIOD: i64 = 20;
pub const DEFAULT_LONG_PERIOD: i64 = 50;
pub const DEFAULT_RSI_PERIOD: i64 = 14;
pub const DEFAULT_OVERSOLD: i64 = 30;
pub const DEFAULT_OVERBOUGHT: i64 = 70;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_initial_cash(config)?;
    validate_commission(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_strategy_type(config)?;
    validate_sma_periods(config)?;
    validate_rsi_params(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TradesimError {
    TradesimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Read a decimal, rejecting values that are present but unparseable.
fn decimal_field(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: Decimal,
) -> Result<Decimal, TradesimError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => Decimal::from_str(raw.trim())
            .map_err(|_| invalid(section, key, format!("{:?} is not a number", raw))),
    }
}

fn int_field(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, TradesimError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(section, key, format!("{:?} is not an integer", raw))),
    }
}

/// Parse an optional `YYYY-MM-DD` date from `[data]`.
pub fn optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, TradesimError> {
    config
        .get_string("data", key)
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                invalid(
                    "data",
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            })
        })
        .transpose()
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    if config.get_string("backtest", "initial_cash").is_none() {
        return Err(TradesimError::ConfigMissing {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
        });
    }
    let value = decimal_field(config, "backtest", "initial_cash", Decimal::ZERO)?;
    if value <= Decimal::ZERO {
        return Err(invalid(
            "backtest",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = decimal_field(config, "backtest", "commission_per_trade", Decimal::ZERO)?;
    if value < Decimal::ZERO {
        return Err(invalid(
            "backtest",
            "commission_per_trade",
            "commission_per_trade must be non-negative",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let start = optional_date(config, "start_date")?;
    let end = optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn validate_strategy_type(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let Some(kind) = config.get_string("strategy", "type") else {
        return Ok(());
    };
    let kind = kind.trim().to_lowercase();
    if !STRATEGY_TYPES.contains(&kind.as_str()) {
        return Err(invalid(
            "strategy",
            "type",
            format!(
                "unknown strategy type {:?}, expected one of {}",
                kind,
                STRATEGY_TYPES.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_sma_periods(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let short = int_field(config, "strategy", "short_period", DEFAULT_SHORT_PERIOD)?;
    let long = int_field(config, "strategy", "long_period", DEFAULT_LONG_PERIOD)?;

    if short <= 0 {
        return Err(invalid("strategy", "short_period", "short_period must be positive"));
    }
    if long <= 0 {
        return Err(invalid("strategy", "long_period", "long_period must be positive"));
    }
    if short >= long {
        return Err(invalid(
            "strategy",
            "short_period",
            "short_period must be less than long_period",
        ));
    }
    Ok(())
}

fn validate_rsi_params(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let period = int_field(config, "strategy", "rsi_period", DEFAULT_RSI_PERIOD)?;
    if period <= 0 {
        return Err(invalid("strategy", "rsi_period", "rsi_period must be positive"));
    }

    let oversold = decimal_field(config, "strategy", "oversold", Decimal::from(DEFAULT_OVERSOLD))?;
    let overbought = decimal_field(
        config,
        "strategy",
        "overbought",
        Decimal::from(DEFAULT_OVERBOUGHT),
    )?;

    if oversold <= Decimal::ZERO || oversold >= Decimal::ONE_HUNDRED {
        return Err(invalid("strategy", "oversold", "oversold must be between 0 and 100"));
    }
    if overbought <= Decimal::ZERO || overbought >= Decimal::ONE_HUNDRED {
        return Err(invalid("strategy", "overbought", "overbought must be between 0 and 100"));
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: &TradesimError) -> &str {
        match err {
            TradesimError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn valid_backtest_config_passes() {
        let config = make_config(
            r#"
[data]
directory = ./data
symbol = AAPL
start_date = 2020-01-01
end_date = 2024-12-31

[backtest]
initial_cash = 10000
commission_per_trade = 4.95
"#,
        );
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn dates_are_optional() {
        let config = make_config("[backtest]\ninitial_cash = 1000\n");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn missing_initial_cash_fails() {
        let config = make_config("[backtest]\ncommission_per_trade = 1\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, TradesimError::ConfigMissing { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn initial_cash_zero_fails() {
        let config = make_config("[backtest]\ninitial_cash = 0\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "initial_cash");
    }

    #[test]
    fn initial_cash_not_a_number_fails() {
        let config = make_config("[backtest]\ninitial_cash = lots\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "initial_cash");
    }

    #[test]
    fn commission_negative_fails() {
        let config = make_config("[backtest]\ninitial_cash = 1000\ncommission_per_trade = -5\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "commission_per_trade");
    }

    #[test]
    fn invalid_date_format_fails() {
        let config =
            make_config("[data]\nstart_date = 2020/01/01\n[backtest]\ninitial_cash = 1000\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "start_date");
    }

    #[test]
    fn start_after_end_fails() {
        let config = make_config(
            "[data]\nstart_date = 2024-12-31\nend_date = 2020-01-01\n[backtest]\ninitial_cash = 1000\n",
        );
        let err = validate_backtest_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "start_date");
    }

    #[test]
    fn same_start_and_end_passes() {
        let config = make_config(
            "[data]\nstart_date = 2024-01-02\nend_date = 2024-01-02\n[backtest]\ninitial_cash = 1000\n",
        );
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn valid_strategy_config_passes() {
        let config = make_config(
            r#"
[strategy]
type = sma_crossover
short_period = 20
long_period = 50
rsi_period = 14
oversold = 30
overbought = 70
"#,
        );
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn empty_strategy_section_uses_defaults() {
        let config = make_config("[strategy]\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn unknown_type_fails() {
        let config = make_config("[strategy]\ntype = macd\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "type");
    }

    #[test]
    fn type_is_case_insensitive() {
        let config = make_config("[strategy]\ntype = Buy_And_Hold\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn short_not_below_long_fails() {
        let config = make_config("[strategy]\nshort_period = 50\nlong_period = 50\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "short_period");
    }

    #[test]
    fn zero_period_fails() {
        let config = make_config("[strategy]\nshort_period = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "short_period");

        let config = make_config("[strategy]\nrsi_period = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "rsi_period");
    }

    #[test]
    fn non_integer_period_fails() {
        let config = make_config("[strategy]\nlong_period = fifty\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "long_period");
    }

    #[test]
    fn thresholds_out_of_order_fail() {
        let config = make_config("[strategy]\noversold = 70\noverbought = 30\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "oversold");
    }

    #[test]
    fn threshold_out_of_range_fails() {
        let config = make_config("[strategy]\noverbought = 100\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(&err), "overbought");
    }

    #[test]
    fn optional_date_parses() {
        let config = make_config("[data]\nstart_date = 2024-03-01\n");
        assert_eq!(
            optional_date(&config, "start_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(optional_date(&config, "end_date").unwrap(), None);
    }
}
