//! Domain error types.

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradesimError {
    #[error("invalid price bar on {date}: {reason}")]
    DataValidation { date: String, reason: String },

    #[error("invalid trade: {reason}")]
    InvalidTrade { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("{indicator} unavailable on {date}")]
    IndicatorUnavailable { indicator: String, date: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradesimError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        TradesimError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_trade(reason: impl Into<String>) -> Self {
        TradesimError::InvalidTrade {
            reason: reason.into(),
        }
    }
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io(_) => 1,
            TradesimError::ConfigParse { .. }
            | TradesimError::ConfigMissing { .. }
            | TradesimError::ConfigInvalid { .. } => 2,
            TradesimError::Data { .. } => 3,
            TradesimError::DataValidation { .. }
            | TradesimError::InvalidTrade { .. }
            | TradesimError::InvalidParameter { .. }
            | TradesimError::IndicatorUnavailable { .. } => 4,
            TradesimError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
