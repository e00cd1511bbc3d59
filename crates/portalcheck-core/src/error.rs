use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rewards file {path}: {source}")]
    RewardsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rewards file: {0}")]
    RewardsFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

/// Rejection reasons for a capture payload arriving at the engine boundary.
///
/// Malformed snapshots are refused here and never enter the flow context.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("price amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("price amount {0} exceeds the plausible extraction ceiling")]
    ImplausibleAmount(Decimal),

    #[error("unknown currency code: {0:?}")]
    UnknownCurrency(String),
}
