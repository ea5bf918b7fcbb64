use rust_decimal::Decimal;
use thiserror::Error;

/// Input-shape failures raised before any aggregation or forecasting runs.
///
/// Anticipated conditions (empty data, non-positive contribution, goals already
/// met) never surface here; they map to sentinel values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Target amount must not be negative (got {0})")]
    NegativeTarget(Decimal),
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
    #[error("Purchase cost must not be negative (got {0})")]
    NegativePurchaseCost(Decimal),
    #[error("Window must cover at least one month")]
    EmptyWindow,
    #[error("Invalid entry kind: {0}")]
    InvalidKind(String),
    #[error("Malformed date `{0}`, expected YYYY-MM-DD")]
    MalformedDate(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
