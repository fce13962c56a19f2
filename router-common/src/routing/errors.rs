use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected before any path search is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Source and destination must differ: {0}")]
    IdenticalAssets(String),

    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
}
