use crate::exchange::ExchangeError;
use router_common::TransitionError;
use thiserror::Error;

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid state: {0}")]
    State(#[from] TransitionError),

    #[error("Router is busy ({0})")]
    Busy(&'static str),

    #[error("Market metadata not loaded")]
    MetadataMissing,

    #[error("Unsupported order: {0}")]
    UnsupportedOrder(String),
}
