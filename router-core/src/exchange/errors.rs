// exchange/errors.rs

use thiserror::Error;

/// Error types for exchange operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Data parsing error: {0}")]
    ParseError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

// Convert from common error types
impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::NetworkError(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for ExchangeError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        ExchangeError::EncodingError(err.to_string())
    }
}

impl From<k256::ecdsa::Error> for ExchangeError {
    fn from(err: k256::ecdsa::Error) -> Self {
        ExchangeError::SigningError(err.to_string())
    }
}
