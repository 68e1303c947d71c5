//! Error handling for satstack
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for ledger, rate and price operations
#[derive(Error, Debug)]
pub enum SatstackError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("pricing error: {0}")]
    PricingError(String),

    #[error("rates error: {0}")]
    RatesError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

impl SatstackError {
    pub fn overflow(what: &str) -> Self {
        SatstackError::Overflow(what.to_string())
    }
}

/// Result type alias for satstack operations
pub type Result<T> = anyhow::Result<T>;
