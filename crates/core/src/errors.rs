//! Core error types for Ledgerfolio.
//!
//! Every variant here aborts a run. Data-availability gaps are not errors;
//! they travel as [`HoldingsCalculationWarning`](crate::portfolio::snapshot::HoldingsCalculationWarning)
//! and [`PriceGap`](crate::portfolio::performance::PriceGap) values alongside results.

use chrono::NaiveDate;
use thiserror::Error;

use ledgerfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to ingest {path}: {message}")]
    Ingestion { path: String, message: String },

    #[error("Malformed trade in {source_name} at line {line}: {message}")]
    MalformedTrade {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Market data ingestion failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Portfolio reconstruction failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Failed to write report {path}: {message}")]
    Report { path: String, message: String },

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Errors that occur while replaying the trade ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Trade ledger is empty, nothing to reconstruct")]
    EmptyLedger,

    #[error("Unknown trade side '{side}' for {code} on {date}")]
    UnknownTradeSide {
        side: String,
        code: String,
        date: NaiveDate,
    },

    #[error("Arithmetic overflow in {operation} for {code} on {date}")]
    ArithmeticOverflow {
        operation: String,
        code: String,
        date: NaiveDate,
    },
}

impl CalculatorError {
    pub(crate) fn overflow(operation: &str, code: &str, date: NaiveDate) -> Self {
        CalculatorError::ArithmeticOverflow {
            operation: operation.to_string(),
            code: code.to_string(),
            date,
        }
    }
}
