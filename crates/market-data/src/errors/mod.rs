//! Error types for the market data crate.
//!
//! Every variant is fatal for a run: price ingestion happens before any
//! computation and nothing downstream can recover from a partial feed.

use thiserror::Error;

/// Errors that can occur while reading a price feed.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The feed could not be read from storage.
    #[error("Failed to read price feed {path}: {message}")]
    Ingestion {
        /// Path of the feed that failed to load
        path: String,
        /// Underlying I/O failure
        message: String,
    },

    /// A quote line could not be converted into a price record.
    #[error("Malformed price in {feed} at line {line}: {message}")]
    MalformedPrice {
        /// Name of the feed the line came from
        feed: String,
        /// 1-based line number within the feed
        line: usize,
        /// What failed to convert
        message: String,
    },
}

impl MarketDataError {
    /// Returns the 1-based line number for line-level failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgerfolio_market_data::errors::MarketDataError;
    ///
    /// let error = MarketDataError::MalformedPrice {
    ///     feed: "COTAHIST_A2020.TXT".to_string(),
    ///     line: 42,
    ///     message: "invalid date".to_string(),
    /// };
    /// assert_eq!(error.line(), Some(42));
    /// ```
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedPrice { line, .. } => Some(*line),
            Self::Ingestion { .. } => None,
        }
    }
}

/// Result alias for market data operations.
pub type Result<T> = std::result::Result<T, MarketDataError>;
