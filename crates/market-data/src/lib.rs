//! Ledgerfolio Market Data Crate
//!
//! Turns end-of-day market data feeds into [`PriceRecord`]s.
//!
//! # Overview
//!
//! The only supported feed is the B3 historical quotes file (COTAHIST), a
//! fixed-width, line-oriented layout with a header and a trailer record.
//! Prices in the feed are integers in hundredths; records carry them as exact
//! decimals in currency units.
//!
//! # Core Types
//!
//! - [`PriceRecord`] - Closing price of one instrument on one day
//! - [`MarketDataError`] - Ingestion and line-level parse failures

pub mod cotahist;
pub mod errors;
pub mod models;

pub use errors::{MarketDataError, Result};
pub use models::PriceRecord;
