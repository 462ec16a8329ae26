//! Market data models
//!
//! - `price_record` - Daily closing price keyed by (date, code)

mod price_record;

pub use price_record::PriceRecord;
