use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closing price of one instrument on one trading day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading day of the quote
    pub date: NaiveDate,

    /// Instrument code (ticker), whitespace removed
    pub code: String,

    /// Closing price in currency units
    pub price: Decimal,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, code: impl Into<String>, price: Decimal) -> Self {
        Self {
            date,
            code: code.into(),
            price,
        }
    }
}
