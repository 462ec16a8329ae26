use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FORWARD_MARKET_SUFFIX, LEDGER_BUY_CODE, LEDGER_SELL_CODE};

/// Direction of a trade as recorded in the ledger.
///
/// Sides other than buy and sell are kept verbatim so replay can reject them
/// with the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
    Unknown(String),
}

impl From<&str> for TradeSide {
    fn from(s: &str) -> Self {
        match s {
            LEDGER_BUY_CODE => TradeSide::Buy,
            LEDGER_SELL_CODE => TradeSide::Sell,
            other => TradeSide::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
            TradeSide::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// A normalized trade from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    /// Instrument code with the forward-market suffix already stripped.
    pub code: String,
    pub quantity: u64,
    pub unit_price: Decimal,
}

impl Trade {
    pub fn new(
        date: NaiveDate,
        side: TradeSide,
        code: impl Into<String>,
        quantity: u64,
        unit_price: Decimal,
    ) -> Self {
        Trade {
            date,
            side,
            code: code.into(),
            quantity,
            unit_price,
        }
    }

    /// Quantity times unit price, or `None` if the product does not fit in a
    /// `Decimal`.
    pub fn notional(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// Strips surrounding whitespace and a trailing forward-market suffix, so
/// `PETR4F` and `PETR4` price and hold as the same instrument.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(FORWARD_MARKET_SUFFIX) {
        Some(spot) if !spot.is_empty() => spot.to_string(),
        _ => trimmed.to_string(),
    }
}

/// Trades in the order they were read. Replay relies on this order for
/// same-day trades, so the ledger is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new(trades: Vec<Trade>) -> Self {
        TradeLedger { trades }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Earliest trade date, or `None` for an empty ledger.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.trades.iter().map(|trade| trade.date).min()
    }

    /// Groups trades by date, keeping ledger order within each day.
    pub fn trades_by_date(&self) -> BTreeMap<NaiveDate, Vec<&Trade>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.trades {
            by_date.entry(trade.date).or_default().push(trade);
        }
        by_date
    }
}

impl FromIterator<Trade> for TradeLedger {
    fn from_iter<I: IntoIterator<Item = Trade>>(trades: I) -> Self {
        TradeLedger::new(trades.into_iter().collect())
    }
}
