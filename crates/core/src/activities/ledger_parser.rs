//! Trade ledger parsing.
//!
//! The ledger is the brokerage's negotiation export: comma separated, one
//! header row, then one trade per row. Only five columns are read. Exports are
//! often Latin-1, so rows are read as bytes and decoded per field.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info};
use rust_decimal::Decimal;

use super::{normalize_code, Trade, TradeLedger, TradeSide};
use crate::constants::LEDGER_DATE_FORMAT;
use crate::errors::{Error, Result};

const DATE_COLUMN: usize = 0;
const SIDE_COLUMN: usize = 1;
const CODE_COLUMN: usize = 4;
const QUANTITY_COLUMN: usize = 6;
const PRICE_COLUMN: usize = 7;

/// Reads and parses the ledger at `path`.
pub fn read_ledger(path: &Path) -> Result<TradeLedger> {
    let content = fs::read(path).map_err(|e| Error::Ingestion {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let ledger = parse_ledger(&path.display().to_string(), &content)?;
    info!("Loaded {} trades from {}", ledger.len(), path.display());
    Ok(ledger)
}

/// Parses ledger content. `source_name` labels errors.
///
/// Any row that fails conversion aborts the parse: replay is only correct if
/// every trade is present.
pub fn parse_ledger(source_name: &str, content: &[u8]) -> Result<TradeLedger> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let mut trades = Vec::new();
    for (index, row) in reader.byte_records().enumerate() {
        let record = row.map_err(|e| Error::Ingestion {
            path: source_name.to_string(),
            message: e.to_string(),
        })?;
        // Header occupies line 1.
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);

        let trade = parse_trade(&record).map_err(|message| Error::MalformedTrade {
            source_name: source_name.to_string(),
            line,
            message,
        })?;
        trades.push(trade);
    }

    debug!("Parsed {} trades from {}", trades.len(), source_name);
    Ok(TradeLedger::new(trades))
}

fn parse_trade(record: &ByteRecord) -> std::result::Result<Trade, String> {
    let date_field = without_whitespace(&column(record, DATE_COLUMN, "date")?);
    let date = NaiveDate::parse_from_str(&date_field, LEDGER_DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", date_field, e))?;

    let side = TradeSide::from(without_whitespace(&column(record, SIDE_COLUMN, "side")?).as_str());

    let code = normalize_code(&column(record, CODE_COLUMN, "code")?);
    if code.is_empty() {
        return Err("empty instrument code".to_string());
    }

    let quantity_column = column(record, QUANTITY_COLUMN, "quantity")?;
    let quantity_field = quantity_column.trim();
    let quantity: u64 = quantity_field
        .parse()
        .map_err(|e| format!("invalid quantity '{}': {}", quantity_field, e))?;

    let price_column = column(record, PRICE_COLUMN, "price")?;
    let price_field = price_column.trim();
    let unit_price = parse_comma_decimal(price_field)
        .map_err(|e| format!("invalid price '{}': {}", price_field, e))?;

    let trade = Trade {
        date,
        side,
        code,
        quantity,
        unit_price,
    };
    if trade.notional().is_none() {
        return Err(format!(
            "quantity {} at price {} overflows the trade value",
            quantity, unit_price
        ));
    }
    Ok(trade)
}

/// Parses a decimal that uses a comma as the fractional separator.
fn parse_comma_decimal(raw: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(&raw.replace(',', "."))
}

fn column<'r>(
    record: &'r ByteRecord,
    index: usize,
    name: &str,
) -> std::result::Result<Cow<'r, str>, String> {
    record.get(index).map(String::from_utf8_lossy).ok_or_else(|| {
        format!(
            "missing {} column {} (row has {} columns)",
            name,
            index,
            record.len()
        )
    })
}

fn without_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
