//! Parser for the B3 historical quotes feed (COTAHIST layout).
//!
//! Each quote line is fixed width. Only three fields are read: the trading
//! date, the instrument code and the closing price. The first line of a feed
//! is a header and the last two split entries are the trailer record and the
//! empty remainder after the final newline.
//!
//! Offsets are byte offsets. Feeds are Latin-1 encoded, so lines are handled
//! as bytes and only the fields we read are decoded.

use std::borrow::Cow;
use std::fs;
use std::ops::Range;
use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use crate::errors::{MarketDataError, Result};
use crate::models::PriceRecord;

const DATE_FIELD: Range<usize> = 2..10;
const CODE_FIELD: Range<usize> = 12..24;
const CLOSE_PRICE_FIELD: Range<usize> = 108..121;

const DATE_FORMAT: &str = "%Y%m%d";

/// Prices are integers scaled by 100.
const PRICE_SCALE: u32 = 2;

const HEADER_LINES: usize = 1;
const TRAILING_LINES: usize = 2;

/// Reads and parses one feed file.
pub fn read_feed(path: &Path) -> Result<Vec<PriceRecord>> {
    let content = fs::read(path).map_err(|e| MarketDataError::Ingestion {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let feed = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_feed(&feed, &content)
}

/// Parses the raw bytes of a feed.
///
/// `feed` is only used to label errors. Blank lines in the body are ignored;
/// any other line that fails to convert aborts the parse.
pub fn parse_feed(feed: &str, content: &[u8]) -> Result<Vec<PriceRecord>> {
    let lines: Vec<&[u8]> = content.split(|byte| *byte == b'\n').collect();
    let body_end = lines.len().saturating_sub(TRAILING_LINES);

    let mut records = Vec::with_capacity(body_end.saturating_sub(HEADER_LINES));
    for (index, raw) in lines
        .iter()
        .enumerate()
        .take(body_end)
        .skip(HEADER_LINES)
    {
        let line = strip_carriage_return(raw);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let record = parse_line(line).map_err(|message| MarketDataError::MalformedPrice {
            feed: feed.to_string(),
            line: index + 1,
            message,
        })?;
        records.push(record);
    }

    debug!("Parsed {} price records from {}", records.len(), feed);
    Ok(records)
}

/// Parses a single quote line into a price record.
pub fn parse_line(line: &[u8]) -> std::result::Result<PriceRecord, String> {
    let date_field = field(line, DATE_FIELD)?;
    let date = NaiveDate::parse_from_str(&date_field, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", date_field, e))?;

    let code: String = field(line, CODE_FIELD)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if code.is_empty() {
        return Err("empty instrument code".to_string());
    }

    let price = parse_scaled_price(&field(line, CLOSE_PRICE_FIELD)?)?;

    Ok(PriceRecord { date, code, price })
}

/// Converts an integer string in hundredths into currency units.
///
/// # Examples
///
/// ```
/// use ledgerfolio_market_data::cotahist::parse_scaled_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_scaled_price("000000012345"), Ok(Decimal::new(12345, 2)));
/// ```
pub fn parse_scaled_price(raw: &str) -> std::result::Result<Decimal, String> {
    let trimmed = raw.trim();
    let hundredths: i64 = trimmed
        .parse()
        .map_err(|e| format!("invalid price '{}': {}", trimmed, e))?;
    Ok(Decimal::new(hundredths, PRICE_SCALE))
}

fn field(line: &[u8], range: Range<usize>) -> std::result::Result<Cow<'_, str>, String> {
    line.get(range.clone())
        .map(String::from_utf8_lossy)
        .ok_or_else(|| {
            format!(
                "line has {} bytes, field {}..{} is out of range",
                line.len(),
                range.start,
                range.end
            )
        })
}

fn strip_carriage_return(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const LINE_WIDTH: usize = 245;

    fn quote_line(date: &str, code: &str, hundredths: i64) -> String {
        let mut line = vec![b' '; LINE_WIDTH];
        line[0..2].copy_from_slice(b"01");
        line[DATE_FIELD].copy_from_slice(date.as_bytes());
        line[CODE_FIELD].copy_from_slice(format!("{:<12}", code).as_bytes());
        line[CLOSE_PRICE_FIELD].copy_from_slice(format!("{:013}", hundredths).as_bytes());
        String::from_utf8(line).unwrap()
    }

    fn feed(lines: &[String]) -> String {
        let mut content = String::from("00COTAHIST.2020BOVESPA 20201230\n");
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        content.push_str("99COTAHIST.2020BOVESPA 2020123000000000002\n");
        content
    }

    #[test]
    fn test_parse_scaled_price() {
        assert_eq!(parse_scaled_price("000000012345").unwrap(), dec!(123.45));
        assert_eq!(parse_scaled_price("0000000000100").unwrap(), dec!(1.00));
        assert!(parse_scaled_price("00000001234A").is_err());
    }

    #[test]
    fn test_parse_line_reads_fixed_offsets() {
        let line = quote_line("20200102", "PETR4", 3050);

        let record = parse_line(line.as_bytes()).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(record.code, "PETR4");
        assert_eq!(record.price, dec!(30.50));
    }

    #[test]
    fn test_parse_feed_skips_header_and_trailer() {
        let content = feed(&[
            quote_line("20200102", "PETR4", 3050),
            quote_line("20200102", "BOVA11", 11520),
        ]);

        let records = parse_feed("COTAHIST_A2020.TXT", content.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "PETR4");
        assert_eq!(records[1].code, "BOVA11");
        assert_eq!(records[1].price, dec!(115.20));
    }

    #[test]
    fn test_parse_feed_handles_crlf_and_blank_lines() {
        let content = feed(&[quote_line("20200103", "VALE3", 5432), String::new()])
            .replace('\n', "\r\n");

        let records = parse_feed("COTAHIST_A2020.TXT", content.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, dec!(54.32));
    }

    #[test]
    fn test_parse_feed_tolerates_latin1_outside_read_fields() {
        let mut line = quote_line("20200102", "ITUB4", 3700).into_bytes();
        // Company name column holds Latin-1 text such as "ITAÚ".
        line[27] = 0xDA;
        let mut content = b"00COTAHIST\n".to_vec();
        content.extend_from_slice(&line);
        content.extend_from_slice(b"\n99COTAHIST\n");

        let records = parse_feed("COTAHIST_A2020.TXT", &content).unwrap();

        assert_eq!(records[0].code, "ITUB4");
        assert_eq!(records[0].price, dec!(37.00));
    }

    #[test]
    fn test_parse_feed_reports_line_of_malformed_date() {
        let content = feed(&[
            quote_line("20200102", "PETR4", 3050),
            quote_line("2020XX02", "PETR4", 3050),
        ]);

        let error = parse_feed("COTAHIST_A2020.TXT", content.as_bytes()).unwrap_err();

        match error {
            MarketDataError::MalformedPrice { feed, line, message } => {
                assert_eq!(feed, "COTAHIST_A2020.TXT");
                assert_eq!(line, 3);
                assert!(message.contains("invalid date"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_feed_rejects_short_line() {
        let content = feed(&["0120200102  PETR4".to_string()]);

        let error = parse_feed("short.txt", content.as_bytes()).unwrap_err();

        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn test_read_feed_missing_file_is_ingestion_error() {
        let dir = tempfile::tempdir().unwrap();

        let error = read_feed(&dir.path().join("absent.txt")).unwrap_err();

        assert!(matches!(error, MarketDataError::Ingestion { .. }));
    }

    #[test]
    fn test_read_feed_parses_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("COTAHIST_D02012020.TXT");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(feed(&[quote_line("20200102", "PETR4", 0)]).as_bytes())
            .unwrap();

        let records = read_feed(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, Decimal::ZERO);
    }
}
