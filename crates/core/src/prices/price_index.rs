use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerfolio_market_data::PriceRecord;

/// Closing prices keyed by trading day, then instrument code.
///
/// Lookups never interpolate or fill forward: a missing key is a missing
/// price. Inserting an existing (date, code) key replaces the stored price.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    prices: HashMap<NaiveDate, HashMap<String, Decimal>>,
    len: usize,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, returning the price it replaced, if any.
    pub fn insert(&mut self, record: PriceRecord) -> Option<Decimal> {
        let replaced = self
            .prices
            .entry(record.date)
            .or_default()
            .insert(record.code, record.price);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    pub fn get(&self, date: NaiveDate, code: &str) -> Option<Decimal> {
        self.prices
            .get(&date)
            .and_then(|day| day.get(code))
            .copied()
    }

    /// Whether any instrument has a price on `date`.
    pub fn has_prices_on(&self, date: NaiveDate) -> bool {
        self.prices.get(&date).is_some_and(|day| !day.is_empty())
    }

    /// Number of distinct trading days with at least one price.
    pub fn trading_days(&self) -> usize {
        self.prices.values().filter(|day| !day.is_empty()).count()
    }

    /// Number of distinct (date, code) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Extend<PriceRecord> for PriceIndex {
    fn extend<I: IntoIterator<Item = PriceRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl FromIterator<PriceRecord> for PriceIndex {
    fn from_iter<I: IntoIterator<Item = PriceRecord>>(records: I) -> Self {
        let mut index = PriceIndex::new();
        index.extend(records);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    #[test]
    fn test_get_returns_inserted_price() {
        let index: PriceIndex = vec![
            PriceRecord::new(day(1), "PETR4", dec!(23.10)),
            PriceRecord::new(day(1), "VALE3", dec!(98.00)),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.get(day(1), "PETR4"), Some(dec!(23.10)));
        assert_eq!(index.get(day(1), "VALE3"), Some(dec!(98.00)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_absent_price_is_not_filled() {
        let index: PriceIndex = vec![PriceRecord::new(day(1), "PETR4", dec!(23.10))]
            .into_iter()
            .collect();

        assert_eq!(index.get(day(2), "PETR4"), None);
        assert_eq!(index.get(day(1), "ITUB4"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut index = PriceIndex::new();
        assert_eq!(index.insert(PriceRecord::new(day(1), "PETR4", dec!(23.10))), None);

        let replaced = index.insert(PriceRecord::new(day(1), "PETR4", dec!(24.00)));

        assert_eq!(replaced, Some(dec!(23.10)));
        assert_eq!(index.get(day(1), "PETR4"), Some(dec!(24.00)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_has_prices_on() {
        let index: PriceIndex = vec![PriceRecord::new(day(1), "PETR4", dec!(23.10))]
            .into_iter()
            .collect();

        assert!(index.has_prices_on(day(1)));
        assert!(!index.has_prices_on(day(2)));
        assert_eq!(index.trading_days(), 1);
    }
}
