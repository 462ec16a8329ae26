//! Portfolio snapshot domain models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Lot;

/// Holdings frozen at the close of one calendar day.
///
/// The lots are owned copies. Replaying later days never reaches back into a
/// snapshot that has already been recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSnapshot {
    snapshot_date: NaiveDate,
    lots: Vec<Lot>,
    net_invested: Decimal,
}

impl HoldingsSnapshot {
    pub fn new(snapshot_date: NaiveDate, lots: Vec<Lot>, net_invested: Decimal) -> Self {
        HoldingsSnapshot {
            snapshot_date,
            lots,
            net_invested,
        }
    }

    pub fn snapshot_date(&self) -> NaiveDate {
        self.snapshot_date
    }

    /// All lots in creation order, including closed ones.
    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Lots with a remaining quantity.
    pub fn open_lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter().filter(|lot| !lot.is_closed())
    }

    pub fn net_invested(&self) -> Decimal {
        self.net_invested
    }

    /// Held quantity for `code` summed across lots.
    pub fn quantity_of(&self, code: &str) -> u64 {
        self.lots
            .iter()
            .filter(|lot| lot.code == code)
            .map(|lot| lot.quantity)
            .sum()
    }

    /// Held quantity per code, in the order each code was first acquired.
    /// Codes whose lots are all closed are left out.
    pub fn quantities_by_code(&self) -> Vec<(&str, u64)> {
        let mut quantities: Vec<(&str, u64)> = Vec::new();
        for lot in self.open_lots() {
            match quantities.iter_mut().find(|(code, _)| *code == lot.code) {
                Some((_, quantity)) => *quantity += lot.quantity,
                None => quantities.push((lot.code.as_str(), lot.quantity)),
            }
        }
        quantities
    }
}

/// A non-fatal problem found while replaying trades.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsCalculationWarning {
    pub date: NaiveDate,
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for HoldingsCalculationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}: {}", self.code, self.date, self.message)
    }
}

/// Snapshots for every replayed day plus any warnings raised along the way.
#[derive(Debug, Clone, Default)]
pub struct HoldingsCalculationResult {
    pub snapshots: BTreeMap<NaiveDate, HoldingsSnapshot>,
    pub warnings: Vec<HoldingsCalculationWarning>,
}

impl HoldingsCalculationResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
