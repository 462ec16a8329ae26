use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::activities::Trade;
use crate::errors::CalculatorError;

use super::HoldingsSnapshot;

/// A single acquisition of an instrument with its remaining quantity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub code: String,
    /// Remaining quantity. Reduced by sells, never below zero.
    pub quantity: u64,
    /// Unit price paid when the lot was bought.
    pub acquisition_price: Decimal,
    pub acquisition_date: NaiveDate,
}

impl Lot {
    /// Creates a lot from a buy trade.
    pub fn from_trade(trade: &Trade) -> Self {
        Lot {
            code: trade.code.clone(),
            quantity: trade.quantity,
            acquisition_price: trade.unit_price,
            acquisition_date: trade.date,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.quantity == 0
    }
}

/// The live holdings being mutated during replay.
///
/// Lots are kept in creation order and never removed: a fully sold lot stays
/// with quantity zero.
#[derive(Debug, Clone, Default)]
pub struct HoldingsLedger {
    lots: Vec<Lot>,
    net_invested: Decimal,
}

impl HoldingsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Cumulative buy notional minus cumulative sell notional.
    pub fn net_invested(&self) -> Decimal {
        self.net_invested
    }

    /// Appends a new lot for a buy trade.
    ///
    /// Fails without touching the holdings if the running net invested amount
    /// would overflow.
    pub fn apply_buy(&mut self, trade: &Trade) -> Result<(), CalculatorError> {
        self.net_invested = trade
            .notional()
            .and_then(|notional| self.net_invested.checked_add(notional))
            .ok_or_else(|| CalculatorError::overflow("buy", &trade.code, trade.date))?;
        self.lots.push(Lot::from_trade(trade));
        Ok(())
    }

    /// Reduces matching lots for a sell trade, oldest lot first.
    ///
    /// Returns the quantity that could not be matched against held lots. That
    /// remainder is discarded; holdings never go negative.
    pub fn apply_sell(&mut self, trade: &Trade) -> Result<u64, CalculatorError> {
        self.net_invested = trade
            .notional()
            .and_then(|notional| self.net_invested.checked_sub(notional))
            .ok_or_else(|| CalculatorError::overflow("sell", &trade.code, trade.date))?;
        Ok(self.reduce(&trade.code, trade.quantity))
    }

    fn reduce(&mut self, code: &str, quantity: u64) -> u64 {
        let mut outstanding = quantity;
        for lot in self.lots.iter_mut().filter(|lot| lot.code == code) {
            if outstanding == 0 {
                break;
            }
            if lot.quantity >= outstanding {
                lot.quantity -= outstanding;
                outstanding = 0;
            } else {
                outstanding -= lot.quantity;
                lot.quantity = 0;
            }
        }
        if outstanding > 0 {
            debug!(
                "Sell of {} {} left {} unmatched against held lots",
                quantity, code, outstanding
            );
        }
        outstanding
    }

    /// Takes an independent copy of the current holdings for `date`.
    pub fn snapshot(&self, date: NaiveDate) -> HoldingsSnapshot {
        HoldingsSnapshot::new(date, self.lots.clone(), self.net_invested)
    }
}
