use crate::activities::{Trade, TradeLedger, TradeSide};
use crate::errors::{CalculatorError, Result};
use crate::portfolio::snapshot::{
    HoldingsCalculationResult, HoldingsCalculationWarning, HoldingsLedger,
};

use chrono::NaiveDate;
use log::{debug, info, warn};

/// Replays a trade ledger one calendar day at a time and records the holdings
/// at the close of each day.
///
/// Every day from the earliest trade through `end_date` gets a snapshot,
/// weekends and holidays included.
#[derive(Debug, Clone)]
pub struct HoldingsCalculator {
    end_date: NaiveDate,
}

impl HoldingsCalculator {
    pub fn new(end_date: NaiveDate) -> Self {
        Self { end_date }
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Builds the snapshot for every day from the first trade to `end_date`.
    ///
    /// Fails on an empty ledger and on any trade whose side is neither buy nor
    /// sell, wherever it falls relative to `end_date`. Oversells are reported
    /// as warnings and do not stop the replay.
    pub fn calculate_snapshots(&self, ledger: &TradeLedger) -> Result<HoldingsCalculationResult> {
        let start_date = ledger.start_date().ok_or(CalculatorError::EmptyLedger)?;
        check_trade_sides(ledger)?;
        let trades_by_date = ledger.trades_by_date();
        let mut result = HoldingsCalculationResult::default();

        if self.end_date < start_date {
            warn!(
                "End date {} is before the first trade on {}; no holdings to reconstruct",
                self.end_date, start_date
            );
            return Ok(result);
        }

        let mut holdings = HoldingsLedger::new();
        for date in start_date.iter_days().take_while(|d| *d <= self.end_date) {
            if let Some(trades_today) = trades_by_date.get(&date) {
                let warnings = self.calculate_next_holdings(&mut holdings, trades_today, date)?;
                result.warnings.extend(warnings);
            }
            result.snapshots.insert(date, holdings.snapshot(date));
        }

        let unreplayed = ledger
            .trades()
            .iter()
            .filter(|trade| trade.date > self.end_date)
            .count();
        if unreplayed > 0 {
            warn!(
                "{} trade(s) dated after {} were not replayed",
                unreplayed, self.end_date
            );
        }

        info!(
            "Reconstructed {} daily snapshots from {} to {} ({} lots, {} warnings)",
            result.snapshots.len(),
            start_date,
            self.end_date,
            holdings.lots().len(),
            result.warnings.len()
        );
        Ok(result)
    }

    /// Applies one day's trades, in ledger order, to the live holdings.
    ///
    /// Returns the warnings raised by the day's trades. Trades dated on another
    /// day are skipped with a warning.
    pub fn calculate_next_holdings(
        &self,
        holdings: &mut HoldingsLedger,
        trades_today: &[&Trade],
        target_date: NaiveDate,
    ) -> Result<Vec<HoldingsCalculationWarning>> {
        debug!(
            "Replaying {} trade(s) on {}",
            trades_today.len(),
            target_date
        );

        let mut warnings = Vec::new();
        for trade in trades_today {
            if trade.date != target_date {
                let warning = HoldingsCalculationWarning {
                    date: target_date,
                    code: trade.code.clone(),
                    message: format!(
                        "Trade date {} does not match replay date {}. Skipped.",
                        trade.date, target_date
                    ),
                };
                warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            match &trade.side {
                TradeSide::Buy => self.handle_buy(trade, holdings)?,
                TradeSide::Sell => {
                    if let Some(warning) = self.handle_sell(trade, holdings)? {
                        warnings.push(warning);
                    }
                }
                TradeSide::Unknown(side) => return Err(unknown_side(trade, side).into()),
            }
        }
        Ok(warnings)
    }

    fn handle_buy(&self, trade: &Trade, holdings: &mut HoldingsLedger) -> Result<()> {
        holdings.apply_buy(trade)?;
        Ok(())
    }

    /// A sell larger than the held quantity is a data-integrity signal: the
    /// ledger is probably missing an earlier buy.
    fn handle_sell(
        &self,
        trade: &Trade,
        holdings: &mut HoldingsLedger,
    ) -> Result<Option<HoldingsCalculationWarning>> {
        let unmatched = holdings.apply_sell(trade)?;
        if unmatched == 0 {
            return Ok(None);
        }

        let warning = HoldingsCalculationWarning {
            date: trade.date,
            code: trade.code.clone(),
            message: format!(
                "Oversell: sold {} but only {} were held; {} discarded",
                trade.quantity,
                trade.quantity - unmatched,
                unmatched
            ),
        };
        warn!("{}", warning);
        Ok(Some(warning))
    }
}

/// Rejects the ledger if any trade, replayed or not, has an unknown side.
fn check_trade_sides(ledger: &TradeLedger) -> std::result::Result<(), CalculatorError> {
    for trade in ledger.trades() {
        if let TradeSide::Unknown(side) = &trade.side {
            return Err(unknown_side(trade, side));
        }
    }
    Ok(())
}

fn unknown_side(trade: &Trade, side: &str) -> CalculatorError {
    CalculatorError::UnknownTradeSide {
        side: side.to_string(),
        code: trade.code.clone(),
        date: trade.date,
    }
}
