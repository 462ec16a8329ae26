use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;

use crate::errors::{CalculatorError, Result};
use crate::portfolio::performance::{
    DailyReturn, PriceGap, PriceGapKind, ReturnCalculationResult, ReturnSummary,
};
use crate::portfolio::snapshot::HoldingsSnapshot;
use crate::prices::PriceIndex;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Computes value-weighted portfolio returns and simple benchmark returns
/// from daily holdings snapshots.
///
/// Each computed day is measured against the last day that was computed,
/// not the calendar-previous day, so returns chain across weekends and days
/// without prices.
pub struct ReturnCalculator<'a> {
    price_index: &'a PriceIndex,
    benchmark_codes: &'a [String],
}

impl<'a> ReturnCalculator<'a> {
    pub fn new(price_index: &'a PriceIndex, benchmark_codes: &'a [String]) -> Self {
        Self {
            price_index,
            benchmark_codes,
        }
    }

    /// Walks the snapshots in date order and emits one [`DailyReturn`] per day
    /// that has prices, except the first day which only seeds the reference.
    ///
    /// Fails only if a value overflows `Decimal`; missing prices are gaps.
    pub fn calculate_returns(
        &self,
        snapshots: &BTreeMap<NaiveDate, HoldingsSnapshot>,
    ) -> Result<ReturnCalculationResult> {
        let mut result = ReturnCalculationResult::default();
        let mut days = snapshots.iter();
        let Some((first_date, _)) = days.next() else {
            return Ok(result);
        };

        let mut reference_date = *first_date;
        for (&date, snapshot) in days {
            if !self.price_index.has_prices_on(date) {
                debug!("No prices on {}, skipping", date);
                result.skipped_days.push(date);
                continue;
            }

            let portfolio_return =
                self.portfolio_return(snapshot, date, reference_date, &mut result.gaps)?;
            let benchmark_returns =
                self.benchmark_returns(date, reference_date, &mut result.gaps)?;

            result.returns.push(DailyReturn {
                date,
                reference_date,
                portfolio_return,
                benchmark_returns,
            });
            reference_date = date;
        }

        info!(
            "Computed returns for {} day(s), skipped {} day(s) without prices, {} price gap(s)",
            result.returns.len(),
            result.skipped_days.len(),
            result.gaps.len()
        );
        Ok(result)
    }

    /// Sum over held instruments of their simple return weighted by their
    /// share of today's market value.
    ///
    /// Instruments without a price today are left out of the balance. An
    /// instrument without a usable reference price stays in the balance but
    /// contributes no return. A zero balance gives a zero return.
    pub fn portfolio_return(
        &self,
        snapshot: &HoldingsSnapshot,
        date: NaiveDate,
        reference_date: NaiveDate,
        gaps: &mut Vec<PriceGap>,
    ) -> Result<Decimal> {
        let mut priced: Vec<(&str, Decimal, Decimal)> = Vec::new();
        let mut balance = Decimal::ZERO;
        for (code, quantity) in snapshot.quantities_by_code() {
            match self.price_index.get(date, code) {
                Some(price) => {
                    let value = price
                        .checked_mul(Decimal::from(quantity))
                        .ok_or_else(|| CalculatorError::overflow("market value", code, date))?;
                    balance = balance
                        .checked_add(value)
                        .ok_or_else(|| CalculatorError::overflow("balance", code, date))?;
                    priced.push((code, price, value));
                }
                None => gaps.push(price_gap(
                    code,
                    date,
                    reference_date,
                    PriceGapKind::MissingCurrentPrice,
                )),
            }
        }

        if balance.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let mut weighted_return = Decimal::ZERO;
        for (code, price, value) in priced {
            match self.reference_price(code, reference_date) {
                Ok(reference_price) => {
                    let term = percent_change(price, reference_price)
                        .and_then(|change| change.checked_mul(value.checked_div(balance)?))
                        .and_then(|term| weighted_return.checked_add(term));
                    weighted_return = term
                        .ok_or_else(|| CalculatorError::overflow("weighted return", code, date))?;
                }
                Err(kind) => gaps.push(price_gap(code, date, reference_date, kind)),
            }
        }
        Ok(weighted_return)
    }

    fn benchmark_returns(
        &self,
        date: NaiveDate,
        reference_date: NaiveDate,
        gaps: &mut Vec<PriceGap>,
    ) -> Result<Vec<Option<Decimal>>> {
        let mut returns = Vec::with_capacity(self.benchmark_codes.len());
        for code in self.benchmark_codes {
            match self.price_pair(code, date, reference_date) {
                Ok((price, reference_price)) => {
                    let value = percent_change(price, reference_price)
                        .ok_or_else(|| CalculatorError::overflow("benchmark return", code, date))?;
                    returns.push(Some(value));
                }
                Err(kind) => {
                    gaps.push(price_gap(code, date, reference_date, kind));
                    returns.push(None);
                }
            }
        }
        Ok(returns)
    }

    /// Prices of one instrument on `date` and on `reference_date`, or why a
    /// return cannot be formed from them.
    pub fn price_pair(
        &self,
        code: &str,
        date: NaiveDate,
        reference_date: NaiveDate,
    ) -> std::result::Result<(Decimal, Decimal), PriceGapKind> {
        let price = self
            .price_index
            .get(date, code)
            .ok_or(PriceGapKind::MissingCurrentPrice)?;
        let reference_price = self.reference_price(code, reference_date)?;
        Ok((price, reference_price))
    }

    fn reference_price(
        &self,
        code: &str,
        reference_date: NaiveDate,
    ) -> std::result::Result<Decimal, PriceGapKind> {
        match self.price_index.get(reference_date, code) {
            None => Err(PriceGapKind::MissingReferencePrice),
            Some(price) if price.is_zero() => Err(PriceGapKind::ZeroReferencePrice),
            Some(price) => Ok(price),
        }
    }
}

/// `(price / reference_price - 1) * 100`, or `None` on overflow or a zero
/// reference price.
pub fn percent_change(price: Decimal, reference_price: Decimal) -> Option<Decimal> {
    price
        .checked_div(reference_price)?
        .checked_sub(Decimal::ONE)?
        .checked_mul(PERCENT)
}

fn price_gap(code: &str, date: NaiveDate, reference_date: NaiveDate, kind: PriceGapKind) -> PriceGap {
    PriceGap {
        date,
        reference_date,
        code: code.to_string(),
        kind,
    }
}

/// Compounds daily returns into cumulative returns for the whole period.
///
/// Benchmark cells without a value are treated as no change for that day.
/// Fails if the compounded growth overflows `Decimal`.
pub fn summarize_returns(returns: &[DailyReturn], benchmark_codes: &[String]) -> Result<ReturnSummary> {
    let (Some(first), Some(last)) = (returns.first(), returns.last()) else {
        return Ok(ReturnSummary {
            period_start_date: None,
            period_end_date: None,
            cumulative_return: Decimal::ZERO,
            benchmark_cumulative_returns: vec![None; benchmark_codes.len()],
        });
    };
    let overflow = |code: &str| CalculatorError::overflow("cumulative return", code, last.date);

    let cumulative_return = compound(returns.iter().map(|day| day.portfolio_return))
        .ok_or_else(|| overflow("portfolio"))?;

    let mut benchmark_cumulative_returns = Vec::with_capacity(benchmark_codes.len());
    for (column, code) in benchmark_codes.iter().enumerate() {
        let cells: Vec<Decimal> = returns
            .iter()
            .filter_map(|day| day.benchmark_returns.get(column).copied().flatten())
            .collect();
        if cells.is_empty() {
            benchmark_cumulative_returns.push(None);
        } else {
            let cumulative = compound(cells.into_iter()).ok_or_else(|| overflow(code))?;
            benchmark_cumulative_returns.push(Some(cumulative));
        }
    }

    Ok(ReturnSummary {
        period_start_date: Some(first.reference_date),
        period_end_date: Some(last.date),
        cumulative_return,
        benchmark_cumulative_returns,
    })
}

fn compound(mut daily_percents: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let growth = daily_percents.try_fold(Decimal::ONE, |growth, percent| {
        growth.checked_mul(Decimal::ONE.checked_add(percent.checked_div(PERCENT)?)?)
    })?;
    growth.checked_sub(Decimal::ONE)?.checked_mul(PERCENT)
}
