use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Returns for one processed trading day, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyReturn {
    pub date: NaiveDate,
    /// The day the returns are measured against.
    pub reference_date: NaiveDate,
    /// Value-weighted return of the holdings.
    pub portfolio_return: Decimal,
    /// One entry per configured benchmark, in configuration order. `None`
    /// when a price is missing on either day.
    pub benchmark_returns: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceGapKind {
    /// No price on the day being processed.
    MissingCurrentPrice,
    /// No price on the reference day.
    MissingReferencePrice,
    /// The reference price is zero, so no return can be formed.
    ZeroReferencePrice,
}

/// A missing price that was tolerated while computing returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceGap {
    pub date: NaiveDate,
    pub reference_date: NaiveDate,
    pub code: String,
    pub kind: PriceGapKind,
}

impl std::fmt::Display for PriceGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.kind {
            PriceGapKind::MissingCurrentPrice => format!("no price on {}", self.date),
            PriceGapKind::MissingReferencePrice => {
                format!("no price on reference day {}", self.reference_date)
            }
            PriceGapKind::ZeroReferencePrice => {
                format!("zero price on reference day {}", self.reference_date)
            }
        };
        write!(f, "{}: {}", self.code, reason)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReturnCalculationResult {
    pub returns: Vec<DailyReturn>,
    pub gaps: Vec<PriceGap>,
    /// Days after the first snapshot that had no prices at all.
    pub skipped_days: Vec<NaiveDate>,
}

/// Compounded returns over a series of daily returns, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    pub period_start_date: Option<NaiveDate>,
    pub period_end_date: Option<NaiveDate>,
    pub cumulative_return: Decimal,
    /// `None` for a benchmark that had no computable day in the period.
    pub benchmark_cumulative_returns: Vec<Option<Decimal>>,
}
