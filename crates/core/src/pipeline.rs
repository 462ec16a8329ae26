//! End-to-end run: feeds and ledger in, daily returns report out.

use log::{info, warn};
use serde::Serialize;

use crate::activities::read_ledger;
use crate::errors::Result;
use crate::portfolio::performance::{summarize_returns, ReturnCalculator, ReturnSummary};
use crate::portfolio::snapshot::HoldingsCalculator;
use crate::prices::load_price_index;
use crate::reports::ReportWriter;
use crate::settings::PipelineConfig;

/// What a run read, computed and wrote.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub trades: usize,
    pub prices: usize,
    pub snapshots: usize,
    pub rows_written: usize,
    pub skipped_days: usize,
    pub warnings: usize,
    pub price_gaps: usize,
    pub returns: ReturnSummary,
}

/// Runs the whole pipeline for `config`.
///
/// All inputs are read and validated before anything is computed, and the
/// report is only written once every return has been calculated.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    config.validate()?;
    let end_date = config.resolved_end_date();

    let price_index = load_price_index(&config.import_dir)?;
    let ledger = read_ledger(&config.ledger_path)?;

    // Replay warnings are logged by the calculator as they are raised.
    let holdings = HoldingsCalculator::new(end_date).calculate_snapshots(&ledger)?;

    let calculator = ReturnCalculator::new(&price_index, &config.benchmark_codes);
    let returns = calculator.calculate_returns(&holdings.snapshots)?;
    for gap in &returns.gaps {
        warn!("Price gap: {}", gap);
    }

    let return_summary = summarize_returns(&returns.returns, &config.benchmark_codes)?;

    let writer = ReportWriter::new(config.benchmark_codes.clone(), config.include_header);
    let rows_written = writer.write_file(&config.output_path, &returns.returns)?;
    log_return_summary(&config.benchmark_codes, &return_summary);

    Ok(PipelineSummary {
        trades: ledger.len(),
        prices: price_index.len(),
        snapshots: holdings.snapshots.len(),
        rows_written,
        skipped_days: returns.skipped_days.len(),
        warnings: holdings.warnings.len(),
        price_gaps: returns.gaps.len(),
        returns: return_summary,
    })
}

fn log_return_summary(benchmark_codes: &[String], summary: &ReturnSummary) {
    let (Some(start), Some(end)) = (summary.period_start_date, summary.period_end_date) else {
        info!("No daily returns were computed");
        return;
    };
    info!(
        "Portfolio return from {} to {}: {:.2}%",
        start, end, summary.cumulative_return
    );
    for (code, cumulative) in benchmark_codes
        .iter()
        .zip(&summary.benchmark_cumulative_returns)
    {
        match cumulative {
            Some(value) => info!("{} return over the same period: {:.2}%", code, value),
            None => info!("{} had no prices over the period", code),
        }
    }
}
