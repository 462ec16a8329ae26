use std::fs;
use std::io;
use std::path::Path;

use csv::Writer;
use log::info;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, LEDGER_DATE_FORMAT};
use crate::errors::{Error, Result};
use crate::portfolio::performance::DailyReturn;

/// Writes daily returns as a comma-separated table.
///
/// Each row is `date, portfolio %, benchmark % ...` with benchmarks in the
/// configured order. A benchmark without a value leaves its cell empty.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    benchmark_codes: Vec<String>,
    include_header: bool,
}

impl ReportWriter {
    pub fn new(benchmark_codes: Vec<String>, include_header: bool) -> Self {
        ReportWriter {
            benchmark_codes,
            include_header,
        }
    }

    /// Writes the report to `path`, creating missing parent directories.
    /// Returns the number of data rows written.
    pub fn write_file(&self, path: &Path, returns: &[DailyReturn]) -> Result<usize> {
        let report_error = |e: &dyn std::fmt::Display| Error::Report {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| report_error(&e))?;
        }
        let file = fs::File::create(path).map_err(|e| report_error(&e))?;
        let rows = self
            .write_to(file, returns)
            .map_err(|e| report_error(&e))?;

        info!("Wrote {} row(s) to {}", rows, path.display());
        Ok(rows)
    }

    /// Writes the report to any sink.
    pub fn write_to<W: io::Write>(&self, sink: W, returns: &[DailyReturn]) -> csv::Result<usize> {
        let mut writer = Writer::from_writer(sink);

        if self.include_header {
            let mut header = vec!["date".to_string(), "portfolio".to_string()];
            header.extend(self.benchmark_codes.iter().cloned());
            writer.write_record(&header)?;
        }

        for daily in returns {
            writer.write_record(self.format_row(daily))?;
        }
        writer.flush()?;
        Ok(returns.len())
    }

    /// Formats one output row. Missing benchmark cells are padded so every
    /// row has one column per configured benchmark.
    pub fn format_row(&self, daily: &DailyReturn) -> Vec<String> {
        let mut row = Vec::with_capacity(2 + self.benchmark_codes.len());
        row.push(daily.date.format(LEDGER_DATE_FORMAT).to_string());
        row.push(format_percent(daily.portfolio_return));
        for column in 0..self.benchmark_codes.len() {
            let cell = daily
                .benchmark_returns
                .get(column)
                .copied()
                .flatten()
                .map(format_percent)
                .unwrap_or_default();
            row.push(cell);
        }
        row
    }
}

/// Rounds half away from zero to the display precision, always showing two
/// decimals. A value that rounds to zero prints as `0.00`, never `-0.00`.
pub fn format_percent(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(DISPLAY_DECIMAL_PRECISION);
    rounded.to_string()
}
