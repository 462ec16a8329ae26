mod config;
mod main_lib;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use ledgerfolio_core::run_pipeline;

use config::{load_config, parse_end_date, ConfigOverrides};
use main_lib::init_tracing;

#[derive(Parser)]
#[command(name = "ledgerfolio")]
#[command(
    about = "Reconstructs daily holdings from a trade ledger and reports returns against benchmarks",
    long_about = None
)]
struct Cli {
    /// JSON configuration file (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the historical quotes feeds
    #[arg(long)]
    import_dir: Option<PathBuf>,

    /// Trade ledger CSV
    #[arg(long = "ledger")]
    ledger_path: Option<PathBuf>,

    /// Where to write the daily returns CSV
    #[arg(long = "output")]
    output_path: Option<PathBuf>,

    /// Benchmark code; repeat for several, in column order
    #[arg(long = "benchmark")]
    benchmarks: Vec<String>,

    /// Last day to reconstruct (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_end_date_arg)]
    end_date: Option<NaiveDate>,

    /// Write a header row
    #[arg(long, default_value_t = false)]
    header: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    print_summary: bool,
}

fn parse_end_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_end_date(raw).map_err(|e| format!("{:#}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(
        cli.config.as_ref(),
        ConfigOverrides {
            import_dir: cli.import_dir,
            ledger_path: cli.ledger_path,
            output_path: cli.output_path,
            benchmark_codes: cli.benchmarks,
            end_date: cli.end_date,
            include_header: cli.header,
        },
    )?;
    tracing::info!(
        "Reading feeds from {} and ledger {}",
        config.import_dir.display(),
        config.ledger_path.display()
    );

    let summary = run_pipeline(&config)?;
    tracing::info!(
        "Wrote {} row(s) to {} ({} skipped day(s), {} warning(s), {} price gap(s))",
        summary.rows_written,
        config.output_path.display(),
        summary.skipped_days,
        summary.warnings,
        summary.price_gaps
    );

    if cli.print_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
