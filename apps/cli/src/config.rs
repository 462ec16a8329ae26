use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ledgerfolio_core::PipelineConfig;

pub const ENV_IMPORT_DIR: &str = "LF_IMPORT_DIR";
pub const ENV_LEDGER_PATH: &str = "LF_LEDGER_PATH";
pub const ENV_OUTPUT_PATH: &str = "LF_OUTPUT_PATH";
pub const ENV_BENCHMARKS: &str = "LF_BENCHMARKS";
pub const ENV_END_DATE: &str = "LF_END_DATE";

/// Date format accepted for end dates on the command line and in the
/// environment.
pub const END_DATE_FORMAT: &str = "%Y-%m-%d";

/// Overrides coming from the command line. `None` keeps the layer below.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub import_dir: Option<PathBuf>,
    pub ledger_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub benchmark_codes: Vec<String>,
    pub end_date: Option<NaiveDate>,
    pub include_header: bool,
}

/// Builds the run configuration: defaults, then the optional JSON file, then
/// `LF_*` environment variables, then command line flags.
pub fn load_config(
    config_file: Option<&PathBuf>,
    overrides: ConfigOverrides,
) -> Result<PipelineConfig> {
    dotenvy::dotenv().ok();

    let mut config = match config_file {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    apply_overrides(&mut config, overrides);
    Ok(config)
}

/// Applies environment values fetched through `lookup`. Blank values are
/// treated as unset.
pub fn apply_env<F>(config: &mut PipelineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(dir) = value(ENV_IMPORT_DIR) {
        config.import_dir = PathBuf::from(dir);
    }
    if let Some(path) = value(ENV_LEDGER_PATH) {
        config.ledger_path = PathBuf::from(path);
    }
    if let Some(path) = value(ENV_OUTPUT_PATH) {
        config.output_path = PathBuf::from(path);
    }
    if let Some(codes) = value(ENV_BENCHMARKS) {
        config.benchmark_codes = parse_benchmark_list(&codes);
    }
    if let Some(raw) = value(ENV_END_DATE) {
        let end_date = parse_end_date(&raw).with_context(|| format!("reading {}", ENV_END_DATE))?;
        config.end_date = Some(end_date);
    }
    Ok(())
}

fn apply_overrides(config: &mut PipelineConfig, overrides: ConfigOverrides) {
    if let Some(dir) = overrides.import_dir {
        config.import_dir = dir;
    }
    if let Some(path) = overrides.ledger_path {
        config.ledger_path = path;
    }
    if let Some(path) = overrides.output_path {
        config.output_path = path;
    }
    if !overrides.benchmark_codes.is_empty() {
        config.benchmark_codes = overrides.benchmark_codes;
    }
    if overrides.end_date.is_some() {
        config.end_date = overrides.end_date;
    }
    if overrides.include_header {
        config.include_header = true;
    }
}

/// Splits a comma-separated list of codes, dropping empty entries.
pub fn parse_benchmark_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_end_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), END_DATE_FORMAT)
        .with_context(|| format!("invalid end date '{}', expected YYYY-MM-DD", raw))
}
