use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BENCHMARK_CODES, DEFAULT_IMPORT_DIR, DEFAULT_LEDGER_PATH, DEFAULT_OUTPUT_PATH,
};
use crate::errors::{Error, Result};

/// Everything a pipeline run needs to know about its inputs and output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Directory holding the historical quotes feeds.
    pub import_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub output_path: PathBuf,
    /// Instruments reported next to the portfolio, in column order.
    pub benchmark_codes: Vec<String>,
    /// Last day to reconstruct. Today in the local timezone when unset.
    pub end_date: Option<NaiveDate>,
    pub include_header: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            import_dir: PathBuf::from(DEFAULT_IMPORT_DIR),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            benchmark_codes: DEFAULT_BENCHMARK_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            end_date: None,
            include_header: false,
        }
    }
}

impl PipelineConfig {
    /// Parses a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfigValue(format!("invalid configuration JSON: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Ingestion {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.benchmark_codes.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one benchmark code is required".to_string(),
            ));
        }
        if let Some(code) = self.benchmark_codes.iter().find(|c| c.trim().is_empty()) {
            return Err(Error::InvalidConfigValue(format!(
                "blank benchmark code '{}'",
                code
            )));
        }

        for (name, path) in [
            ("importDir", &self.import_dir),
            ("ledgerPath", &self.ledger_path),
            ("outputPath", &self.output_path),
        ] {
            if path.as_os_str().to_string_lossy().trim().is_empty() {
                return Err(Error::InvalidConfigValue(format!("{} must not be blank", name)));
            }
        }
        Ok(())
    }

    /// The configured end date, or today's local date.
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Local::now().date_naive())
    }
}
