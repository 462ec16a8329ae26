use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use ledgerfolio_market_data::cotahist;

use super::PriceIndex;
use crate::errors::{Error, Result};

/// Builds a price index from every feed file in `import_dir`.
///
/// Files are read in file-name order and merged into one index, so a later
/// file overrides an earlier one for the same (date, code). Subdirectories are
/// ignored.
pub fn load_price_index(import_dir: &Path) -> Result<PriceIndex> {
    let feeds = list_feed_files(import_dir)?;
    if feeds.is_empty() {
        warn!(
            "No market data feeds found in {}; every day will lack prices",
            import_dir.display()
        );
    }

    let mut index = PriceIndex::new();
    for feed in &feeds {
        let records = cotahist::read_feed(feed)?;
        debug!("Loaded {} records from {}", records.len(), feed.display());
        index.extend(records);
    }

    info!(
        "Price index built from {} feed(s): {} prices over {} trading days",
        feeds.len(),
        index.len(),
        index.trading_days()
    );
    Ok(index)
}

fn list_feed_files(import_dir: &Path) -> Result<Vec<PathBuf>> {
    let ingestion_error = |e: std::io::Error| Error::Ingestion {
        path: import_dir.display().to_string(),
        message: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(import_dir).map_err(ingestion_error)? {
        let entry = entry.map_err(ingestion_error)?;
        if entry.file_type().map_err(ingestion_error)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
