//! Ledgerfolio Core - portfolio reconstruction and daily return reporting.
//!
//! This crate replays a brokerage trade ledger into daily holdings snapshots,
//! prices them against historical quotes, and writes value-weighted daily
//! returns next to benchmark returns. Quote feed parsing lives in the
//! `market-data` crate.

pub mod activities;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod portfolio;
pub mod prices;
pub mod reports;
pub mod settings;

pub use pipeline::{run_pipeline, PipelineSummary};
pub use settings::PipelineConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
