//! Portfolio reconstruction and performance.

pub mod performance;
pub mod snapshot;
