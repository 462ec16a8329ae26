//! Portfolio snapshot module - holdings replay and per-day state.

pub mod holdings_calculator;
mod holdings_model;
mod snapshot_model;

pub use holdings_calculator::*;
pub use holdings_model::*;
pub use snapshot_model::*;
