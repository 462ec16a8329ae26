//! Activities module - trade records, the trade ledger, and its file parser.

mod activities_model;
mod ledger_parser;


pub use activities_model::{normalize_code, Trade, TradeLedger, TradeSide};
pub use ledger_parser::{parse_ledger, read_ledger};
