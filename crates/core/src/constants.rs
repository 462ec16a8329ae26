/// Benchmarks reported next to the portfolio when none are configured
pub const DEFAULT_BENCHMARK_CODES: [&str; 2] = ["BOVA11", "IVVB11"];

/// Directory scanned for market data feeds
pub const DEFAULT_IMPORT_DIR: &str = "./import";

/// Trade ledger exported from the brokerage
pub const DEFAULT_LEDGER_PATH: &str = "./cei/data.csv";

/// Where the daily returns table is written
pub const DEFAULT_OUTPUT_PATH: &str = "./result/result.csv";

/// Date format used by the trade ledger and the report
pub const LEDGER_DATE_FORMAT: &str = "%d/%m/%y";

/// Decimal precision for report values
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Suffix marking forward-market contracts, e.g. `PETR4F`
pub const FORWARD_MARKET_SUFFIX: char = 'F';

/// Ledger side codes
pub const LEDGER_BUY_CODE: &str = "C";
pub const LEDGER_SELL_CODE: &str = "V";
