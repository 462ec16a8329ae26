//! Daily returns report.

mod report_writer;

pub use report_writer::*;
