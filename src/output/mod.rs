//! Output handling: record serialization and the run report

mod json;
mod report;

pub use json::{load_metadata, write_metadata};
pub use report::{print_report, CrawlReport, RecordFailure};
