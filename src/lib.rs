pub mod config;
pub mod date_matcher;
pub mod offset;
pub mod pipeline;
pub mod record_stream;
pub mod report;

// Re-export main types for convenient access
pub use config::{ScanConfig, DEFAULT_OFFSET};
pub use date_matcher::{find_dates, DateMatcher, DateSpan};
pub use offset::{adjust, adjust_all, AdjustedSpan};
pub use record_stream::{records, Record, RecordAssembler, RecordMeta, RecordStream};
pub use report::{format_block, ReportWriter};

// Re-export pipeline entry points for the CLI and benchmarks
pub use pipeline::{run, scan_records, RunStats};
