//! Result persistence
//!
//! The result file is one JSON object per line. Line 1 is a statistics
//! header padded to [`HEADER_WIDTH`] bytes so it can be patched in place
//! without moving the records that follow it.

mod file;
mod header;
mod record;
mod result_store;

pub use file::HeaderedLog;
pub use header::{HEADER_WIDTH, StatsHeader, is_header_object};
pub use record::{RecordVerdict, ResultRecord};
pub use result_store::{ResultStore, ScanReport};
