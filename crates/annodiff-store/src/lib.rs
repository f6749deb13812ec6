//! annodiff store - filesystem persistence for change reports
//!
//! Provides:
//! - `ReportStore` and its filesystem implementation, one JSON file per session
//! - Atomic temp→rename writes
//! - The input file-name filter applied before a dataset is accepted

pub mod atomic;
pub mod errors;
pub mod fs_store;
pub mod input;

// Re-export key types
pub use errors::Result;
pub use fs_store::{FsReportStore, ReportStore};
pub use input::allowed_input_file;
