//! Subcommand implementations

pub mod classify;
pub mod compare;
pub mod render;
pub mod show;

use annodiff_core::errors::io_error;
use annodiff_core::Report;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a report JSON file written by `compare`
pub(crate) fn read_report(path: &Path) -> annodiff_core::Result<Report> {
    let file = File::open(path).map_err(|e| io_error("open_report", e))?;
    annodiff_core::diff::deserialize(BufReader::new(file))
}
