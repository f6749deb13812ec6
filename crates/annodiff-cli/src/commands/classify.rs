//! Classify command
//!
//! Usage: annodiff classify <REPORT> [--output <FILE>]

use super::read_report;
use annodiff_core::postprocess::{default_classifiers, summarize_change_types, SummaryDocument};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Report JSON written by `compare`
    pub report: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute classify command
pub fn execute(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = read_report(&args.report)?;
    let summary = summarize_change_types(&report, &default_classifiers());
    let json = serde_json::to_string_pretty(&SummaryDocument::from(summary))?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, json + "\n")?;
        println!("✓ Summary written to {}", output_path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
