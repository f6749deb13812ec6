//! Render command
//!
//! Usage: annodiff render <REPORT> [--redact] [--output <FILE>]

use super::read_report;
use annodiff_core::diff::{render_human_summary, RenderOptions};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Report JSON written by `compare`
    pub report: PathBuf,

    /// Hide PII keywords, subject descriptions and text lines
    #[arg(long)]
    pub redact: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = read_report(&args.report)?;
    let markdown = render_human_summary(
        &report,
        &RenderOptions {
            redact: args.redact,
        },
    );

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, markdown)?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        print!("{}", markdown);
    }

    Ok(())
}
