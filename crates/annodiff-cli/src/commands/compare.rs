//! Compare command
//!
//! Usage: annodiff compare <ORIGINAL> <EXPORTED> [--output <FILE>] [--ignore <FIELD>]...
//!        [--coverage original-only|union] [--store <DIR>]

use annodiff_core::config::{AnnodiffConfig, CompareOptions, RecordCoverage};
use annodiff_core::errors::{io_error, AnnodiffError};
use annodiff_core::{serialize, Comparator, Report};
use annodiff_core_types::SessionId;
use annodiff_store::{allowed_input_file, FsReportStore, ReportStore};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Original dataset (JSONL)
    pub original: PathBuf,

    /// Exported dataset (JSONL)
    pub exported: PathBuf,

    /// Write the report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metadata field to ignore (repeatable; replaces the configured list)
    #[arg(long = "ignore", value_name = "FIELD")]
    pub ignore: Vec<String>,

    /// Which record ids to walk
    #[arg(long, value_name = "original-only|union")]
    pub coverage: Option<RecordCoverage>,

    /// Also save the report in the store under this directory
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,
}

/// Execute compare command
pub fn execute(
    args: CompareArgs,
    config: &AnnodiffConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    check_input_name(&args.original)?;
    check_input_name(&args.exported)?;

    let options = merge_options(&args, &config.compare);
    let report = Comparator::new(options).compare_files(&args.original, &args.exported)?;

    let mut to_stdout = true;

    if let Some(output_path) = &args.output {
        let file = File::create(output_path).map_err(|e| io_error("create_output", e))?;
        serialize(&report, BufWriter::new(file))?;
        println!("✓ Report written to {}", output_path.display());
        to_stdout = false;
    }

    if let Some(root) = &args.store {
        let store = FsReportStore::new(root);
        let session = SessionId::new();
        let path = store.save(&session, &report)?;
        tracing::info!(session_id = session.as_str(), "report stored");
        println!(
            "✓ Report stored as session {} ({})",
            session,
            path.display()
        );
        to_stdout = false;
    }

    if to_stdout {
        serialize(&report, io::stdout().lock())?;
        eprintln!("{}", counts_line(&report));
    } else {
        println!("{}", counts_line(&report));
    }

    Ok(())
}

fn check_input_name(path: &Path) -> Result<(), AnnodiffError> {
    let name = path.to_string_lossy();
    if allowed_input_file(&name) {
        Ok(())
    } else {
        Err(AnnodiffError::InvalidInput {
            reason: format!("{} is not a .json or .jsonl file", path.display()),
        })
    }
}

/// Command-line flags win over the configuration file
fn merge_options(args: &CompareArgs, configured: &CompareOptions) -> CompareOptions {
    CompareOptions {
        ignored_fields: if args.ignore.is_empty() {
            configured.ignored_fields.clone()
        } else {
            args.ignore.clone()
        },
        record_coverage: args.coverage.unwrap_or(configured.record_coverage),
    }
}

fn counts_line(report: &Report) -> String {
    format!(
        "Records with changes: {}/{} (identical text: {})",
        report.metadata.records_with_changes,
        report.metadata.total_records,
        report.summary.identical_text_content
    )
}
