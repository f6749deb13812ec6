//! Show command
//!
//! Usage: annodiff show <SESSION_ID> [--store <DIR>] [--redact]

use annodiff_core::config::AnnodiffConfig;
use annodiff_core::diff::{render_human_summary, RenderOptions};
use annodiff_store::FsReportStore;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Session id printed by `compare --store`
    pub session_id: String,

    /// Store directory (default: `[store] root` from the configuration)
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Hide PII keywords, subject descriptions and text lines
    #[arg(long)]
    pub redact: bool,
}

/// Execute show command
pub fn execute(args: ShowArgs, config: &AnnodiffConfig) -> Result<(), Box<dyn std::error::Error>> {
    let root = args.store.unwrap_or_else(|| config.store.root.clone());
    let store = FsReportStore::new(root);
    let report = store.load_by_str(&args.session_id)?;

    print!(
        "{}",
        render_human_summary(
            &report,
            &RenderOptions {
                redact: args.redact
            }
        )
    );
    Ok(())
}
