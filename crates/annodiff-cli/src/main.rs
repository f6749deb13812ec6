//! annodiff CLI
//!
//! Command-line interface for comparing annotated-text datasets

use annodiff_core::config::{load_config, AnnodiffConfig, CONFIG_FILE_NAME};
use annodiff_core::logging_facility::{self, Profile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "annodiff")]
#[command(about = "annodiff - Compare PII annotation datasets", long_about = None)]
struct Cli {
    /// Configuration file (default: ./annodiff.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two JSONL datasets and write the change report
    Compare(commands::compare::CompareArgs),
    /// Render a saved report as a Markdown summary
    Render(commands::render::RenderArgs),
    /// Count change types in a saved report
    Classify(commands::classify::ClassifyArgs),
    /// Render a report from the store by session id
    Show(commands::show::ShowArgs),
}

fn load_settings(cli: &Cli) -> Result<AnnodiffConfig, Box<dyn std::error::Error>> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    Ok(load_config(&path)?)
}

fn main() {
    let cli = Cli::parse();

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let profile = if cli.json_logs {
        Profile::Production
    } else {
        config.logging.profile
    };
    logging_facility::init(profile);

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args, &config),
        Commands::Render(args) => commands::render::execute(args),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Show(args) => commands::show::execute(args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
