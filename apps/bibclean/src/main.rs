//! bibclean
//!
//! Rewrites a BibTeX library into a cleaned copy with venue abbreviations,
//! asking on the terminal whenever the built-in rules cannot decide.

use std::path::PathBuf;

use bibclean_core::{clean_file, CleanConfig, ConsoleOperator};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Normalize and deduplicate a BibTeX library
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// BibTeX library to read
    #[arg(long, default_value = "bib.bib")]
    input: PathBuf,

    /// Where to write the cleaned library
    #[arg(long, default_value = "bib_clean.bib")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so prompts on stdout stay readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let project_root = std::env::current_dir().ok();
    let config = CleanConfig::load_standard(project_root.as_deref())?;

    let mut operator = ConsoleOperator::stdio().with_venue_hints(&config.venue_table());
    info!("Cleaning {:?} into {:?}", cli.input, cli.output);
    let report = clean_file(&cli.input, &cli.output, &config, &mut operator)?;
    info!("{}", report);

    Ok(())
}
