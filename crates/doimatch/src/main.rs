use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};
use simple_logger::SimpleLogger;

use doimatch::{MatchReport, PatternSet, discover_archives, load_mapping_rows};

#[derive(Parser)]
#[command(name = "doimatch")]
#[command(about = "Match mapping-table DOIs (exact) against large .jsonl.gz DataCite records")]
#[command(version)]
struct Cli {
    /// Path to the mapping CSV (no header). Columns: PMID, PROJECT_NUMBER,
    /// mapped_id_type, mapped_id
    #[arg(short = 'm', long)]
    mapping_csv: PathBuf,

    /// Directory containing .jsonl.gz DataCite records
    #[arg(short = 'i', long)]
    input_dir: PathBuf,

    /// Path to the output CSV with match results
    #[arg(short = 'o', long)]
    output_csv: PathBuf,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(long, default_value = "INFO")]
    log_level: String,
}

fn parse_level(arg: &str) -> LevelFilter {
    match arg.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        other => {
            eprintln!("invalid log level '{other}', defaulting to INFO");
            LevelFilter::Info
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(parse_level(&cli.log_level))
        .init()?;

    info!("Loading mappings from {}...", cli.mapping_csv.display());
    let rows = load_mapping_rows(&cli.mapping_csv)
        .with_context(|| format!("failed to load mapping table {}", cli.mapping_csv.display()))?;
    info!("Loaded {} total mappings (mapped_id_type='doi').", rows.len());

    info!("Building trie for exact DOI matching...");
    let patterns = PatternSet::build(rows).context("failed to build the DOI pattern set")?;
    info!("Built trie with {} DOIs.", patterns.len());

    let mut report = MatchReport::create(&cli.output_csv)
        .with_context(|| format!("failed to create output file {}", cli.output_csv.display()))?;

    let archives = discover_archives(&cli.input_dir)
        .with_context(|| format!("failed to scan corpus root {}", cli.input_dir.display()))?;
    if archives.is_empty() {
        warn!("No .jsonl.gz files found in {}", cli.input_dir.display());
    }

    let summary = doimatch::run(&archives, &patterns, &mut report)?;
    report.finish().context("failed to finalize the match report")?;

    info!("Done. Total matches: {}", summary.matches);
    Ok(())
}
