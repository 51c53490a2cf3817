//! Holdings CLI — update and inspect fund holdings snapshots.
//!
//! Commands:
//! - `update` — fetch every configured ticker and rewrite snapshots + manifest
//! - `inspect` — run a downloaded file through an adapter and print the result

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holdings_core::output::render_snapshot;
use holdings_core::{
    extract, run_update, HoldingsConfig, HttpFetcher, LogProgress, SnapshotWriter, SourceKind,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "holdings",
    about = "Holdings CLI — daily fund holdings snapshots"
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download holdings for every configured ticker and write snapshots.
    Update {
        /// Ticker config file (JSON, or TOML by extension).
        #[arg(long, default_value = "config.json")]
        config: PathBuf,

        /// Directory for `{TICKER}.csv` snapshots and `index.json`.
        #[arg(long, default_value = "docs/data")]
        out_dir: PathBuf,
    },
    /// Parse a local holdings file and print the extracted snapshot.
    Inspect {
        /// Downloaded workbook or CSV export.
        file: PathBuf,

        /// Source format: ssga, spdr, invesco, csv, ark.
        #[arg(long)]
        source: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Update { config, out_dir } => run_update_cmd(config, out_dir),
        Commands::Inspect { file, source } => run_inspect(file, &source),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("holdings={level},holdings_core={level}"))
    })?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
    Ok(())
}

fn run_update_cmd(config_path: PathBuf, out_dir: PathBuf) -> Result<()> {
    let config = HoldingsConfig::from_file(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    tracing::info!(tickers = config.len(), config = %config_path.display(), "starting update");

    let fetcher = HttpFetcher::new()?;
    let writer = SnapshotWriter::new(out_dir);

    // Per-ticker failures are already logged; only startup-level errors end up here.
    run_update(&config, &fetcher, &writer, &LogProgress).with_context(|| {
        format!("writing output to {}", writer.out_dir().display())
    })?;

    Ok(())
}

fn run_inspect(file: PathBuf, source: &str) -> Result<()> {
    let kind: SourceKind = source.parse()?;
    let bytes =
        std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;

    let table = kind.parse_bytes(bytes)?;
    tracing::debug!(rows = table.len(), source = %kind, "parsed table");

    let records = extract(&table)?;
    print!("{}", render_snapshot(&records)?);
    eprintln!("{} records", records.len());
    Ok(())
}
