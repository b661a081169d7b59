//! CLI argument definitions for dipscan.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `screen` | Run the screen and print both result tables |
//! | `export` | Run the screen and write the paired CSV report |
//!
//! # Examples
//!
//! ```bash
//! # Screen a watchlist, pretty JSON output
//! dipscan screen etf-watchlist.csv --pretty
//!
//! # Terminal tables instead of JSON
//! dipscan screen etf-watchlist.csv --format table
//!
//! # Write the paired CSV report with four concurrent fetch chains
//! dipscan export etf-watchlist.csv --output report.csv --concurrency 4
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Screen NSE exchange-traded funds for price deviation below a trailing
/// moving average.
#[derive(Debug, Parser)]
#[command(
    name = "dipscan",
    author,
    version,
    about = "ETF moving-average deviation screener"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request transport timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// ASCII table format for terminal display.
    Table,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the screen and print the full dataset and ranked underperformers.
    Screen(ScreenArgs),
    /// Run the screen and write the paired CSV report.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ScreenArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Destination file for the CSV report.
    #[arg(long, short = 'o', default_value = "dipscan_report.csv")]
    pub output: PathBuf,
}

/// Pipeline inputs shared by both subcommands.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Watchlist file with a SYMBOL header column.
    pub input: PathBuf,

    /// Liquidity gate: symbols must trade strictly more than this volume.
    #[arg(long, default_value_t = dipscan_core::DEFAULT_VOLUME_THRESHOLD)]
    pub min_volume: u64,

    /// Number of daily closes averaged.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub window: u16,

    /// History span (days) the closes are drawn from.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..))]
    pub lookback: u16,

    /// Ranked underperformers to keep.
    #[arg(long, default_value_t = dipscan_core::DEFAULT_TOP_N)]
    pub top: usize,

    /// Upper bound on symbols screened concurrently.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}
