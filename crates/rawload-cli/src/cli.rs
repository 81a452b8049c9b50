//! CLI argument definitions for rawload.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rawload_ingest::DEFAULT_SAMPLE_ROWS;

#[derive(Parser)]
#[command(
    name = "rawload",
    version,
    about = "Contract-driven CSV ingestion",
    long_about = "Load raw CSV files into typed tables.\n\n\
                  A YAML contract declares renames, text normalization, numeric columns\n\
                  and validations. Rows are checked before anything reaches the sink."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline for one contract and write the result to the sink.
    ///
    /// Stage progress (input columns, chosen numeric kinds, row and column
    /// counts) is logged at info level; pass -v to see it.
    Load(LoadArgs),

    /// Resolve a contract against a CSV header and print the plan as JSON.
    Plan(SourceArgs),

    /// Profile a CSV file and write a Markdown report.
    Profile(ProfileArgs),

    /// Copy the header and the first rows of a CSV file.
    Sample(SampleArgs),
}

/// Contract plus where to find its source file.
#[derive(Parser)]
pub struct SourceArgs {
    /// Path to the YAML contract.
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// CSV to read instead of <DATA_DIR>/<source_file>.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Directory holding source files named by contracts.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data/raw")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Run every stage but do not write to the sink.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Directory the CSV sink writes <TABLE>.csv into.
    #[arg(long = "target-dir", value_name = "DIR", default_value = "warehouse")]
    pub target_dir: PathBuf,

    /// Directory for duplicate-key samples.
    #[arg(
        long = "quarantine-dir",
        value_name = "DIR",
        default_value = "docs/duplicates"
    )]
    pub quarantine_dir: PathBuf,

    /// Append to an existing table instead of replacing it.
    #[arg(long = "append")]
    pub append: bool,
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// CSV file to profile.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,

    /// Delimiter to use instead of sniffing one.
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Directory for the Markdown report.
    #[arg(long = "out-dir", value_name = "DIR", default_value = "docs/profiles")]
    pub out_dir: PathBuf,
}

#[derive(Parser)]
pub struct SampleArgs {
    /// CSV file to sample.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output file (default: <stem>_sample<ROWS>.csv beside the input).
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Number of data rows to keep.
    #[arg(long = "rows", default_value_t = DEFAULT_SAMPLE_ROWS)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
