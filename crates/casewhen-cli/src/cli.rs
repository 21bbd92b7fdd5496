//! CLI argument definitions for the casewhen runner.

use std::path::PathBuf;

use casewhen_cli::logging::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "casewhen",
    version,
    about = "Derive columns from case/when rule chains and print their lineage",
    long_about = "Load a CSV dataset, derive new columns from JSON rule chains and\n\
                  print the resulting table together with the lineage audit trail\n\
                  recorded for every evaluation step."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Apply rule chains to a CSV dataset and print the table and lineage.
    Run(RunArgs),

    /// List the columns of a CSV dataset with their data types.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV file to load.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Rule chain JSON files, applied in the order given. Each file holds
    /// one chain object or an array of chains.
    #[arg(long = "rules", value_name = "JSON", required = true, num_args = 1..)]
    pub rules: Vec<PathBuf>,

    /// Dataset metadata sidecar (JSON).
    #[arg(long = "meta", value_name = "JSON")]
    pub meta: Option<PathBuf>,

    /// Dataset name recorded in lineage (default: file stem).
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Where the dataset was obtained from.
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Text columns to parse as timestamps after loading.
    #[arg(long = "datetime", value_name = "COL")]
    pub datetime: Vec<String>,

    /// Rows inspected when inferring column types.
    #[arg(long = "infer-rows", value_name = "N", default_value_t = 100)]
    pub infer_rows: usize,

    /// Keep only a sample extract starting at this row.
    #[arg(long = "sample-offset", value_name = "N")]
    pub sample_offset: Option<usize>,

    /// Rows in the sample window.
    #[arg(
        long = "sample-len",
        value_name = "N",
        default_value_t = 10,
        requires = "sample_offset"
    )]
    pub sample_len: usize,

    /// Trailing rows appended to the sample window.
    #[arg(
        long = "sample-tail",
        value_name = "N",
        default_value_t = 1,
        requires = "sample_offset"
    )]
    pub sample_tail: usize,

    /// Output column name for chains that do not name one.
    #[arg(long = "output-name", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Fail instead of replacing an existing column.
    #[arg(long = "no-overwrite")]
    pub no_overwrite: bool,

    /// Rows of the derived table to print.
    #[arg(long = "max-rows", value_name = "N", default_value_t = 20)]
    pub max_rows: usize,

    /// Highlight rows whose value in this column repeats.
    #[arg(long = "highlight-duplicates", value_name = "COL")]
    pub highlight_duplicates: Option<String>,

    /// Second CSV left-joined onto the dataset before rules are applied.
    #[arg(long = "join", value_name = "CSV", requires = "on")]
    pub join: Option<PathBuf>,

    /// Key columns for --join.
    #[arg(long = "on", value_name = "COL", requires = "join")]
    pub on: Vec<String>,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// CSV file to inspect.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Only list columns whose name contains this text.
    #[arg(long = "contains", value_name = "TEXT")]
    pub contains: Option<String>,

    /// Match --contains case-sensitively.
    #[arg(long = "case-sensitive", requires = "contains")]
    pub case_sensitive: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
