//! CLI argument definitions for Data Cleaning Studio.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dcs",
    version,
    about = "Data Cleaning Studio - Profile and clean tabular datasets",
    long_about = "Profile and clean tabular datasets.\n\n\
                  Detects column types and missing values, normalizes currency text,\n\
                  and writes cleaned CSV or JSON together with an audit log."
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
    /// Show the detected type and value counts of every column.
    Profile(InputArgs),

    /// Show columns with missing values and the treatments they accept.
    Missing(InputArgs),

    /// Clean a dataset and write the result.
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Dataset to read (.csv, .xlsx, .xls, .ods or .json).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Dataset to read (.csv, .xlsx, .xls, .ods or .json).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Where to write the cleaned dataset.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Output format (default: from the output extension, else csv).
    #[arg(long = "format", value_enum)]
    pub format: Option<ExportFormatArg>,

    /// TOML recipe of cleaning steps to apply after the flag-driven steps.
    #[arg(long = "recipe", value_name = "PATH")]
    pub recipe: Option<PathBuf>,

    /// Column holding monetary text to convert to numbers (repeatable).
    #[arg(long = "currency", value_name = "COLUMN")]
    pub currency: Vec<String>,

    /// Currency symbol shown in reports.
    #[arg(long = "symbol", default_value = "$")]
    pub symbol: String,

    /// Decimal separator of monetary text.
    #[arg(long = "decimal", default_value_t = '.')]
    pub decimal: char,

    /// Thousands separator of monetary text (",", ".", " " or "none").
    /// Defaults to "." after a decimal comma and "," otherwise.
    #[arg(long = "thousands")]
    pub thousands: Option<String>,

    /// Remove duplicate rows first.
    #[arg(long = "dedupe")]
    pub dedupe: bool,

    /// Trim surrounding whitespace in text columns.
    #[arg(long = "trim")]
    pub trim: bool,

    /// Also write the audit log as CSV.
    #[arg(long = "audit-log", value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Print the result as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
    Xlsx,
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
