//! CLI argument definitions for the field matcher.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmatch",
    version,
    about = "Match spreadsheet columns to the fields of a business schema",
    long_about = "Match profiled spreadsheet columns to the models and fields of a \
                  business application schema.\n\n\
                  The schema catalog is read from a directory of CSV exports \
                  (models.csv, fields.csv and optionally selections.csv, \
                  constraints.csv, relations.csv). Column profiles are read from JSON."
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
    /// Match every column of a profiled sheet against the catalog.
    Match(MatchArgs),

    /// Recommend target models from the sheet's column names alone.
    Recommend(RecommendArgs),

    /// Load a catalog and report its size and integrity issues.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Directory containing the catalog CSV files.
    #[arg(long = "catalog", value_name = "DIR")]
    pub catalog: PathBuf,

    /// JSON file with the column profiles of one sheet.
    #[arg(long = "profiles", value_name = "FILE")]
    pub profiles: PathBuf,

    /// TOML file overriding matcher weights and thresholds.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Restrict matching to these models (repeatable).
    ///
    /// The filter is intersected with the models recommended for the sheet;
    /// when nothing survives the intersection the filter is used alone.
    #[arg(long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write the result to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RecommendArgs {
    /// JSON file with the column profiles of one sheet.
    #[arg(long = "profiles", value_name = "FILE")]
    pub profiles: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Directory containing the catalog CSV files.
    #[arg(long = "catalog", value_name = "DIR")]
    pub catalog: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
