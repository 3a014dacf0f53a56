//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabmap_cli::edits::MappingEdits;
use tabmap_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tabmap",
    version,
    about = "Map columns of a source table onto a target template and export the result",
    long_about = "Map columns of a source table onto a target template and export the result.\n\n\
                  Target columns take either a source column or a fixed literal value.\n\
                  Mappings are remembered per template and restored on the next run."
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

    /// Allow cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Read settings from this file instead of the platform location.
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,

    /// Directory of the mapping cache (overrides settings).
    #[arg(long = "cache-dir", value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the columns of a target template or a source file.
    Headers(HeadersArgs),

    /// List the distinct values of a source column.
    Values(ValuesArgs),

    /// Apply a mapping and export the target table.
    Export(ExportArgs),

    /// Inspect or clear the remembered mapping.
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Parser)]
pub struct HeadersArgs {
    /// CSV file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Read the file as a source dataset (header row plus data rows).
    #[arg(long = "source")]
    pub source: bool,
}

#[derive(Parser)]
pub struct ValuesArgs {
    /// Source CSV file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Column whose values to list.
    #[arg(value_name = "COLUMN")]
    pub column: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Target template CSV; its first non-blank row names the output columns.
    #[arg(long = "target", value_name = "FILE")]
    pub target: PathBuf,

    /// Source data CSV.
    #[arg(long = "source", value_name = "FILE")]
    pub source: PathBuf,

    #[command(flatten)]
    pub edits: MappingEdits,

    /// Output format (overrides settings).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Output directory (overrides settings; default: working directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Neither restore nor remember the mapping.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Print the first N exported rows.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,

    /// Build the table without writing a file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Show the remembered mapping.
    Show,
    /// Forget the remembered mapping.
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Xlsx,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Xlsx => OutputFormat::Workbook,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
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
