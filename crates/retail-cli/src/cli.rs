//! CLI argument definitions for the retail ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use retail_model::Entity;

#[derive(Parser)]
#[command(
    name = "retail-etl",
    version,
    about = "Retail ETL - extract, clean and load sales data",
    long_about = "Extract retail data from a legacy database, a store API, PDF documents\n\
                  and object storage, clean each dataset with its entity rules, and load\n\
                  the results into the target database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the TOML config file (default: ./retail-etl.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract, clean and load entities (all of them when none are named).
    Run(RunArgs),

    /// Clean a local CSV or JSON file as the given entity.
    Clean(CleanArgs),

    /// List entities with their sources, sink tables and cleaning steps.
    Entities,

    /// List the tables in the source or target database.
    Tables(TablesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Entities to process, e.g. `users stores`.
    #[arg(value_name = "ENTITY")]
    pub entities: Vec<Entity>,

    /// Clean without uploading.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Entity whose pipeline to apply.
    #[arg(value_name = "ENTITY")]
    pub entity: Entity,

    /// CSV or JSON file holding the raw data.
    #[arg(long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Sink table name (default: the entity's configured table).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Clean without uploading.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// List the target database instead of the source database.
    #[arg(long = "target")]
    pub target: bool,
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
