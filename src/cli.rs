//! Command-line interface definitions for SpotCheck.
//!
//! Global options (verbosity, color, config file) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Compare two files with the default five samples
//! spotcheck check movie.mkv backup/movie.mkv
//!
//! # Check ./SourceFiles against the top level of a folder, as JSON
//! spotcheck batch /archive --samples 9 --output json
//!
//! # Whole-file BLAKE3 comparison for confirmation
//! spotcheck hash movie.mkv backup/movie.mkv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fast likely-duplicate detection by sampling a few bytes per file.
///
/// Files up to 5000 bytes are compared exactly. Larger files of equal length
/// are compared at a handful of evenly spread offsets, so a positive verdict
/// means "probably identical", not a guarantee.
#[derive(Debug, Parser)]
#[command(name = "spotcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to load instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two files using the tiered check
    Check(CheckArgs),
    /// Check every file in <ROOT>/<SOURCE_DIR> against every file in <ROOT>
    Batch(BatchArgs),
    /// Compare samples only, without the length gate
    Micro(PairArgs),
    /// Compare length and attributes only, without reading content
    Meta(PairArgs),
    /// Compare attributes of the files and their parent folders, then content
    Hard(PairArgs),
    /// Compare whole-file BLAKE3 digests
    Hash(PairArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Two files and an output format.
#[derive(Debug, Args)]
pub struct PairArgs {
    /// First file
    #[arg(value_name = "A")]
    pub a: PathBuf,

    /// Second file
    #[arg(value_name = "B")]
    pub b: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Number of samples per file (overrides the configured value)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: Option<u64>,
}

/// Arguments for the batch subcommand.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Folder whose top-level files are the comparison targets
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Number of samples per file (overrides the configured value)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: Option<u64>,

    /// Name of the source subfolder under ROOT
    #[arg(long, value_name = "NAME")]
    pub source_dir: Option<String>,

    /// Number of I/O threads for pair checks
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub io_threads: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub save: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
