//! Command-line interface definitions for dupewalk.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! dupewalk
//!
//! # Scan two trees and emit JSON
//! dupewalk ~/Pictures /mnt/backup --output json
//!
//! # Debug output, custom logging config
//! dupewalk -d -c ~/.config/dupewalk/logging.toml ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find duplicate files by content digest.
///
/// Every regular file under the given directories is hashed and files with
/// identical contents are listed together.
#[derive(Debug, Parser)]
#[command(name = "dupewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (default: current directory)
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Logging config file (TOML)
    #[arg(
        short = 'c',
        long = "logging-conf",
        value_name = "PATH",
        default_value = "logging.toml"
    )]
    pub logging_conf: PathBuf,

    /// Show the parsed arguments and exit
    #[arg(short, long)]
    pub test: bool,

    /// Show debug messages (-dd for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Show fewer messages (warnings and errors only)
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Abort on the first scan error instead of skipping the path
    #[arg(long)]
    pub strict: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print a scan summary to stderr after the report
    #[arg(long)]
    pub summary: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Digest header followed by indented paths
    Text,
    /// JSON output for scripting
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
