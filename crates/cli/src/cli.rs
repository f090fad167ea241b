//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Bulk - command batching pipeline
#[derive(Parser, Debug)]
#[command(
    name = "bulk",
    author,
    version,
    about = "Batch newline-delimited commands into bulks",
    long_about = "Reads newline-delimited commands, groups them into bulks by a \n\
                  count threshold or explicit { } block markers, and persists \n\
                  each completed bulk asynchronously to the console and to one \n\
                  uniquely-named log file per bulk."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "BULK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "BULK_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Input file with commands (reads stdin when omitted)
    #[arg(short, long, env = "BULK_INPUT")]
    pub input: Option<PathBuf>,

    /// Commands per bulk outside of brace groups
    #[arg(short, long, default_value = "3", env = "BULK_SIZE")]
    pub bulk_size: usize,

    /// Directory for bulk log files
    #[arg(short, long, default_value = ".", env = "BULK_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Number of workers draining the file queue
    #[arg(long, default_value = "2", env = "BULK_FILE_WORKERS")]
    pub file_workers: usize,

    /// Capacity of each sink queue
    #[arg(long, default_value = "1024", env = "BULK_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BULK_METRICS_PORT")]
    pub metrics_port: u16,
}

impl Cli {
    /// Default log level from the -v / -q flags (RUST_LOG still overrides)
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
