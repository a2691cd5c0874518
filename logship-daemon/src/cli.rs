//! CLI argument definitions for logship-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Container log shipping daemon.
///
/// Reads NDJSON log entries from stdin, normalizes and filters them,
/// and delivers batches to the configured collector endpoint.
#[derive(Parser, Debug)]
#[command(name = "logship-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to logship.toml configuration file.
    ///
    /// When omitted, built-in defaults plus environment variables are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
