//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reporter - deliver messages to the batching service, the message server
/// and local backup files
#[derive(Parser, Debug)]
#[command(
    name = "reporter",
    author,
    version,
    about = "Message delivery fan-out",
    long_about = "Delivers topic messages to up to three destinations.\n\n\
                  A remote batching service, a remote HTTP message server and a \n\
                  local append-only backup file, with a recovery file when the \n\
                  message server cannot be reached."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REPORTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REPORTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on this port
    #[arg(long, global = true, env = "REPORTER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deliver one message
    Send(SendArgs),

    /// Validate configuration file without sending
    Validate(ValidateArgs),

    /// Display the resolved delivery routes
    Info(InfoArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "reporting.toml",
        env = "REPORTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Topic of the message
    #[arg(short, long)]
    pub topic: String,

    /// Message as a JSON object; read from stdin when omitted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Override host from configuration
    #[arg(long, env = "REPORTER_HOST")]
    pub host: Option<String>,

    /// Override cluster from configuration
    #[arg(long, env = "REPORTER_CLUSTER")]
    pub cluster: Option<String>,

    /// Override realTimeLoggingEnabled from configuration
    #[arg(long, env = "REPORTER_REAL_TIME")]
    pub real_time: Option<bool>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30", env = "REPORTER_HTTP_TIMEOUT")]
    pub http_timeout: u64,

    /// Exit with an error when any destination failed
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "reporting.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "reporting.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
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
