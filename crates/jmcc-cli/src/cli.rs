//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// JMCC journey plan alerting.
#[derive(Parser, Debug, Clone)]
#[command(name = "jmcc-alerts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Alert configuration file (JSON).
    #[arg(short, long, env = "JMCC_ALERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the notifications a snapshot would trigger.
    Evaluate(SnapshotArgs),

    /// Print the aggregate metrics for a snapshot.
    Metrics(SnapshotArgs),

    /// Evaluate a snapshot and deliver the notifications.
    Dispatch {
        /// Snapshot to evaluate.
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Also deliver through the email channel.
        #[arg(long)]
        email: bool,
    },
}

/// Where the snapshot comes from and when it is evaluated.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// JSON array of journey plan rows; `-` reads stdin.
    #[arg(short, long)]
    pub records: PathBuf,

    /// Evaluation time (RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<String>,
}
