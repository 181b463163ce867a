//! # jmcc-cli
//!
//! Command-line runner for JMCC journey plan alerting.
//!
//! Provides commands for:
//! - Previewing the alerts a snapshot would trigger
//! - Inspecting snapshot metrics
//! - Delivering alerts through the log and email channels
//!
//! Snapshots are JSON arrays of rows exactly as the dashboard returns them.
//! Rows that are not in transit are dropped before evaluation, matching the
//! query the dashboard runs after each write.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod snapshot;

pub use cli::{Cli, Commands, Format, SnapshotArgs};
pub use error::CliError;
pub use output::OutputFormat;
