//! Loading journey snapshots and configuration from disk.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use jmcc_alerts::{AlertConfig, JourneyRecord, SnapshotSource, StaticSnapshot};
use tracing::debug;

use crate::cli::SnapshotArgs;
use crate::error::CliError;

/// Reads a JSON array of journey plan rows from a file, or stdin for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not an array of rows.
pub fn read_records(path: &Path) -> Result<Vec<JourneyRecord>, CliError> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::Snapshot(format!("{}: {e}", path.display())))?
    };

    parse_records(&raw)
}

/// Parses a JSON array of journey plan rows.
///
/// # Errors
///
/// Returns `CliError::Snapshot` if the text is not an array of rows.
pub fn parse_records(raw: &str) -> Result<Vec<JourneyRecord>, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Snapshot(e.to_string()))
}

/// Keeps only rows in transit, as the dashboard's snapshot query does.
///
/// # Errors
///
/// Propagates errors from the snapshot source.
pub fn in_transit(records: Vec<JourneyRecord>) -> Result<Vec<JourneyRecord>, CliError> {
    let total = records.len();
    let kept = StaticSnapshot::new(records).in_transit_records()?;
    debug!(total, kept = kept.len(), "filtered snapshot to in-transit rows");
    Ok(kept)
}

/// Parses the evaluation time, defaulting to now.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for text that is not RFC 3339.
pub fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CliError::InvalidArgument(format!("--now {raw:?}: {e}"))),
        None => Ok(Utc::now()),
    }
}

/// Loads the in-transit rows and evaluation time for a command.
///
/// # Errors
///
/// Returns an error if the rows or the time cannot be read.
pub fn load(args: &SnapshotArgs) -> Result<(Vec<JourneyRecord>, DateTime<Utc>), CliError> {
    let now = parse_now(args.now.as_deref())?;
    let records = in_transit(read_records(&args.records)?)?;
    Ok((records, now))
}

/// Loads the alert configuration, applying environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the result is invalid.
pub fn load_config(path: Option<&Path>) -> Result<AlertConfig, CliError> {
    let config = match path {
        Some(path) => AlertConfig::from_file(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?,
        None => AlertConfig::default(),
    }
    .apply_env();

    config.validate()?;
    Ok(config)
}
