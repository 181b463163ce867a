//! Metrics command implementation.

use std::io::Write;

use jmcc_alerts::{AlertConfig, AlertMetrics, normalize};

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output::{MetricsView, OutputFormat};
use crate::snapshot;

/// Prints the aggregate metrics for a snapshot.
pub struct MetricsCommand<'a> {
    config: &'a AlertConfig,
}

impl<'a> MetricsCommand<'a> {
    /// Creates a new metrics command handler.
    #[must_use]
    pub const fn new(config: &'a AlertConfig) -> Self {
        Self { config }
    }

    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be loaded or output fails.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SnapshotArgs,
    ) -> Result<(), CliError> {
        let (records, now) = snapshot::load(args)?;
        let normalized = normalize(&records);

        let view = MetricsView {
            records: records.len(),
            metrics: AlertMetrics::from_records(&normalized, now, &self.config.thresholds),
        };

        format.write(out, &view)
    }
}
