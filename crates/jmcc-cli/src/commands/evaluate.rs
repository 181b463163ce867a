//! Evaluate command implementation.

use std::io::Write;

use jmcc_alerts::{AlertConfig, AlertEngine};

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output::{NotificationList, OutputFormat};
use crate::snapshot;

/// Prints the notifications a snapshot would trigger.
pub struct EvaluateCommand<'a> {
    config: &'a AlertConfig,
}

impl<'a> EvaluateCommand<'a> {
    /// Creates a new evaluate command handler.
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
        let engine = AlertEngine::new(self.config.clone());

        let list = NotificationList {
            records: records.len(),
            notifications: engine.evaluate(&records, now),
        };

        format.write(out, &list)
    }
}
