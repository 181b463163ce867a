//! Dispatch command implementation.

use std::io::Write;

use jmcc_alerts::{AlertConfig, AlertDispatcher, EmailChannel, LogChannel, StaticSnapshot};

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output::{DispatchView, OutputFormat};
use crate::snapshot;

/// Evaluates a snapshot and delivers the notifications.
pub struct DispatchCommand<'a> {
    config: &'a AlertConfig,
}

impl<'a> DispatchCommand<'a> {
    /// Creates a new dispatch command handler.
    #[must_use]
    pub const fn new(config: &'a AlertConfig) -> Self {
        Self { config }
    }

    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns error if email is requested without a usable configuration,
    /// the snapshot cannot be loaded, or output fails.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SnapshotArgs,
        email: bool,
    ) -> Result<(), CliError> {
        if email {
            self.config.validate_for_email()?;
        }

        let now = snapshot::parse_now(args.now.as_deref())?;
        let source = StaticSnapshot::new(snapshot::read_records(&args.records)?);

        let dispatcher = AlertDispatcher::new(self.config.clone());
        let mut channels = vec!["log".to_string()];
        dispatcher.add_channel(Box::new(LogChannel::default()));
        if email {
            channels.push("email".to_string());
            let sender = &dispatcher.engine().config().sender;
            dispatcher.add_channel(Box::new(EmailChannel::new("email", sender)));
        }

        let view = DispatchView {
            channels,
            report: dispatcher.after_write(&source, now),
        };

        format.write(out, &view)
    }
}
