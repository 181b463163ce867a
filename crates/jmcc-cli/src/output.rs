//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use jmcc_alerts::{AlertMetrics, DispatchReport, NotificationRequest};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Notifications produced by an evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    /// Rows in the snapshot after filtering.
    pub records: usize,
    /// The notifications, in rule order.
    pub notifications: Vec<NotificationRequest>,
}

impl TableDisplay for NotificationList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.notifications.is_empty() {
            writeln!(writer, "No alerts for {} in-transit journey(s).", self.records)?;
            return Ok(());
        }

        writeln!(
            writer,
            "{} alert(s) for {} in-transit journey(s)",
            self.notifications.len(),
            self.records
        )?;
        for n in &self.notifications {
            writeln!(writer)?;
            writeln!(writer, "══════════════════════════════════")?;
            writeln!(writer, "Rule:       {}", n.rule)?;
            if let Some(group) = &n.group {
                writeln!(writer, "Group:      {group}")?;
            }
            let recipients: Vec<&str> = n.recipients.iter().map(String::as_str).collect();
            writeln!(writer, "To:         {}", recipients.join(", "))?;
            writeln!(writer, "Subject:    {}", n.subject)?;
            writeln!(writer, "──────────────────────────────────")?;
            writeln!(writer, "{}", n.body)?;
        }
        Ok(())
    }
}

/// Metrics for a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    /// Rows in the snapshot after filtering.
    pub records: usize,
    /// The aggregate counts.
    pub metrics: AlertMetrics,
}

impl TableDisplay for MetricsView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let m = &self.metrics;
        writeln!(writer, "Journey Metrics")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Records:             {}", self.records)?;
        writeln!(writer, "Live journeys:       {}", m.live_journeys)?;
        writeln!(writer, "Critical check:      {}", m.critical_check)?;
        writeln!(writer, "Due for checking:    {}", m.due_for_checking)?;
        writeln!(writer, "Stopped trucks:      {}", m.stopped_trucks)?;
        writeln!(writer, "Stopped for the day: {}", m.stopped_for_day)?;
        Ok(())
    }
}

/// Result of a dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchView {
    /// Channels the notifications went through.
    pub channels: Vec<String>,
    /// Delivery counts.
    pub report: DispatchReport,
}

impl TableDisplay for DispatchView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Dispatch")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Channels:      {}", self.channels.join(", "))?;
        writeln!(writer, "Notifications: {}", self.report.notifications)?;
        writeln!(writer, "Sent:          {}", self.report.sent)?;
        writeln!(writer, "Failed:        {}", self.report.failed)?;
        Ok(())
    }
}
