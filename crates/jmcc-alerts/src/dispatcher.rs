//! Post-write alert dispatch.
//!
//! The [`AlertDispatcher`] is what a write path calls once an insert or update
//! has committed: it pulls a fresh snapshot of in-transit journeys from a
//! [`SnapshotSource`], runs the [`AlertEngine`], and pushes each notification
//! through every enabled channel. Nothing here reports failure back to the
//! write; problems are logged and counted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channels::NotificationChannel;
use crate::config::AlertConfig;
use crate::engine::AlertEngine;
use crate::error::Result;
use crate::types::{JourneyRecord, NotificationRequest};

/// Supplies the journeys alerting runs against.
///
/// Implementations return rows whose status is "in transit", compared
/// without regard to case.
pub trait SnapshotSource: Send + Sync {
    /// Fetches the current in-transit journeys.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Snapshot` if the store cannot be queried.
    fn in_transit_records(&self) -> Result<Vec<JourneyRecord>>;
}

/// A fixed, in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot {
    records: Vec<JourneyRecord>,
}

impl StaticSnapshot {
    /// Creates a snapshot over the given rows. Rows not in transit are
    /// filtered out when fetched.
    #[must_use]
    pub const fn new(records: Vec<JourneyRecord>) -> Self {
        Self { records }
    }
}

impl SnapshotSource for StaticSnapshot {
    fn in_transit_records(&self) -> Result<Vec<JourneyRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_in_transit())
            .cloned()
            .collect())
    }
}

/// Outcome of pushing notifications through the channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Notifications the engine produced.
    pub notifications: usize,
    /// Successful channel deliveries.
    pub sent: usize,
    /// Failed channel deliveries.
    pub failed: usize,
}

/// Evaluates alerts after writes and delivers the results.
#[derive(Debug)]
pub struct AlertDispatcher {
    engine: AlertEngine,
    channels: RwLock<Vec<Box<dyn NotificationChannel>>>,
}

impl AlertDispatcher {
    /// Creates a dispatcher with no channels.
    #[must_use]
    pub fn new(config: AlertConfig) -> Self {
        Self {
            engine: AlertEngine::new(config),
            channels: RwLock::new(Vec::new()),
        }
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &AlertEngine {
        &self.engine
    }

    /// Adds a notification channel.
    pub fn add_channel(&self, channel: Box<dyn NotificationChannel>) {
        let mut channels = self.channels.write();
        info!(channel = %channel.name(), "added notification channel");
        channels.push(channel);
    }

    /// Returns the number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Evaluates the rules without sending anything.
    #[must_use]
    pub fn evaluate(
        &self,
        records: &[JourneyRecord],
        now: DateTime<Utc>,
    ) -> Vec<NotificationRequest> {
        self.engine.evaluate(records, now)
    }

    /// Sends every request through every enabled channel.
    pub fn dispatch(&self, requests: &[NotificationRequest]) -> DispatchReport {
        let mut report = DispatchReport {
            notifications: requests.len(),
            ..DispatchReport::default()
        };

        let channels = self.channels.read();
        if channels.is_empty() || requests.is_empty() {
            return report;
        }

        for request in requests {
            for channel in channels.iter().filter(|c| c.is_enabled()) {
                match channel.send(request) {
                    Ok(result) if result.success => report.sent += 1,
                    Ok(result) => {
                        warn!(
                            channel = %result.channel,
                            rule = %request.rule,
                            message = ?result.message,
                            "notification failed"
                        );
                        report.failed += 1;
                    }
                    Err(e) => {
                        warn!(
                            channel = %channel.name(),
                            rule = %request.rule,
                            error = %e,
                            "notification error"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        debug!(
            notifications = report.notifications,
            sent = report.sent,
            failed = report.failed,
            "dispatch complete"
        );

        report
    }

    /// Fetches a snapshot, evaluates it, and dispatches the result.
    ///
    /// A snapshot failure is logged and produces an empty report.
    pub fn after_write(&self, source: &dyn SnapshotSource, now: DateTime<Utc>) -> DispatchReport {
        let records = match source.in_transit_records() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "skipping alert evaluation, snapshot unavailable");
                return DispatchReport::default();
            }
        };

        let requests = self.engine.evaluate(&records, now);
        self.dispatch(&requests)
    }

    /// Runs [`after_write`](Self::after_write) on the blocking pool and
    /// returns immediately.
    ///
    /// Callers may drop the handle. Must be called within a tokio runtime.
    pub fn spawn_after_write(
        self: Arc<Self>,
        source: Arc<dyn SnapshotSource>,
        now: DateTime<Utc>,
    ) -> JoinHandle<DispatchReport> {
        tokio::task::spawn_blocking(move || self.after_write(source.as_ref(), now))
    }
}
