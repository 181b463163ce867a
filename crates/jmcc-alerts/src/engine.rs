//! Rule evaluation over a snapshot of in-transit journeys.
//!
//! The [`AlertEngine`] is pure: it normalizes the snapshot, computes
//! [`AlertMetrics`], evaluates the fixed rule set, and returns the
//! notifications that should go out. Delivery happens elsewhere.
//!
//! Rules, in output order:
//!
//! | Rule | Fires when | Body lists |
//! |------|------------|------------|
//! | critical check | `critical_check > 0` | overdue, not done, in transit |
//! | half due | `live > 0` and `due >= live / 2` | counts only |
//! | all stopped | `live == stopped`, `live > 0`, every id is done | every id |
//! | group overload | a group holds more than the limit | that group |
//! | stopped for day | `stopped_for_day > 0` | done and in transit |
//!
//! The listings for the critical and stopped rules use a narrower status
//! predicate (`== in transit`) than their triggering counts (`!= closed`).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AlertConfig;
use crate::metrics::{AlertMetrics, is_critical, staleness_of};
use crate::normalize::normalize;
use crate::staleness::Staleness;
use crate::types::{AlertRuleKind, JourneyRecord, NormalizedRecord, NotificationRequest};

/// Everything one evaluation pass produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// The aggregate counts.
    pub metrics: AlertMetrics,
    /// Notifications to send, in rule order.
    pub notifications: Vec<NotificationRequest>,
}

/// One record as seen by the rules: canonical fields for comparison, the
/// original for message content.
struct Row<'a> {
    original: &'a JourneyRecord,
    normalized: &'a NormalizedRecord,
    staleness: Staleness,
}

/// Evaluates alert rules against journey snapshots.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    config: AlertConfig,
    recipients: BTreeSet<String>,
}

impl AlertEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: AlertConfig) -> Self {
        let recipients = config.recipients.iter().cloned().collect();
        Self { config, recipients }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Evaluates the rules and returns the notifications to send.
    #[must_use]
    pub fn evaluate(
        &self,
        records: &[JourneyRecord],
        now: DateTime<Utc>,
    ) -> Vec<NotificationRequest> {
        self.evaluate_detailed(records, now).notifications
    }

    /// Evaluates the rules and returns the metrics alongside the notifications.
    #[must_use]
    pub fn evaluate_detailed(
        &self,
        records: &[JourneyRecord],
        now: DateTime<Utc>,
    ) -> Evaluation {
        let normalized = normalize(records);
        let staleness = staleness_of(&normalized, now);
        let metrics = AlertMetrics::compute(&normalized, &staleness, &self.config.thresholds);

        debug!(
            records = records.len(),
            critical_check = metrics.critical_check,
            due_for_checking = metrics.due_for_checking,
            live_journeys = metrics.live_journeys,
            stopped_trucks = metrics.stopped_trucks,
            "computed alert metrics"
        );

        let rows: Vec<Row<'_>> = records
            .iter()
            .zip(&normalized)
            .zip(staleness)
            .map(|((original, normalized), staleness)| Row {
                original,
                normalized,
                staleness,
            })
            .collect();

        let mut notifications = Vec::new();
        notifications.extend(self.critical_check(&rows, &metrics));
        notifications.extend(self.half_due(&metrics));
        notifications.extend(self.all_stopped(&rows, &metrics));
        notifications.extend(self.group_overload(&rows));
        notifications.extend(self.stopped_for_day(&rows, &metrics));

        for n in &notifications {
            info!(
                rule = %n.rule,
                group = n.group.as_deref().unwrap_or(""),
                recipients = n.recipients.len(),
                "alert rule fired"
            );
        }

        Evaluation {
            metrics,
            notifications,
        }
    }

    fn request(&self, rule: AlertRuleKind, subject: String, body: String) -> NotificationRequest {
        NotificationRequest {
            rule,
            group: None,
            recipients: self.recipients.clone(),
            subject,
            body,
            is_markup: false,
        }
    }

    fn critical_check(
        &self,
        rows: &[Row<'_>],
        metrics: &AlertMetrics,
    ) -> Option<NotificationRequest> {
        if metrics.critical_check == 0 {
            return None;
        }

        let thresholds = &self.config.thresholds;
        let listed: Vec<String> = rows
            .iter()
            .filter(|r| {
                is_critical(r.normalized, r.staleness, thresholds) && r.normalized.is_in_transit()
            })
            .map(describe)
            .collect();

        let mut body = format!(
            "{} open journey(s) have not had an IVMS check for more than {} minutes.",
            metrics.critical_check, thresholds.critical_minutes
        );
        append_listing(&mut body, "In transit", &listed);

        let rule = AlertRuleKind::CriticalCheck;
        Some(self.request(rule, self.config.subject(rule.title()), body))
    }

    fn half_due(&self, metrics: &AlertMetrics) -> Option<NotificationRequest> {
        let live = metrics.live_journeys;
        let due = metrics.due_for_checking;

        // due >= live / 2 without rounding
        if live == 0 || 2 * due < live {
            return None;
        }

        let body =
            format!("{due} journey(s) are due for an IVMS check against {live} live journey(s).");
        let rule = AlertRuleKind::HalfDue;
        Some(self.request(rule, self.config.subject(rule.title()), body))
    }

    fn all_stopped(
        &self,
        rows: &[Row<'_>],
        metrics: &AlertMetrics,
    ) -> Option<NotificationRequest> {
        if metrics.live_journeys == 0 || metrics.live_journeys != metrics.stopped_trucks {
            return None;
        }

        let all_ids: BTreeSet<&str> = rows
            .iter()
            .map(|r| r.normalized.journey_plan_no.as_str())
            .collect();
        let done_ids: BTreeSet<&str> = rows
            .iter()
            .filter(|r| r.normalized.is_done())
            .map(|r| r.normalized.journey_plan_no.as_str())
            .collect();

        if all_ids != done_ids {
            return None;
        }

        let listed: Vec<String> = rows.iter().map(describe).collect();
        let mut body = format!("All {} live journey(s) are stopped.", metrics.live_journeys);
        append_listing(&mut body, "Stopped", &listed);

        let rule = AlertRuleKind::AllStopped;
        Some(self.request(rule, self.config.subject(rule.title()), body))
    }

    fn group_overload(&self, rows: &[Row<'_>]) -> Vec<NotificationRequest> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in rows {
            if let Some(sjm) = row.normalized.sjm.as_deref() {
                *counts.entry(sjm).or_default() += 1;
            }
        }

        let limit = self.config.thresholds.group_limit;
        counts
            .into_iter()
            .filter(|(_, count)| *count > limit)
            .map(|(sjm, count)| {
                let rule = AlertRuleKind::GroupOverload;
                let subject = self.config.subject(&format!("{} {sjm}", rule.title()));
                let body = format!(
                    "SJM {sjm} has {count} journey plans in transit, above the limit of {limit}."
                );
                let mut request = self.request(rule, subject, body);
                request.group = Some(sjm.to_string());
                request
            })
            .collect()
    }

    fn stopped_for_day(
        &self,
        rows: &[Row<'_>],
        metrics: &AlertMetrics,
    ) -> Option<NotificationRequest> {
        if metrics.stopped_for_day == 0 {
            return None;
        }

        let listed: Vec<String> = rows
            .iter()
            .filter(|r| r.normalized.is_done() && r.normalized.is_in_transit())
            .map(describe)
            .collect();

        let mut body = format!("{} truck(s) have stopped for the day.", metrics.stopped_for_day);
        append_listing(&mut body, "In transit", &listed);

        let rule = AlertRuleKind::StoppedForDay;
        Some(self.request(rule, self.config.subject(rule.title()), body))
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

fn describe(row: &Row<'_>) -> String {
    let record = row.original;
    let last_check = match (record.ivms_check_date.as_deref(), row.staleness.minutes()) {
        (Some(raw), Some(m)) => format!("{} ({m} min ago)", raw.trim()),
        (Some(raw), None) if !raw.trim().is_empty() => format!("{} (unreadable)", raw.trim()),
        _ => "not recorded".to_string(),
    };

    format!(
        "- {} | SJM {} | vehicle {} | driver {} | last check {}",
        record.journey_plan_no,
        or_dash(record.sjm.as_deref()),
        or_dash(record.details.scheduled_vehicle.as_deref()),
        or_dash(record.details.driver_name.as_deref()),
        last_check,
    )
}

fn append_listing(body: &mut String, heading: &str, lines: &[String]) {
    body.push_str("\n\n");
    body.push_str(heading);
    body.push(':');
    if lines.is_empty() {
        body.push_str(" none");
        return;
    }
    for line in lines {
        body.push('\n');
        body.push_str(line);
    }
}
