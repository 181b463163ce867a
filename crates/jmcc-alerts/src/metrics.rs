//! Aggregate counts over a normalized snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AlertThresholds;
use crate::staleness::{Staleness, minutes_since_last_check};
use crate::types::NormalizedRecord;

/// Counts computed once per evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetrics {
    /// Open journeys unchecked for longer than the critical limit.
    pub critical_check: usize,
    /// Open journeys in the due window or with no usable check date.
    pub due_for_checking: usize,
    /// Journeys in transit.
    pub live_journeys: usize,
    /// Open journeys marked done.
    pub stopped_trucks: usize,
    /// Open journeys marked done. Same predicate as `stopped_trucks`.
    pub stopped_for_day: usize,
}

impl AlertMetrics {
    /// Computes the metrics, deriving staleness from `now`.
    #[must_use]
    pub fn from_records(
        records: &[NormalizedRecord],
        now: DateTime<Utc>,
        thresholds: &AlertThresholds,
    ) -> Self {
        let staleness = staleness_of(records, now);
        Self::compute(records, &staleness, thresholds)
    }

    /// Computes the metrics from precomputed staleness, index-aligned with
    /// `records`.
    #[must_use]
    pub fn compute(
        records: &[NormalizedRecord],
        staleness: &[Staleness],
        thresholds: &AlertThresholds,
    ) -> Self {
        let mut metrics = Self::default();

        for (record, staleness) in records.iter().zip(staleness) {
            if is_critical(record, *staleness, thresholds) {
                metrics.critical_check += 1;
            }
            if is_due(record, *staleness, thresholds) {
                metrics.due_for_checking += 1;
            }
            if record.is_in_transit() {
                metrics.live_journeys += 1;
            }
            if is_stopped(record) {
                metrics.stopped_trucks += 1;
                metrics.stopped_for_day += 1;
            }
        }

        metrics
    }
}

/// Staleness of every record, index-aligned.
#[must_use]
pub fn staleness_of(records: &[NormalizedRecord], now: DateTime<Utc>) -> Vec<Staleness> {
    records
        .iter()
        .map(|r| minutes_since_last_check(r.ivms_check_date.as_deref(), now))
        .collect()
}

/// Overdue past the critical limit, not done and not closed.
pub(crate) fn is_critical(
    record: &NormalizedRecord,
    staleness: Staleness,
    thresholds: &AlertThresholds,
) -> bool {
    staleness.exceeds(thresholds.critical_minutes) && !record.is_done() && !record.is_closed()
}

/// In the due window or of unknown staleness, not closed and not done.
pub(crate) fn is_due(
    record: &NormalizedRecord,
    staleness: Staleness,
    thresholds: &AlertThresholds,
) -> bool {
    let window = staleness.within_due_window(thresholds.due_minutes, thresholds.critical_minutes);
    (window || staleness.is_unknown()) && !record.is_closed() && !record.is_done()
}

/// Marked done and not closed.
pub(crate) fn is_stopped(record: &NormalizedRecord) -> bool {
    record.is_done() && !record.is_closed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::JourneyRecord;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn metrics(records: &[JourneyRecord]) -> AlertMetrics {
        AlertMetrics::from_records(&normalize(records), now(), &AlertThresholds::default())
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        assert_eq!(metrics(&[]), AlertMetrics::default());
    }

    #[test]
    fn missing_check_date_is_due_not_critical() {
        let m = metrics(&[JourneyRecord::new("JP-1").with_status("In Transit")]);
        assert_eq!(m.critical_check, 0);
        assert_eq!(m.due_for_checking, 1);
        assert_eq!(m.live_journeys, 1);
    }

    #[test]
    fn unparsable_check_date_is_due() {
        let m = metrics(&[JourneyRecord::new("JP-1")
            .with_status("In Transit")
            .with_ivms_check_date("garbage")]);
        assert_eq!(m.due_for_checking, 1);
        assert_eq!(m.critical_check, 0);
    }

    #[test]
    fn three_hours_is_critical() {
        let m = metrics(&[JourneyRecord::new("JP-1")
            .with_status("In Transit")
            .with_remarks("")
            .with_ivms_check_date("2024-05-01 09:00:00")]);
        assert_eq!(m.critical_check, 1);
        assert_eq!(m.due_for_checking, 0);
    }

    #[test]
    fn ninety_minutes_is_due() {
        let m = metrics(&[JourneyRecord::new("JP-1")
            .with_status("In Transit")
            .with_ivms_check_date("2024-05-01 10:30:00")]);
        assert_eq!(m.critical_check, 0);
        assert_eq!(m.due_for_checking, 1);
    }

    #[test]
    fn exactly_one_twenty_is_neither() {
        let m = metrics(&[JourneyRecord::new("JP-1")
            .with_status("In Transit")
            .with_ivms_check_date("2024-05-01 10:00:00")]);
        assert_eq!(m.critical_check, 0);
        assert_eq!(m.due_for_checking, 0);
    }

    #[test]
    fn closed_and_done_are_excluded_from_checks() {
        let m = metrics(&[
            JourneyRecord::new("JP-1")
                .with_status("Closed")
                .with_ivms_check_date("2024-05-01 06:00:00"),
            JourneyRecord::new("JP-2")
                .with_status("In Transit")
                .with_remarks("Done")
                .with_ivms_check_date("2024-05-01 06:00:00"),
            JourneyRecord::new("JP-3").with_status("CLOSED"),
        ]);
        assert_eq!(m.critical_check, 0);
        assert_eq!(m.due_for_checking, 0);
        assert_eq!(m.live_journeys, 1);
        assert_eq!(m.stopped_trucks, 1);
    }

    #[test]
    fn critical_count_includes_non_transit_open_status() {
        let m = metrics(&[JourneyRecord::new("JP-1")
            .with_status("Pending")
            .with_ivms_check_date("2024-05-01 06:00:00")]);
        assert_eq!(m.critical_check, 1);
        assert_eq!(m.live_journeys, 0);
    }

    #[test]
    fn stopped_metrics_are_identical() {
        let m = metrics(&[
            JourneyRecord::new("JP-1").with_status("In Transit").with_remarks("done"),
            JourneyRecord::new("JP-2").with_status("Closed").with_remarks("done"),
            JourneyRecord::new("JP-3").with_remarks(" DONE "),
        ]);
        assert_eq!(m.stopped_trucks, 2);
        assert_eq!(m.stopped_for_day, m.stopped_trucks);
    }

    #[test]
    fn compute_matches_from_records() {
        let records = normalize(&[
            JourneyRecord::new("JP-1").with_status("In Transit"),
            JourneyRecord::new("JP-2")
                .with_status("In Transit")
                .with_ivms_check_date("2024-05-01 09:00:00"),
        ]);
        let staleness = staleness_of(&records, now());
        assert_eq!(staleness, vec![Staleness::Unknown, Staleness::Minutes(180)]);
        assert_eq!(
            AlertMetrics::compute(&records, &staleness, &AlertThresholds::default()),
            AlertMetrics::from_records(&records, now(), &AlertThresholds::default())
        );
    }
}
