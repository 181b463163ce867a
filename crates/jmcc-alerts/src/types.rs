//! Core types for journey plan alerting.
//!
//! This module provides the fundamental types used throughout the jmcc-alerts crate:
//! - [`JourneyRecord`]: One row of the journey plan table
//! - [`JourneyDetails`]: Columns carried through untouched
//! - [`NormalizedRecord`]: A record with canonical status and remarks
//! - [`AlertRuleKind`]: The fixed set of rules the engine evaluates
//! - [`NotificationRequest`]: A notification the engine decided to emit

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical status of a journey that is currently moving.
pub const STATUS_IN_TRANSIT: &str = "in transit";

/// Canonical status of a journey that has been closed.
pub const STATUS_CLOSED: &str = "closed";

/// Canonical remark marking a leg that has stopped.
pub const REMARK_DONE: &str = "done";

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Columns of a journey plan that never take part in rule evaluation.
///
/// They are kept so notification bodies can describe a journey and so a
/// snapshot survives a round trip through the engine unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyDetails {
    /// Tracker device identifier.
    #[serde(default)]
    pub tracker: Option<String>,
    /// Date the journey plan was raised.
    #[serde(rename = "journey_Plane_Date", default)]
    pub journey_plan_date: Option<String>,
    /// Vehicle scheduled for the journey.
    #[serde(rename = "scheduled_Vehicle", default)]
    pub scheduled_vehicle: Option<String>,
    /// Carrier operating the vehicle.
    #[serde(default)]
    pub carrier: Option<String>,
    /// Expected arrival at the next point.
    #[serde(rename = "next_Arrival_Date", default)]
    pub next_arrival_date: Option<String>,
    /// Next checkpoint on the route.
    #[serde(rename = "next_Point", default)]
    pub next_point: Option<String>,
    /// Location reported by the last IVMS check.
    #[serde(rename = "ivms_Point", default)]
    pub ivms_point: Option<String>,
    /// Final destination.
    #[serde(default)]
    pub destination: Option<String>,
    /// Offload point at the destination.
    #[serde(rename = "offload_Point", default)]
    pub offload_point: Option<String>,
    /// Driver assigned to the vehicle.
    #[serde(rename = "driver_Name", default)]
    pub driver_name: Option<String>,
    /// Overnight accommodation.
    #[serde(default)]
    pub accommodation: Option<String>,
    /// Journey manager.
    #[serde(default)]
    pub jm: Option<String>,
    /// Type of goods carried.
    #[serde(rename = "item_Type", default)]
    pub item_type: Option<String>,
}

/// One row of the journey plan table at a point in time.
///
/// Field names on the wire follow the table's column names so a snapshot
/// produced by the dashboard query can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyRecord {
    /// Journey plan number, unique per row.
    #[serde(
        rename = "journey_Plane_No",
        default,
        deserialize_with = "nullable_string"
    )]
    pub journey_plan_no: String,
    /// Group the journey plan is organised under.
    #[serde(default)]
    pub sjm: Option<String>,
    /// Free-text journey status (e.g. "In Transit", "Closed").
    #[serde(rename = "jp_Status", default)]
    pub status: Option<String>,
    /// Free-text remarks; "done" marks a stopped leg.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Timestamp of the last IVMS check, verbatim.
    #[serde(rename = "ivms_Check_Date", default)]
    pub ivms_check_date: Option<String>,
    /// Columns not used by the rules.
    #[serde(flatten)]
    pub details: JourneyDetails,
}

impl JourneyRecord {
    /// Creates a record with the given journey plan number and nothing else.
    #[must_use]
    pub fn new(journey_plan_no: impl Into<String>) -> Self {
        Self {
            journey_plan_no: journey_plan_no.into(),
            ..Self::default()
        }
    }

    /// Sets the group identifier.
    #[must_use]
    pub fn with_sjm(mut self, sjm: impl Into<String>) -> Self {
        self.sjm = Some(sjm.into());
        self
    }

    /// Sets the status text.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the remarks text.
    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Sets the IVMS check timestamp text.
    #[must_use]
    pub fn with_ivms_check_date(mut self, date: impl Into<String>) -> Self {
        self.ivms_check_date = Some(date.into());
        self
    }

    /// Returns true if the status reads "in transit", ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn is_in_transit(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(STATUS_IN_TRANSIT))
    }
}

/// A journey record with canonical status and remarks.
///
/// `status` and `remarks` are lowercased and trimmed, with missing values
/// becoming the empty string. Everything else is copied verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Journey plan number.
    pub journey_plan_no: String,
    /// Group identifier.
    pub sjm: Option<String>,
    /// Canonical status.
    pub status: String,
    /// Canonical remarks.
    pub remarks: String,
    /// Timestamp of the last IVMS check, verbatim.
    pub ivms_check_date: Option<String>,
    /// Columns not used by the rules.
    pub details: JourneyDetails,
}

impl NormalizedRecord {
    /// Returns true if the remarks mark a stopped leg.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remarks == REMARK_DONE
    }

    /// Returns true if the journey is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == STATUS_CLOSED
    }

    /// Returns true if the journey is in transit.
    #[must_use]
    pub fn is_in_transit(&self) -> bool {
        self.status == STATUS_IN_TRANSIT
    }
}

impl From<NormalizedRecord> for JourneyRecord {
    fn from(record: NormalizedRecord) -> Self {
        Self {
            journey_plan_no: record.journey_plan_no,
            sjm: record.sjm,
            status: Some(record.status),
            remarks: Some(record.remarks),
            ivms_check_date: record.ivms_check_date,
            details: record.details,
        }
    }
}

/// The rules the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRuleKind {
    /// At least one journey has gone unchecked past the critical limit.
    CriticalCheck,
    /// Half or more of the live journeys are due for a check.
    HalfDue,
    /// Every live journey is stopped.
    AllStopped,
    /// A single group holds too many journeys.
    GroupOverload,
    /// Trucks have stopped for the day.
    StoppedForDay,
}

impl AlertRuleKind {
    /// All rules in evaluation order.
    pub const ALL: [Self; 5] = [
        Self::CriticalCheck,
        Self::HalfDue,
        Self::AllStopped,
        Self::GroupOverload,
        Self::StoppedForDay,
    ];

    /// Returns the rule as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CriticalCheck => "critical_check",
            Self::HalfDue => "half_due",
            Self::AllStopped => "all_stopped",
            Self::GroupOverload => "group_overload",
            Self::StoppedForDay => "stopped_for_day",
        }
    }

    /// Returns the human-readable title used in subjects.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::CriticalCheck => "Critical IVMS check",
            Self::HalfDue => "Live journeys due for checking",
            Self::AllStopped => "All live journeys stopped",
            Self::GroupOverload => "SJM overload",
            Self::StoppedForDay => "Trucks stopped for the day",
        }
    }
}

impl fmt::Display for AlertRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification the engine decided to emit.
///
/// The engine only builds these; delivery belongs to a
/// [`NotificationChannel`](crate::channels::NotificationChannel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// The rule that fired.
    pub rule: AlertRuleKind,
    /// The group named by a [`AlertRuleKind::GroupOverload`] notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Addresses to deliver to.
    pub recipients: BTreeSet<String>,
    /// Subject line.
    pub subject: String,
    /// Rendered body.
    pub body: String,
    /// Whether the body is markup rather than plain text.
    pub is_markup: bool,
}
