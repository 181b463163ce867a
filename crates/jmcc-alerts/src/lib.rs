//! Alert evaluation and notification dispatch for the JMCC journey plan dashboard.
//!
//! `jmcc-alerts` looks at the journeys currently in transit after every write
//! to the journey plan table and decides which alerts the operations team
//! should receive.
//!
//! # Pipeline
//!
//! - **Normalize**: status and remarks are lowercased and trimmed
//! - **Measure**: minutes since each journey's last IVMS check, and
//!   [`AlertMetrics`] over the snapshot
//! - **Evaluate**: the fixed rule set in [`AlertEngine`] yields
//!   [`NotificationRequest`]s
//! - **Deliver**: [`AlertDispatcher`] hands requests to
//!   [`NotificationChannel`]s without letting failures reach the write path
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use jmcc_alerts::{AlertConfig, AlertEngine, AlertRuleKind, JourneyRecord};
//!
//! let engine = AlertEngine::new(AlertConfig::new(["ops@example.com"]));
//!
//! let records = vec![
//!     JourneyRecord::new("JP-1001")
//!         .with_sjm("North")
//!         .with_status("In Transit")
//!         .with_ivms_check_date("2024-05-01 09:00:00"),
//! ];
//!
//! let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let notifications = engine.evaluate(&records, now);
//!
//! assert_eq!(notifications.len(), 1);
//! assert_eq!(notifications[0].rule, AlertRuleKind::CriticalCheck);
//! assert!(notifications[0].body.contains("JP-1001"));
//! ```
//!
//! # Dispatching after a write
//!
//! ```rust
//! use chrono::Utc;
//! use jmcc_alerts::{AlertConfig, AlertDispatcher, JourneyRecord, LogChannel, StaticSnapshot};
//!
//! let dispatcher = AlertDispatcher::new(AlertConfig::new(["ops@example.com"]));
//! dispatcher.add_channel(Box::new(LogChannel::default()));
//!
//! let source = StaticSnapshot::new(vec![JourneyRecord::new("JP-1").with_status("Closed")]);
//! let report = dispatcher.after_write(&source, Utc::now());
//! assert_eq!(report.notifications, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channels;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod staleness;
pub mod types;

// Re-export main types at crate root
pub use channels::{
    EmailChannel, EmailMessage, LogChannel, MemoryChannel, NotificationChannel,
    NotificationResult,
};
pub use config::{AlertConfig, AlertThresholds};
pub use dispatcher::{AlertDispatcher, DispatchReport, SnapshotSource, StaticSnapshot};
pub use engine::{AlertEngine, Evaluation};
pub use error::{AlertError, Result};
pub use metrics::AlertMetrics;
pub use normalize::normalize;
pub use staleness::{Staleness, minutes_since_last_check};
pub use types::{
    AlertRuleKind, JourneyDetails, JourneyRecord, NormalizedRecord, NotificationRequest,
};
