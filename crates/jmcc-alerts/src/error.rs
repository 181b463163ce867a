//! Error types for the jmcc-alerts crate.
//!
//! The rule engine itself never fails; these errors come from the edges:
//! loading configuration, fetching a snapshot, and delivering notifications.

use thiserror::Error;

/// Errors that can occur around alert evaluation.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Invalid alert configuration.
    #[error("invalid configuration: {reason}")]
    Config {
        /// The reason the configuration is invalid.
        reason: String,
    },

    /// A recipient or sender address is malformed.
    #[error("invalid address: {address:?}")]
    InvalidAddress {
        /// The offending address.
        address: String,
    },

    /// Notification delivery failed.
    #[error("notification failed: {reason}")]
    NotificationFailed {
        /// The reason the notification failed.
        reason: String,
    },

    /// The record snapshot could not be fetched.
    #[error("snapshot unavailable: {reason}")]
    Snapshot {
        /// The reason the snapshot could not be produced.
        reason: String,
    },

    /// I/O error while reading configuration or snapshots.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;
