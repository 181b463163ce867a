//! Alerting configuration.
//!
//! One distribution list is shared by every rule. Thresholds default to the
//! limits the dashboard has always used.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AlertError, Result};

/// Environment variable holding a comma-separated recipient list.
pub const ENV_RECIPIENTS: &str = "JMCC_ALERT_RECIPIENTS";

/// Environment variable holding the sender address.
pub const ENV_SENDER: &str = "JMCC_ALERT_SENDER";

/// Default subject prefix.
pub const DEFAULT_SUBJECT_PREFIX: &str = "JMCC Dashboard Alert";

/// Numeric limits used by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Minutes without a check after which a journey is critical.
    pub critical_minutes: i64,
    /// Minutes without a check after which a journey is due.
    pub due_minutes: i64,
    /// Journeys a single group may hold before it is overloaded.
    pub group_limit: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_minutes: 120,
            due_minutes: 60,
            group_limit: 30,
        }
    }
}

/// Configuration for alert evaluation and delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Distribution list for every notification.
    pub recipients: Vec<String>,
    /// Address notifications are sent from.
    pub sender: String,
    /// Prefix for every subject line.
    pub subject_prefix: String,
    /// Rule limits.
    pub thresholds: AlertThresholds,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            sender: String::new(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            thresholds: AlertThresholds::default(),
        }
    }
}

impl AlertConfig {
    /// Creates a configuration with the given recipients and defaults elsewhere.
    #[must_use]
    pub fn new(recipients: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            recipients: recipients.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Sets the subject prefix.
    #[must_use]
    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    /// Sets the thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Loads a configuration from a JSON file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Io` if the file cannot be read and
    /// `AlertError::Serialization` if it is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), recipients = config.recipients.len(), "loaded alert config");
        Ok(config)
    }

    /// Overrides recipients and sender from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(
            std::env::var(ENV_RECIPIENTS).ok().as_deref(),
            std::env::var(ENV_SENDER).ok().as_deref(),
        )
    }

    /// Overrides recipients (comma-separated) and sender when given.
    #[must_use]
    pub fn apply_overrides(mut self, recipients: Option<&str>, sender: Option<&str>) -> Self {
        if let Some(list) = recipients {
            self.recipients = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(sender) = sender {
            self.sender = sender.trim().to_string();
        }
        self
    }

    /// Builds the subject line for a rule title.
    #[must_use]
    pub fn subject(&self, title: &str) -> String {
        if self.subject_prefix.is_empty() {
            title.to_string()
        } else {
            format!("{}: {title}", self.subject_prefix)
        }
    }

    /// Validates recipient addresses and thresholds.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidAddress` for a malformed recipient and
    /// `AlertError::Config` for inconsistent thresholds.
    pub fn validate(&self) -> Result<()> {
        for address in &self.recipients {
            validate_address(address)?;
        }

        if self.thresholds.due_minutes >= self.thresholds.critical_minutes {
            return Err(AlertError::Config {
                reason: format!(
                    "due_minutes ({}) must be below critical_minutes ({})",
                    self.thresholds.due_minutes, self.thresholds.critical_minutes
                ),
            });
        }

        Ok(())
    }

    /// Validates the configuration for email delivery.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) rejects, plus an empty or
    /// malformed sender and an empty recipient list.
    pub fn validate_for_email(&self) -> Result<()> {
        self.validate()?;

        if self.sender.is_empty() {
            return Err(AlertError::Config {
                reason: "sender address is required for email delivery".to_string(),
            });
        }
        validate_address(&self.sender)?;

        if self.recipients.is_empty() {
            return Err(AlertError::Config {
                reason: "at least one recipient is required for email delivery".to_string(),
            });
        }

        Ok(())
    }
}

/// Checks that an address has exactly one `@` with text on both sides.
///
/// # Errors
///
/// Returns `AlertError::InvalidAddress` otherwise.
pub fn validate_address(address: &str) -> Result<()> {
    let mut parts = address.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.trim().is_empty() && !domain.trim().is_empty()
    );

    if valid {
        Ok(())
    } else {
        Err(AlertError::InvalidAddress {
            address: address.to_string(),
        })
    }
}
