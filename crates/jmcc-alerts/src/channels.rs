//! Notification channels for alert delivery.
//!
//! This module provides the [`NotificationChannel`] trait and the channels a
//! dashboard deployment uses: email, tracing logs, and an in-memory capture
//! for dry runs.

use std::collections::BTreeSet;
use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{AlertError, Result};
use crate::types::NotificationRequest;

/// Result of sending a notification.
#[derive(Debug, Clone)]
pub struct NotificationResult {
    /// Whether the notification was sent successfully.
    pub success: bool,
    /// The channel that processed this notification.
    pub channel: String,
    /// Optional message or error description.
    pub message: Option<String>,
}

impl NotificationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(channel: impl Into<String>) -> Self {
        Self {
            success: true,
            channel: channel.into(),
            message: None,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            channel: channel.into(),
            message: Some(message.into()),
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

/// Trait for notification channels.
///
/// Implement this trait to deliver alerts through another transport.
pub trait NotificationChannel: Send + Sync + fmt::Debug {
    /// Returns the name of this channel.
    fn name(&self) -> &str;

    /// Sends a notification through this channel.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::NotificationFailed` if the notification cannot be sent.
    fn send(&self, request: &NotificationRequest) -> Result<NotificationResult>;

    /// Returns true if this channel is enabled.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// An email as handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: BTreeSet<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// MIME type of the body.
    pub content_type: &'static str,
}

/// Email notification channel.
///
/// Renders each request into an [`EmailMessage`] and hands it to the mail
/// transport, which lives outside this crate; here the envelope is logged.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    name: String,
    from: String,
    enabled: bool,
}

impl EmailChannel {
    /// Creates a new email channel sending from `from`.
    #[must_use]
    pub fn new(name: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            enabled: true,
        }
    }

    /// Sets whether the channel is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.from
    }

    /// Builds the message for a request.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::NotificationFailed` if the request has no recipients.
    pub fn render(&self, request: &NotificationRequest) -> Result<EmailMessage> {
        if request.recipients.is_empty() {
            return Err(AlertError::NotificationFailed {
                reason: format!("no recipients for {}", request.rule),
            });
        }

        Ok(EmailMessage {
            from: self.from.clone(),
            to: request.recipients.clone(),
            subject: request.subject.clone(),
            body: request.body.clone(),
            content_type: if request.is_markup {
                "text/html"
            } else {
                "text/plain"
            },
        })
    }
}

impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, request: &NotificationRequest) -> Result<NotificationResult> {
        if !self.is_enabled() {
            debug!(channel = %self.name(), "channel is disabled, skipping");
            return Ok(NotificationResult::success(self.name())
                .with_message("channel disabled, notification skipped"));
        }

        let message = self.render(request)?;

        info!(
            channel = %self.name(),
            rule = %request.rule,
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "sending email notification"
        );
        debug!(body = %message.body, "email body");

        Ok(NotificationResult::success(self.name()).with_message("email handed to transport"))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A channel that writes notifications to the tracing log.
#[derive(Debug, Clone)]
pub struct LogChannel {
    name: String,
    enabled: bool,
}

impl LogChannel {
    /// Creates a new log channel.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }

    /// Sets whether the channel is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for LogChannel {
    fn default() -> Self {
        Self::new("log")
    }
}

impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, request: &NotificationRequest) -> Result<NotificationResult> {
        if !self.is_enabled() {
            return Ok(NotificationResult::success(self.name()).with_message("channel disabled"));
        }

        warn!(
            rule = %request.rule,
            group = request.group.as_deref().unwrap_or(""),
            subject = %request.subject,
            body = %request.body,
            "ALERT"
        );

        Ok(NotificationResult::success(self.name()).with_message("logged to tracing"))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A channel that keeps every request it receives.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    sent: Mutex<Vec<NotificationRequest>>,
}

impl MemoryChannel {
    /// Creates an empty memory channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().clone()
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    /// Returns true if nothing has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl NotificationChannel for MemoryChannel {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&self, request: &NotificationRequest) -> Result<NotificationResult> {
        self.sent.lock().push(request.clone());
        Ok(NotificationResult::success(self.name()))
    }
}

impl<T: NotificationChannel + ?Sized> NotificationChannel for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, request: &NotificationRequest) -> Result<NotificationResult> {
        (**self).send(request)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlertRuleKind;

    fn request() -> NotificationRequest {
        NotificationRequest {
            rule: AlertRuleKind::CriticalCheck,
            group: None,
            recipients: ["ops@example.com".to_string()].into_iter().collect(),
            subject: "JMCC Dashboard Alert: Critical IVMS check".to_string(),
            body: "1 open journey(s)".to_string(),
            is_markup: false,
        }
    }

    mod notification_result_tests {
        use super::*;

        #[test]
        fn result_success() {
            let result = NotificationResult::success("email");

            assert!(result.success);
            assert_eq!(result.channel, "email");
            assert!(result.message.is_none());
        }

        #[test]
        fn result_failure() {
            let result = NotificationResult::failure("email", "connection refused");

            assert!(!result.success);
            assert_eq!(result.message, Some("connection refused".to_string()));
        }
    }

    mod email_channel_tests {
        use super::*;

        #[test]
        fn create_email_channel() {
            let channel = EmailChannel::new("alerts", "alerts@example.com");

            assert_eq!(channel.name(), "alerts");
            assert_eq!(channel.sender(), "alerts@example.com");
            assert!(channel.is_enabled());
        }

        #[test]
        fn render_plain_text() {
            let channel = EmailChannel::new("alerts", "alerts@example.com");
            let message = channel.render(&request()).unwrap();

            assert_eq!(message.from, "alerts@example.com");
            assert!(message.to.contains("ops@example.com"));
            assert_eq!(message.content_type, "text/plain");
            assert_eq!(message.subject, "JMCC Dashboard Alert: Critical IVMS check");
        }

        #[test]
        fn render_markup() {
            let channel = EmailChannel::new("alerts", "alerts@example.com");
            let mut req = request();
            req.is_markup = true;
            assert_eq!(channel.render(&req).unwrap().content_type, "text/html");
        }

        #[test]
        fn send_without_recipients_fails() {
            let channel = EmailChannel::new("alerts", "alerts@example.com");
            let mut req = request();
            req.recipients.clear();

            let result = channel.send(&req);
            assert!(matches!(
                result,
                Err(AlertError::NotificationFailed { .. })
            ));
        }

        #[test]
        fn email_channel_send() {
            let channel = EmailChannel::new("alerts", "alerts@example.com");
            let result = channel.send(&request()).unwrap();

            assert!(result.success);
            assert_eq!(result.channel, "alerts");
        }

        #[test]
        fn email_channel_disabled_skips() {
            let channel = EmailChannel::new("alerts", "alerts@example.com").enabled(false);
            let mut req = request();
            req.recipients.clear();

            let result = channel.send(&req).unwrap();
            assert!(result.success);
            assert!(result.message.unwrap().contains("disabled"));
        }
    }

    mod log_channel_tests {
        use super::*;

        #[test]
        fn log_channel_default() {
            let channel = LogChannel::default();
            assert_eq!(channel.name(), "log");
            assert!(channel.is_enabled());
        }

        #[test]
        fn log_channel_send() {
            let result = LogChannel::default().send(&request()).unwrap();
            assert!(result.success);
        }

        #[test]
        fn log_channel_disabled() {
            let channel = LogChannel::new("quiet").enabled(false);
            let result = channel.send(&request()).unwrap();
            assert!(result.message.unwrap().contains("disabled"));
        }
    }

    mod memory_channel_tests {
        use super::*;
        use std::sync::Arc;

        #[test]
        fn records_requests() {
            let channel = MemoryChannel::new();
            assert!(channel.is_empty());

            channel.send(&request()).unwrap();
            channel.send(&request()).unwrap();

            assert_eq!(channel.len(), 2);
            assert_eq!(channel.sent()[0].rule, AlertRuleKind::CriticalCheck);
        }

        #[test]
        fn shared_through_arc() {
            let channel = Arc::new(MemoryChannel::new());
            let handle: Box<dyn NotificationChannel> = Box::new(Arc::clone(&channel));

            handle.send(&request()).unwrap();
            assert_eq!(handle.name(), "memory");
            assert_eq!(channel.len(), 1);
        }
    }
}
