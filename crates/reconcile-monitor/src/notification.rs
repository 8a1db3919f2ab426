//! Notifications surfaced to the operator and the sink they flow into.

use flux_client::{EventRecord, EventSeverity};
use tokio::sync::mpsc::UnboundedSender;

/// Reasons promoted to warnings whatever severity the controller reported.
///
/// Both are things an operator can act on during a reconcile.
pub const WATCHED_REASONS: [&str; 2] = ["HealthCheckFailed", "DependencyNotReady"];

/// One event as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNotification {
    /// Event reason
    pub reason: String,
    /// Event message
    pub message: String,
    /// Render with warning emphasis
    pub is_warning: bool,
}

impl EventNotification {
    /// Builds the notification for an event, applying the warning promotion
    #[must_use]
    pub fn from_event(event: &EventRecord) -> Self {
        Self {
            reason: event.reason.clone(),
            message: event.message.clone(),
            is_warning: is_warning(event),
        }
    }
}

/// Warning severity, or a reason on the watch-list
#[must_use]
pub fn is_warning(event: &EventRecord) -> bool {
    event.severity == EventSeverity::Warning || WATCHED_REASONS.contains(&event.reason.as_str())
}

/// Output boundary for event notifications.
///
/// Called from the background event loop; implementations must not block
/// for long.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification
    fn notify(&self, notification: EventNotification);
}

impl NotificationSink for UnboundedSender<EventNotification> {
    fn notify(&self, notification: EventNotification) {
        // A closed receiver means nobody is displaying anymore
        if self.send(notification).is_err() {
            tracing::trace!("Notification receiver dropped");
        }
    }
}
