//! Content fingerprint of the most recent events.
//!
//! The backend gives no stable identifiers or ordering across polls, so
//! change detection compares the content of the trailing window instead of
//! tracking individual events. A window that changes and later reverts is
//! shown again; that is accepted.

use flux_client::EventRecord;

/// Summary of the trailing events, compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventFingerprint(String);

impl EventFingerprint {
    /// Fingerprints the last `window` events, newest first.
    ///
    /// Each event contributes `reason:severity:message`; entries are joined
    /// with a newline.
    #[must_use]
    pub fn of(events: &[EventRecord], window: usize) -> Self {
        let summary = events
            .iter()
            .rev()
            .take(window)
            .map(|event| format!("{}:{}:{}", event.reason, event.severity, event.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self(summary)
    }

    /// Raw summary string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
