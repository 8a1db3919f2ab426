//! Monitor timing and sizing configuration.

use std::time::Duration;

/// How often the change detector polls events
pub const DEFAULT_EVENT_INTERVAL: Duration = Duration::from_secs(3);
/// How often the readiness poller fetches status
pub const DEFAULT_READY_INTERVAL: Duration = Duration::from_secs(2);
/// Upper bound on a single API call made by either loop
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables shared by the change detector, readiness poller and orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Tick interval of the background event loop
    pub event_interval: Duration,
    /// Tick interval of the readiness wait
    pub ready_interval: Duration,
    /// Events requested per poll
    pub event_limit: u32,
    /// Trailing events folded into the fingerprint
    pub fingerprint_window: usize,
    /// Events surfaced when the fingerprint changes
    pub events_shown: usize,
    /// Bound on each individual API call
    pub request_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            event_interval: DEFAULT_EVENT_INTERVAL,
            ready_interval: DEFAULT_READY_INTERVAL,
            event_limit: 10,
            fingerprint_window: 3,
            events_shown: 2,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl MonitorConfig {
    /// Sets the event loop interval
    #[must_use]
    pub fn with_event_interval(mut self, interval: Duration) -> Self {
        self.event_interval = interval;
        self
    }

    /// Sets the readiness poll interval
    #[must_use]
    pub fn with_ready_interval(mut self, interval: Duration) -> Self {
        self.ready_interval = interval;
        self
    }

    /// Sets the per-call timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
