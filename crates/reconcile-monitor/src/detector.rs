//! Change detector for the watched object's event stream.
//!
//! Each `check()` lists recent events, fingerprints the trailing window and
//! forwards the newest events only when the fingerprint moved since the last
//! check. The check never fails its caller: access errors, timeouts and
//! cancellation all count as "nothing new to report".

use crate::config::MonitorConfig;
use crate::fingerprint::EventFingerprint;
use crate::notification::{EventNotification, NotificationSink};
use crate::request::bounded;
use crate::target::ReconcileTarget;
use flux_client::FluxClientTrait;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Deduplicates the event stream of one target.
pub struct ChangeDetector {
    client: Arc<dyn FluxClientTrait>,
    sink: Arc<dyn NotificationSink>,
    target: ReconcileTarget,
    config: MonitorConfig,
    cancel: CancellationToken,
    last_fingerprint: Mutex<Option<EventFingerprint>>,
}

impl fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("target", &self.target)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChangeDetector {
    /// Creates a detector with no fingerprint recorded yet
    pub fn new(
        client: Arc<dyn FluxClientTrait>,
        sink: Arc<dyn NotificationSink>,
        target: ReconcileTarget,
        config: MonitorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            sink,
            target,
            config,
            cancel,
            last_fingerprint: Mutex::new(None),
        }
    }

    /// Polls events once and notifies the sink if the recent window changed.
    ///
    /// Returns how many notifications were emitted (0 to `events_shown`).
    pub async fn check(&self) -> usize {
        let call = self.client.list_recent_events(
            &self.target.namespace,
            &self.target.name,
            self.config.event_limit,
        );
        let events = match bounded(&self.cancel, self.config.request_timeout, call).await {
            Some(Ok(events)) => events,
            Some(Err(e)) => {
                debug!("Skipping event check for {}: {}", self.target, e);
                return 0;
            }
            None => return 0,
        };

        if events.is_empty() {
            return 0;
        }

        let fingerprint = EventFingerprint::of(&events, self.config.fingerprint_window);
        if !self.record(fingerprint) {
            return 0;
        }

        let mut shown = 0;
        for event in events.iter().rev().take(self.config.events_shown) {
            self.sink.notify(EventNotification::from_event(event));
            shown += 1;
        }
        shown
    }

    /// Stores `fingerprint` if it differs from the last one; true when stored.
    ///
    /// The lock covers only this compare-and-store.
    fn record(&self, fingerprint: EventFingerprint) -> bool {
        let mut last = self
            .last_fingerprint
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if last.as_ref() == Some(&fingerprint) {
            return false;
        }
        *last = Some(fingerprint);
        true
    }
}
