//! Monitor orchestrator.
//!
//! A `Monitor` is one session for one reconcile target. It owns a child of
//! the caller's cancellation token, so a parent deadline or signal ends the
//! session while `stop()` ends only this session.

use crate::config::MonitorConfig;
use crate::detector::ChangeDetector;
use crate::error::MonitorError;
use crate::notification::NotificationSink;
use crate::readiness::ReadinessPoller;
use crate::target::{ReconcileTarget, ResourceKind};
use flux_client::{FluxClient, FluxClientTrait};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running monitor session.
///
/// Clones share the same session.
#[derive(Debug, Clone)]
pub struct Monitor {
    target: ReconcileTarget,
    detector: Arc<ChangeDetector>,
    poller: ReadinessPoller,
    cancel: CancellationToken,
    event_interval: Duration,
}

impl Monitor {
    /// Connects to the cluster and starts a session for `kind name -n namespace`.
    ///
    /// The kind is resolved before any connection is attempted. A connection
    /// that cannot be validated fails the whole setup; callers are expected to
    /// warn and carry on without monitoring. The connection attempt is
    /// abandoned as soon as `parent` is cancelled.
    ///
    /// # Errors
    /// * `MonitorError::UnsupportedKind` - `kind` is not a known Flux kind
    /// * `MonitorError::Cancelled` - `parent` was cancelled during setup
    /// * `MonitorError::Setup` - the Kubernetes API is unreachable or unconfigured
    pub async fn connect(
        parent: &CancellationToken,
        kind: &str,
        name: &str,
        namespace: &str,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let kind: ResourceKind = kind.parse()?;
        let client = tokio::select! {
            biased;
            () = parent.cancelled() => {
                debug!("Setup for {} {}/{} cancelled", kind, namespace, name);
                return Err(MonitorError::Cancelled);
            }
            client = FluxClient::connect(config.request_timeout) => client?,
        };
        let target = ReconcileTarget::new(kind, name, namespace);
        Ok(Self::start(parent, Arc::new(client), target, sink, config))
    }

    /// Starts a session over an already-established client.
    pub fn start(
        parent: &CancellationToken,
        client: Arc<dyn FluxClientTrait>,
        target: ReconcileTarget,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Self {
        let cancel = parent.child_token();
        let detector = ChangeDetector::new(
            Arc::clone(&client),
            sink,
            target.clone(),
            config.clone(),
            cancel.clone(),
        );
        info!("Monitoring events for {}", target);

        Self {
            event_interval: config.event_interval,
            poller: ReadinessPoller::new(client, config),
            detector: Arc::new(detector),
            target,
            cancel,
        }
    }

    /// The watched target
    #[must_use]
    pub fn target(&self) -> &ReconcileTarget {
        &self.target
    }

    /// Runs the change detector every `event_interval` until the session is
    /// cancelled. The first check happens one interval after the call.
    pub async fn run(&self) {
        let period = self.event_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.detector.check().await;
                }
            }
        }

        debug!("Event monitor for {} stopped", self.target);
    }

    /// Runs [`Monitor::run`] on a background task.
    pub fn spawn(&self) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move { monitor.run().await })
    }

    /// Waits for the target to report Ready, bounded by `timeout` and the
    /// session's cancellation.
    ///
    /// A timeout does not stop the event loop; call [`Monitor::stop`].
    ///
    /// # Errors
    /// * `MonitorError::Cancelled` - the session was stopped or its parent cancelled
    /// * `MonitorError::Timeout` - the resource did not become ready in time
    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<(), MonitorError> {
        self.poller.wait_for_ready(&self.target, timeout, &self.cancel).await
    }

    /// Cancels the session. Calling it again has no effect.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Stopping event monitor for {}", self.target);
        }
        self.cancel.cancel();
    }

    /// Whether the session has been cancelled
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_unknown_kind_before_connecting() {
        let parent = CancellationToken::new();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        let result = Monitor::connect(
            &parent,
            "imagepolicy",
            "apps",
            "flux-system",
            Arc::new(tx),
            MonitorConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(MonitorError::UnsupportedKind(kind)) if kind == "imagepolicy"));
    }

    #[tokio::test]
    async fn test_connect_gives_up_when_parent_is_cancelled() {
        let parent = CancellationToken::new();
        parent.cancel();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        let result = Monitor::connect(
            &parent,
            "kustomization",
            "apps",
            "flux-system",
            Arc::new(tx),
            MonitorConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(MonitorError::Cancelled)));
    }

    #[tokio::test]
    async fn test_connect_checks_kind_before_cancellation() {
        let parent = CancellationToken::new();
        parent.cancel();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        let result = Monitor::connect(&parent, "imagepolicy", "apps", "flux-system", Arc::new(tx), MonitorConfig::default())
            .await;

        assert!(matches!(result, Err(MonitorError::UnsupportedKind(_))));
    }
}
