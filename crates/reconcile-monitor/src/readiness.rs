//! Readiness poller.
//!
//! Repeatedly fetches the target's status document until a `Ready` condition
//! reports `True`, the deadline passes, or the session is cancelled.

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::request::bounded;
use crate::target::ReconcileTarget;
use flux_client::FluxClientTrait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Condition type that signals convergence
pub const READY_CONDITION: &str = "Ready";

/// True iff `status.conditions` holds an entry with `type: Ready` and
/// `status: "True"`.
///
/// A missing `status`, missing `conditions`, or non-object entries simply
/// mean "not ready yet"; controllers populate status some time after the
/// object is created.
#[must_use]
pub fn is_ready(document: &Value) -> bool {
    document
        .get("status")
        .and_then(|status| status.get("conditions"))
        .and_then(Value::as_array)
        .is_some_and(|conditions| {
            conditions
                .iter()
                .filter_map(Value::as_object)
                .any(|condition| {
                    condition.get("type").and_then(Value::as_str) == Some(READY_CONDITION)
                        && condition.get("status").and_then(Value::as_str) == Some("True")
                })
        })
}

/// Polls a target's status until it converges.
#[derive(Clone)]
pub struct ReadinessPoller {
    client: Arc<dyn FluxClientTrait>,
    config: MonitorConfig,
}

impl fmt::Debug for ReadinessPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessPoller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReadinessPoller {
    /// Creates a new poller
    pub fn new(client: Arc<dyn FluxClientTrait>, config: MonitorConfig) -> Self {
        Self { client, config }
    }

    /// Waits until `target` reports Ready.
    ///
    /// Polls every `ready_interval`, starting immediately. Fetch failures are
    /// treated as transient and polling continues; only the deadline bounds
    /// them. Each fetch is cut off at the lesser of `request_timeout` and the
    /// time left before the deadline. Cancellation is observed before the
    /// deadline, so a cancelled scope reports `Cancelled` even when the
    /// deadline has passed.
    ///
    /// # Errors
    /// * `MonitorError::Cancelled` - `cancel` fired
    /// * `MonitorError::Timeout` - `timeout` elapsed without a Ready condition
    pub async fn wait_for_ready(
        &self,
        target: &ReconcileTarget,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), MonitorError> {
        let coordinates = target.kind.coordinates();
        let deadline = Instant::now() + timeout;
        let mut ticker = tokio::time::interval(self.config.ready_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!("Waiting up to {:?} for {} ({}) to become ready", timeout, target, coordinates);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(MonitorError::Cancelled),
                () = tokio::time::sleep_until(deadline) => {
                    return Err(MonitorError::Timeout {
                        kind: target.kind,
                        name: target.name.clone(),
                        namespace: target.namespace.clone(),
                    });
                }
                _ = ticker.tick() => {}
            }

            // A call never outlives the deadline, whatever the request timeout
            let budget = self
                .config
                .request_timeout
                .min(deadline.saturating_duration_since(Instant::now()));
            let call = self
                .client
                .get_resource_status(&coordinates, &target.namespace, &target.name);
            match bounded(cancel, budget, call).await {
                Some(Ok(document)) if is_ready(&document) => {
                    info!("{} is ready", target);
                    return Ok(());
                }
                Some(Ok(_)) => debug!("{} not ready yet", target),
                Some(Err(e)) => debug!("Status check for {} failed, will retry: {}", target, e),
                // Reported as Cancelled on the next pass through the select
                None => {}
            }
        }
    }
}
