//! Monitor error types.
//!
//! Only terminal outcomes live here. Per-tick access failures are absorbed
//! inside the change detector and readiness poller and never become a
//! `MonitorError`.

use crate::target::ResourceKind;
use flux_client::FluxClientError;
use thiserror::Error;

/// Errors that can end a monitoring operation.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Kind has no known API coordinates; nothing was polled
    #[error("unsupported resource kind: {0}")]
    UnsupportedKind(String),

    /// Deadline elapsed before the resource reported Ready
    #[error("timeout waiting for {kind} {namespace}/{name} reconciliation")]
    Timeout {
        /// Kind being waited on
        kind: ResourceKind,
        /// Resource name
        name: String,
        /// Resource namespace
        namespace: String,
    },

    /// Session scope was cancelled (signal, parent deadline, or `stop()`)
    #[error("wait for readiness was cancelled")]
    Cancelled,

    /// Could not establish the control-plane connection
    #[error("could not start event monitoring: {0}")]
    Setup(#[from] FluxClientError),
}
