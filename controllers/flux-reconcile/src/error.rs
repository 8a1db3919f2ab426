//! CLI error types.

use reconcile_monitor::MonitorError;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a `flux-reconcile` run with a failure exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// The flux binary could not be started or waited on
    #[error("Error running flux: {0}")]
    Command(#[from] std::io::Error),

    /// Interrupted or out of time while flux was still running
    #[error("flux reconcile was interrupted")]
    Cancelled,

    /// The overall `--timeout` elapsed
    #[error("Timed out after {0:?}")]
    DeadlineExceeded(Duration),

    /// Readiness wait ended without the resource becoming ready
    #[error("Reconciliation failed or timed out: {0}")]
    Monitor(#[from] MonitorError),
}
