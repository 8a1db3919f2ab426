//! Bounded API calls.
//!
//! Every accessor call made by the loops gets its own timeout and races the
//! session's cancellation, so a stalled API server can neither outlive the
//! deadline nor delay shutdown.

use flux_client::FluxClientError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs `call` with a timeout.
///
/// Returns `None` when `cancel` fires first. An elapsed timeout is reported
/// as `FluxClientError::Timeout`.
pub(crate) async fn bounded<T, F>(
    cancel: &CancellationToken,
    timeout: Duration,
    call: F,
) -> Option<Result<T, FluxClientError>>
where
    F: Future<Output = Result<T, FluxClientError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = tokio::time::timeout(timeout, call) => {
            Some(result.unwrap_or_else(|_elapsed| Err(FluxClientError::Timeout(timeout))))
        }
    }
}
