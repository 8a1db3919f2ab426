//! Cancellation wiring for the whole run.
//!
//! One scope is cancelled by Ctrl-C, SIGTERM, or the overall deadline,
//! whichever comes first.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `scope` on Ctrl-C or SIGTERM.
pub fn cancel_on_signal(scope: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            () = scope.cancelled() => return,
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Could not listen for Ctrl-C: {}", e);
                    return;
                }
                info!("Interrupt received");
            }
            () = terminate() => info!("SIGTERM received"),
        }
        scope.cancel();
    });
}

/// Cancels `scope` once `timeout` has elapsed.
pub fn cancel_after(scope: CancellationToken, timeout: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            () = scope.cancelled() => {}
            () = tokio::time::sleep(timeout) => {
                info!("Overall timeout of {:?} reached", timeout);
                scope.cancel();
            }
        }
    });
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Could not listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
