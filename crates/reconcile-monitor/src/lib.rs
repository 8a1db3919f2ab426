//! Flux Reconcile Monitor
//!
//! Supervises a Flux reconciliation while it runs:
//! - a change detector that polls the object's events and surfaces only
//!   changes in the recent window,
//! - a readiness poller that waits for the object's `Ready` condition,
//! - a [`Monitor`] session tying both to one cancellation scope.
//!
//! # Example
//!
//! ```no_run
//! use reconcile_monitor::{Monitor, MonitorConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), reconcile_monitor::MonitorError> {
//! let scope = CancellationToken::new();
//! let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let monitor = Monitor::connect(
//!     &scope, "kustomization", "apps", "flux-system", Arc::new(tx), MonitorConfig::default(),
//! ).await?;
//! let events = monitor.spawn();
//!
//! // ... run `flux reconcile` here while printing notifications ...
//!
//! let outcome = monitor.wait_for_ready(Duration::from_secs(300)).await;
//! monitor.stop();
//! let _ = events.await;
//! outcome
//! # }
//! ```
//!
//! Per-tick API failures never reach the caller. Only terminal outcomes do:
//! ready, [`MonitorError::Timeout`], [`MonitorError::Cancelled`] and
//! [`MonitorError::UnsupportedKind`].

pub mod config;
pub mod detector;
pub mod error;
pub mod fingerprint;
pub mod monitor;
pub mod notification;
pub mod readiness;
mod request;
pub mod target;

pub use config::MonitorConfig;
pub use detector::ChangeDetector;
pub use error::MonitorError;
pub use flux_client::FluxClientError;
pub use fingerprint::EventFingerprint;
pub use monitor::Monitor;
pub use notification::{EventNotification, NotificationSink, WATCHED_REASONS};
pub use readiness::{ReadinessPoller, is_ready};
pub use target::{ReconcileTarget, ResourceKind, resolve_kind};
