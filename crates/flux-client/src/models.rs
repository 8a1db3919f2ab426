//! Flux client models
//!
//! Plain data handed across the client boundary. Kubernetes types never leak
//! past this crate; callers see `EventRecord` and raw status documents only.

use chrono::{DateTime, Utc};
use std::fmt;

/// Severity reported by the Kubernetes event `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventSeverity {
    /// Routine progress
    #[default]
    Normal,
    /// Something the operator should look at
    Warning,
}

impl EventSeverity {
    /// Maps the raw `type` field of a core/v1 Event.
    ///
    /// Only `"Warning"` is a warning; anything else, including a missing
    /// type, is treated as normal.
    #[must_use]
    pub fn from_event_type(event_type: Option<&str>) -> Self {
        match event_type {
            Some("Warning") => Self::Warning,
            _ => Self::Normal,
        }
    }

    /// Wire name of the severity, as Kubernetes spells it
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event involving the watched object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Short machine-readable cause, e.g. `ReconciliationSucceeded`
    pub reason: String,
    /// Human-readable description
    pub message: String,
    /// Normal or warning
    pub severity: EventSeverity,
    /// Best available timestamp (last seen, event time, or first seen)
    pub timestamp: Option<DateTime<Utc>>,
}

impl EventRecord {
    /// Creates an event without a timestamp
    pub fn new(reason: impl Into<String>, message: impl Into<String>, severity: EventSeverity) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
            severity,
            timestamp: None,
        }
    }

    /// Sets the ordering timestamp
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// API coordinates of a namespaced custom resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceCoordinates {
    /// API group, e.g. `kustomize.toolkit.fluxcd.io`
    pub group: &'static str,
    /// API version within the group, e.g. `v1`
    pub version: &'static str,
    /// Object kind, e.g. `Kustomization`
    pub kind: &'static str,
    /// Plural resource name used in URLs, e.g. `kustomizations`
    pub plural: &'static str,
}

impl ResourceCoordinates {
    /// `group/version` as it appears in `apiVersion`
    #[must_use]
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

impl fmt::Display for ResourceCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.plural, self.group, self.version)
    }
}
