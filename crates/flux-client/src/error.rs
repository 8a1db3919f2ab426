//! Flux client errors

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the Kubernetes API on behalf of Flux resources
#[derive(Debug, Error)]
pub enum FluxClientError {
    /// Kubernetes API error (transport, auth, or a non-success response)
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// No usable kubeconfig or in-cluster configuration
    #[error("Kubernetes configuration error: {0}")]
    Config(String),

    /// A single request exceeded its time budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response could not be interpreted
    #[error("API error: {0}")]
    Api(String),
}
