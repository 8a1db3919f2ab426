//! Flux Kubernetes Client
//!
//! Thin access layer over the Kubernetes API for supervising Flux
//! reconciliations: listing the events recorded against a Flux object and
//! fetching a Flux custom resource so its status conditions can be read.
//!
//! # Example
//!
//! ```no_run
//! use flux_client::{FluxClient, FluxClientTrait, ResourceCoordinates};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FluxClient::connect(Duration::from_secs(10)).await?;
//!
//! let events = client.list_recent_events("flux-system", "apps", 10).await?;
//!
//! let kustomizations = ResourceCoordinates {
//!     group: "kustomize.toolkit.fluxcd.io",
//!     version: "v1",
//!     kind: "Kustomization",
//!     plural: "kustomizations",
//! };
//! let document = client.get_resource_status(&kustomizations, "flux-system", "apps").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod flux_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::FluxClient;
pub use error::FluxClientError;
pub use models::*;
pub use flux_trait::FluxClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockFluxClient;
