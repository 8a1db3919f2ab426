//! Kubernetes-backed Flux client
//!
//! Lists core/v1 Events for the watched object and fetches Flux custom
//! resources through the dynamic API.

use crate::error::FluxClientError;
use crate::models::{EventRecord, EventSeverity, ResourceCoordinates};
use crate::flux_trait::FluxClientTrait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Event;
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Flux client over a live Kubernetes API server
#[derive(Clone)]
pub struct FluxClient {
    client: Client,
}

impl fmt::Debug for FluxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluxClient").finish_non_exhaustive()
    }
}

impl FluxClient {
    /// Wraps an existing Kubernetes client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient configuration and checks that the
    /// API server answers.
    ///
    /// Configuration is inferred the usual way: in-cluster service account
    /// first, then `$KUBECONFIG` or `~/.kube/config`. A client that cannot
    /// reach the server within `timeout` is rejected, so callers never hold
    /// a half-working session.
    ///
    /// # Errors
    /// * `FluxClientError::Config` - no usable configuration was found
    /// * `FluxClientError::Timeout` - the API server did not answer in time
    /// * `FluxClientError::Kube` - the API server rejected the request
    pub async fn connect(timeout: Duration) -> Result<Self, FluxClientError> {
        let client = Client::try_default()
            .await
            .map_err(|e| FluxClientError::Config(e.to_string()))?;

        debug!("Validating Kubernetes API connectivity");
        let version = match tokio::time::timeout(timeout, client.apiserver_version()).await {
            Ok(result) => result?,
            Err(_elapsed) => return Err(FluxClientError::Timeout(timeout)),
        };
        info!("Connected to Kubernetes API server {}", version.git_version);

        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl FluxClientTrait for FluxClient {
    async fn list_recent_events(
        &self,
        namespace: &str,
        name: &str,
        limit: u32,
    ) -> Result<Vec<EventRecord>, FluxClientError> {
        let api: Api<Event> = Api::namespaced(self.client.clone(), namespace);
        let selector = involved_object_selector(namespace, name);
        let params = ListParams::default().fields(&selector).limit(limit);

        let list = api.list(&params).await?;
        debug!("Listed {} events for {}/{}", list.items.len(), namespace, name);

        let mut events: Vec<EventRecord> = list.items.iter().map(event_record).collect();
        // Stable: events without a timestamp keep their delivered order at the front
        events.sort_by_key(|event| event.timestamp);
        Ok(events)
    }

    async fn get_resource_status(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<serde_json::Value, FluxClientError> {
        let gvk = GroupVersionKind::gvk(coordinates.group, coordinates.version, coordinates.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, coordinates.plural);
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &resource);

        match api.get_opt(name).await? {
            Some(object) => Ok(object.data),
            None => Err(FluxClientError::NotFound(format!(
                "{} {}/{}",
                coordinates, namespace, name
            ))),
        }
    }
}

/// Field selector matching events about `namespace/name`
pub(crate) fn involved_object_selector(namespace: &str, name: &str) -> String {
    format!("involvedObject.name={name},involvedObject.namespace={namespace}")
}

/// Converts a core/v1 Event into the client-neutral record
pub(crate) fn event_record(event: &Event) -> EventRecord {
    EventRecord {
        reason: event.reason.clone().unwrap_or_default(),
        message: event.message.clone().unwrap_or_default(),
        severity: EventSeverity::from_event_type(event.type_.as_deref()),
        timestamp: event_timestamp(event),
    }
}

fn event_timestamp(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .and_then(parse_timestamp)
        .or_else(|| event.event_time.as_ref().and_then(parse_timestamp))
        .or_else(|| event.first_timestamp.as_ref().and_then(parse_timestamp))
}

// Time and MicroTime serialize as RFC 3339 strings regardless of the
// datetime library k8s-openapi wraps.
fn parse_timestamp<T: Serialize>(time: &T) -> Option<DateTime<Utc>> {
    let value = serde_json::to_value(time).ok()?;
    let raw = value.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
