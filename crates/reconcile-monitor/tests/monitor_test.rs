//! End-to-end tests for the monitor session against the mock client.
//!
//! All tests run on a paused clock so intervals and deadlines are exact.

use flux_client::{EventRecord, EventSeverity, MockFluxClient};
use reconcile_monitor::{
    EventNotification, Monitor, MonitorConfig, MonitorError, ReconcileTarget, ResourceKind,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

const READY_INTERVAL: Duration = Duration::from_secs(2);

struct Harness {
    mock: MockFluxClient,
    parent: CancellationToken,
    monitor: Monitor,
    notifications: UnboundedReceiver<EventNotification>,
}

fn harness_with(config: MonitorConfig) -> Harness {
    let mock = MockFluxClient::new();
    let parent = CancellationToken::new();
    let (tx, notifications) = unbounded_channel();
    let monitor = Monitor::start(
        &parent,
        Arc::new(mock.clone()),
        ReconcileTarget::new(ResourceKind::Kustomization, "apps", "flux-system"),
        Arc::new(tx),
        config,
    );
    Harness { mock, parent, monitor, notifications }
}

fn harness() -> Harness {
    harness_with(MonitorConfig::default())
}

fn set_document(mock: &MockFluxClient, document: serde_json::Value) {
    mock.set_document(&ResourceKind::Kustomization.coordinates(), "flux-system", "apps", document);
}

fn ready_document() -> serde_json::Value {
    json!({
        "status": {
            "conditions": [
                { "type": "Ready", "status": "True", "reason": "ReconciliationSucceeded" }
            ]
        }
    })
}

fn progressing_document() -> serde_json::Value {
    json!({
        "status": {
            "conditions": [
                { "type": "Ready", "status": "Unknown", "reason": "Progressing" }
            ]
        }
    })
}

fn drain(rx: &mut UnboundedReceiver<EventNotification>) -> Vec<EventNotification> {
    let mut received = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        received.push(notification);
    }
    received
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_events_fire_once_and_wait_times_out() {
    let mut h = harness();
    h.mock.set_events(vec![EventRecord::new("Progressing", "Reconciling", EventSeverity::Normal)]);
    set_document(&h.mock, json!({ "status": {} }));

    let events = h.monitor.spawn();
    // Ticks at 3s, 6s and 9s
    sleep(Duration::from_secs(10)).await;

    assert_eq!(h.mock.event_calls(), 3);
    let received = drain(&mut h.notifications);
    assert_eq!(received.len(), 1, "only the first poll reports");
    assert_eq!(received[0].reason, "Progressing");
    assert!(!received[0].is_warning);

    let outcome = h.monitor.wait_for_ready(READY_INTERVAL).await;
    assert!(matches!(outcome, Err(MonitorError::Timeout { kind: ResourceKind::Kustomization, .. })));

    h.monitor.stop();
    events.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_watched_reason_is_reported_as_warning() {
    let mut h = harness();
    h.mock.set_events(vec![EventRecord::new(
        "HealthCheckFailed",
        "Deployment/apps/podinfo not ready",
        EventSeverity::Normal,
    )]);

    let events = h.monitor.spawn();
    sleep(Duration::from_secs(4)).await;
    h.monitor.stop();
    events.await.unwrap();

    let received = drain(&mut h.notifications);
    assert_eq!(received.len(), 1);
    assert!(received[0].is_warning);
}

#[tokio::test(start_paused = true)]
async fn test_ready_document_returns_immediately() {
    let h = harness();
    set_document(&h.mock, ready_document());

    let started = Instant::now();
    h.monitor.wait_for_ready(Duration::from_secs(60)).await.unwrap();

    assert!(started.elapsed() < READY_INTERVAL);
    assert_eq!(h.mock.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ready_detected_within_one_tick() {
    let h = harness();
    set_document(&h.mock, progressing_document());

    let mock = h.mock.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(5)).await;
        set_document(&mock, ready_document());
    });

    let started = Instant::now();
    h.monitor.wait_for_ready(Duration::from_secs(60)).await.unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed <= Duration::from_secs(5) + READY_INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_transient_status_errors_are_absorbed() {
    let mut h = harness();
    set_document(&h.mock, ready_document());
    h.mock.fail_next_status_calls(2);

    h.monitor.wait_for_ready(Duration::from_secs(60)).await.unwrap();

    assert_eq!(h.mock.status_calls(), 3);
    assert!(drain(&mut h.notifications).is_empty(), "errors must not surface as output");
}

#[tokio::test(start_paused = true)]
async fn test_missing_resource_is_retried_until_timeout() {
    let h = harness();

    let outcome = h.monitor.wait_for_ready(Duration::from_secs(10)).await;

    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert!(h.mock.status_calls() >= 5);
}

#[tokio::test(start_paused = true)]
async fn test_never_ready_times_out() {
    let h = harness();
    set_document(&h.mock, progressing_document());

    let started = Instant::now();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(30)).await;

    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert!(started.elapsed() <= Duration::from_secs(30) + READY_INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_slow_status_calls_cannot_overrun_deadline() {
    let h = harness_with(MonitorConfig::default().with_request_timeout(Duration::from_secs(1)));
    set_document(&h.mock, ready_document());
    h.mock.set_latency(Duration::from_secs(120));

    let started = Instant::now();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(5)).await;

    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_slow_call_is_cut_off_at_deadline_with_default_timeouts() {
    let h = harness();
    set_document(&h.mock, ready_document());
    h.mock.set_latency(Duration::from_secs(120));

    let started = Instant::now();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(5)).await;

    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(h.mock.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_call_near_deadline_does_not_overrun() {
    let h = harness();
    set_document(&h.mock, progressing_document());

    let mock = h.mock.clone();
    tokio::spawn(async move {
        // Lands between the polls at 2s and 4s; the 4s poll then stalls
        sleep(Duration::from_secs(3)).await;
        mock.set_latency(Duration::from_secs(60));
    });

    let started = Instant::now();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(5)).await;

    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_parent_cancellation_mid_wait_is_cancelled() {
    let h = harness();
    set_document(&h.mock, progressing_document());

    let parent = h.parent.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(3)).await;
        parent.cancel();
    });

    let outcome = h.monitor.wait_for_ready(Duration::from_secs(60)).await;

    assert!(matches!(outcome, Err(MonitorError::Cancelled)));
    assert!(h.monitor.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_takes_precedence_over_elapsed_deadline() {
    let h = harness();
    set_document(&h.mock, ready_document());
    h.monitor.stop();

    let outcome = h.monitor.wait_for_ready(Duration::ZERO).await;

    assert!(matches!(outcome, Err(MonitorError::Cancelled)));
    assert_eq!(h.mock.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_slow_call() {
    let h = harness_with(MonitorConfig::default().with_request_timeout(Duration::from_secs(600)));
    set_document(&h.mock, ready_document());
    h.mock.set_latency(Duration::from_secs(300));

    let monitor = h.monitor.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(1)).await;
        monitor.stop();
    });

    let started = Instant::now();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(900)).await;

    assert!(matches!(outcome, Err(MonitorError::Cancelled)));
    assert!(started.elapsed() < READY_INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent_and_scoped_to_session() {
    let h = harness();

    let events = h.monitor.spawn();
    h.monitor.stop();
    h.monitor.stop();
    events.await.unwrap();

    assert!(h.monitor.is_stopped());
    assert!(!h.parent.is_cancelled(), "stopping a session must not cancel its parent");
}

#[tokio::test(start_paused = true)]
async fn test_timeout_leaves_event_loop_running() {
    let h = harness();
    h.mock.set_events(vec![EventRecord::new("Progressing", "Reconciling", EventSeverity::Normal)]);

    let events = h.monitor.spawn();
    let outcome = h.monitor.wait_for_ready(Duration::from_secs(4)).await;
    assert!(matches!(outcome, Err(MonitorError::Timeout { .. })));
    assert!(!h.monitor.is_stopped());

    let calls_after_timeout = h.mock.event_calls();
    sleep(Duration::from_secs(7)).await;
    assert!(h.mock.event_calls() > calls_after_timeout);

    h.monitor.stop();
    events.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_event_loop_survives_event_errors() {
    let mut h = harness();
    h.mock.set_events(vec![EventRecord::new("Progressing", "Reconciling", EventSeverity::Normal)]);
    h.mock.fail_next_event_calls(2);

    let events = h.monitor.spawn();
    // Failing ticks at 3s and 6s, successful tick at 9s
    sleep(Duration::from_secs(10)).await;
    h.monitor.stop();
    events.await.unwrap();

    assert_eq!(h.mock.event_calls(), 3);
    assert_eq!(drain(&mut h.notifications).len(), 1);
}
