//! Integration tests for bridge shutdown, reset and concurrent notifications.

mod common;

use std::sync::Arc;
use std::thread;

use common::{Harness, MockSdk, PublisherCall};
use rtc_bridge::{
    Bridge, BridgeConfig, BridgeError, ConnectionInfo, ConnectionStatus, PublisherProperties, SessionOptions,
    StreamInfo,
};

#[test]
fn test_bridge_starts_running() {
    let h = Harness::new();

    assert!(h.bridge.is_running());
    assert_eq!(h.bridge.flush(), Ok(()));
}

#[test]
fn test_worker_thread_uses_configured_name() {
    let h = Harness::with_config(BridgeConfig::default().with_worker_thread_name("custom-lifecycle"));

    assert_eq!(h.bridge.context().config().worker_thread_name, "custom-lifecycle");
    assert_eq!(h.bridge.flush(), Ok(()));
}

#[test]
fn test_requests_after_shutdown_report_worker_unavailable() {
    let h = Harness::new();
    h.published("s1", "p1");

    h.bridge.shutdown();

    assert!(!h.bridge.is_running());
    assert_eq!(h.bridge.destroy_publisher("p1").wait(), Err(BridgeError::WorkerUnavailable));
    assert_eq!(h.bridge.remove_subscriber("st-1").wait(), Err(BridgeError::WorkerUnavailable));
    assert_eq!(h.bridge.disconnect_session("s1").wait(), Err(BridgeError::WorkerUnavailable));
    assert_eq!(h.bridge.flush(), Err(BridgeError::WorkerUnavailable));

    // nothing was torn down
    assert_eq!(h.sdk.publisher("p1").count(PublisherCall::StopCapture), 0);
    assert!(h.bridge.context().destroy_callbacks().is_empty());
}

#[test]
fn test_shutdown_is_idempotent() {
    let h = Harness::new();

    h.bridge.shutdown();
    h.bridge.shutdown();

    assert!(!h.bridge.is_running());
}

#[test]
fn test_shutdown_drains_queued_commands() {
    let h = Harness::new();
    h.published("s1", "p1");

    let pending = h.bridge.destroy_publisher("p1");
    h.bridge.shutdown();

    assert_eq!(pending.wait(), Ok(()));
    assert_eq!(h.sdk.publisher("p1").count(PublisherCall::StopCapture), 1);
}

#[test]
fn test_reset_discards_pending_requests() {
    let h = Harness::new();
    h.bridge
        .init_session("api-key", "s1", SessionOptions::default())
        .unwrap();
    let pending = h.bridge.connect("s1", "token");

    h.bridge.reset();

    assert_eq!(pending.wait(), Err(BridgeError::Discarded));
}

#[test]
fn test_reset_clears_all_state() {
    let h = Harness::new();
    h.bridge.set_native_events(["s1:session:onConnectionCreated"]);
    h.published("s1", "p1");
    h.sdk
        .session_handler("s1")
        .on_stream_received(StreamInfo::new("st-1", "s1"));
    h.drain_events();

    h.bridge.reset();

    let ctx = h.bridge.context();
    assert!(ctx.sessions().is_empty());
    assert!(ctx.publishers().is_empty());
    assert!(ctx.streams().is_empty());
    assert!(ctx.status().is_empty());
    assert_eq!(h.bridge.connection_status("s1"), ConnectionStatus::Disconnected);

    // subscriptions are gone too
    h.sdk
        .session_handler("s1")
        .on_connection_created(ConnectionInfo::new("c1", ""));
    assert!(h.drain_events().is_empty());

    // the bridge stays usable
    assert!(h.bridge.is_running());
    h.connected_session("s1");
}

#[test]
fn test_notifications_after_drop_are_ignored() {
    let sdk = MockSdk::new();
    let bridge = Bridge::new(sdk.clone()).unwrap();
    bridge
        .init_session("api-key", "s1", SessionOptions::default())
        .unwrap();
    bridge
        .init_publisher("p1", PublisherProperties::default())
        .wait()
        .unwrap();

    drop(bridge);

    sdk.session_handler("s1").on_connected();
    sdk.session_handler("s1").on_disconnected();
    sdk.publisher_handler("p1")
        .on_stream_destroyed(StreamInfo::new("own", "s1"));
    assert_eq!(sdk.publisher("p1").count(PublisherCall::StopCapture), 0);
}

#[test]
fn test_concurrent_sdk_threads() {
    let h = Harness::new();
    h.connected_session("s1");
    let handler = h.sdk.session_handler("s1");

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let handler = handler.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let id = format!("c-{}-{}", t, i);
                    handler.on_connection_created(ConnectionInfo::new(id.clone(), ""));
                    handler.on_stream_received(StreamInfo::new(format!("st-{}-{}", t, i), "s1"));
                    if i % 2 == 0 {
                        handler.on_connection_destroyed(ConnectionInfo::new(id, ""));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let ctx = h.bridge.context();
    assert_eq!(ctx.connections().len(), 8 * 12);
    assert_eq!(ctx.streams().len(), 8 * 25);
}

#[test]
fn test_concurrent_destroy_paths_tear_down_once() {
    for round in 0..20 {
        let h = Harness::new();
        let publisher_id = format!("p{}", round);
        h.published("s1", &publisher_id);

        let handler = h.sdk.publisher_handler(&publisher_id);
        let sdk_thread = thread::spawn(move || handler.on_stream_destroyed(StreamInfo::new("own", "s1")));

        let result = h.bridge.destroy_publisher(&publisher_id).wait();
        sdk_thread.join().unwrap();
        h.bridge.flush().unwrap();

        assert_eq!(result, Ok(()));
        assert_eq!(h.sdk.publisher(&publisher_id).count(PublisherCall::StopCapture), 1);
        assert_eq!(h.views.cleared().len(), 1);
    }
}

#[test]
fn test_host_requests_from_several_threads() {
    let h = Arc::new(Harness::new());
    h.connected_session("s1");

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                let publisher_id = format!("p{}", t);
                h.bridge
                    .init_publisher(&publisher_id, PublisherProperties::default())
                    .wait()
                    .unwrap();
                h.bridge.publish("s1", &publisher_id).wait().unwrap();
                h.bridge.destroy_publisher(&publisher_id).wait().unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(h.bridge.context().publishers().is_empty());
}
