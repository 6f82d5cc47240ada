//! Mock SDK and view registry for testing.
//!
//! `MockSdk` hands out `MockSession`, `MockPublisher` and `MockSubscriber`
//! instances that record every native call, and keeps the handler the bridge
//! passed in so tests can simulate SDK notifications.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rtc_bridge::{
    Bridge, BridgeConfig, ConnectionInfo, Envelope, ErrorDomain, MediaSdk, NativePublisher, NativeSession,
    NativeSubscriber, PublisherHandler, PublisherProperties, SdkError, SessionHandler, SessionOptions,
    StreamInfo, SubscriberHandler, SubscriberProperties, ViewRegistry,
};

// ============================================================================
// Native entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Connect(String),
    Disconnect,
    Publish,
    Unpublish,
    Subscribe,
    Signal { signal_type: String, data: String },
    SignalTo { signal_type: String, data: String, connection_id: String },
}

#[derive(Default)]
pub struct MockSession {
    calls: Mutex<Vec<SessionCall>>,
    local_connection: Mutex<Option<ConnectionInfo>>,
}

impl MockSession {
    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &SessionCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn set_local_connection(&self, connection: ConnectionInfo) {
        *self.local_connection.lock().unwrap() = Some(connection);
    }

    fn record(&self, call: SessionCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NativeSession for MockSession {
    fn connect(&self, token: &str) {
        self.record(SessionCall::Connect(token.to_string()));
    }

    fn disconnect(&self) {
        self.record(SessionCall::Disconnect);
    }

    fn publish(&self, _publisher: &dyn NativePublisher) {
        self.record(SessionCall::Publish);
    }

    fn unpublish(&self, _publisher: &dyn NativePublisher) {
        self.record(SessionCall::Unpublish);
    }

    fn subscribe(&self, _subscriber: &dyn NativeSubscriber) {
        self.record(SessionCall::Subscribe);
    }

    fn send_signal(&self, signal_type: &str, data: &str) {
        self.record(SessionCall::Signal {
            signal_type: signal_type.to_string(),
            data: data.to_string(),
        });
    }

    fn send_signal_to(&self, signal_type: &str, data: &str, connection_id: &str) {
        self.record(SessionCall::SignalTo {
            signal_type: signal_type.to_string(),
            data: data.to_string(),
            connection_id: connection_id.to_string(),
        });
    }

    fn local_connection(&self) -> Option<ConnectionInfo> {
        self.local_connection.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherCall {
    PublishAudio(bool),
    PublishVideo(bool),
    CycleCamera,
    AudioFallback(bool),
    StopCapture,
}

#[derive(Default)]
pub struct MockPublisher {
    calls: Mutex<Vec<PublisherCall>>,
}

impl MockPublisher {
    pub fn calls(&self) -> Vec<PublisherCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: PublisherCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: PublisherCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NativePublisher for MockPublisher {
    fn set_publish_audio(&self, enabled: bool) {
        self.record(PublisherCall::PublishAudio(enabled));
    }

    fn set_publish_video(&self, enabled: bool) {
        self.record(PublisherCall::PublishVideo(enabled));
    }

    fn cycle_camera(&self) {
        self.record(PublisherCall::CycleCamera);
    }

    fn set_audio_fallback_enabled(&self, enabled: bool) {
        self.record(PublisherCall::AudioFallback(enabled));
    }

    fn stop_capture(&self) {
        self.record(PublisherCall::StopCapture);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberCall {
    SubscribeToAudio(bool),
    SubscribeToVideo(bool),
}

#[derive(Default)]
pub struct MockSubscriber {
    calls: Mutex<Vec<SubscriberCall>>,
}

impl MockSubscriber {
    pub fn calls(&self) -> Vec<SubscriberCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl NativeSubscriber for MockSubscriber {
    fn set_subscribe_to_audio(&self, enabled: bool) {
        self.calls.lock().unwrap().push(SubscriberCall::SubscribeToAudio(enabled));
    }

    fn set_subscribe_to_video(&self, enabled: bool) {
        self.calls.lock().unwrap().push(SubscriberCall::SubscribeToVideo(enabled));
    }
}

// ============================================================================
// SDK factory
// ============================================================================

/// Mock SDK that never touches a network.
///
/// Creation can be configured to fail to exercise error paths.
#[derive(Default)]
pub struct MockSdk {
    sessions: Mutex<HashMap<String, (Arc<MockSession>, SessionHandler)>>,
    publishers: Mutex<HashMap<String, (Arc<MockPublisher>, PublisherHandler)>>,
    subscribers: Mutex<Vec<(String, Arc<MockSubscriber>, SubscriberHandler)>>,
    should_fail_creation: AtomicBool,
    creation_count: AtomicU32,
}

impl MockSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_creation(&self, should_fail: bool) {
        self.should_fail_creation.store(should_fail, Ordering::Relaxed);
    }

    pub fn creation_count(&self) -> u32 {
        self.creation_count.load(Ordering::Relaxed)
    }

    pub fn session(&self, session_id: &str) -> Arc<MockSession> {
        let sessions = self.sessions.lock().unwrap();
        Arc::clone(&sessions.get(session_id).expect("session was never created").0)
    }

    pub fn session_handler(&self, session_id: &str) -> SessionHandler {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(session_id).expect("session was never created").1.clone()
    }

    pub fn publisher(&self, publisher_id: &str) -> Arc<MockPublisher> {
        let publishers = self.publishers.lock().unwrap();
        Arc::clone(&publishers.get(publisher_id).expect("publisher was never created").0)
    }

    pub fn publisher_handler(&self, publisher_id: &str) -> PublisherHandler {
        let publishers = self.publishers.lock().unwrap();
        publishers.get(publisher_id).expect("publisher was never created").1.clone()
    }

    /// Every subscriber ever created for `stream_id`, oldest first
    pub fn subscribers_for(&self, stream_id: &str) -> Vec<Arc<MockSubscriber>> {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| id == stream_id)
            .map(|(_, subscriber, _)| Arc::clone(subscriber))
            .collect()
    }

    /// Handler of the most recent subscriber for `stream_id`
    pub fn subscriber_handler(&self, stream_id: &str) -> SubscriberHandler {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _, _)| id == stream_id)
            .map(|(_, _, handler)| handler.clone())
            .expect("subscriber was never created")
    }

    fn check_creation(&self, domain: ErrorDomain) -> Result<(), SdkError> {
        self.creation_count.fetch_add(1, Ordering::Relaxed);
        if self.should_fail_creation.load(Ordering::Relaxed) {
            return Err(SdkError::new(domain, 1004, "Mock creation failure"));
        }
        Ok(())
    }
}

impl MediaSdk for MockSdk {
    fn create_session(
        &self,
        _api_key: &str,
        session_id: &str,
        _options: &SessionOptions,
        handler: SessionHandler,
    ) -> Result<Arc<dyn NativeSession>, SdkError> {
        self.check_creation(ErrorDomain::Session)?;
        let session = Arc::new(MockSession::default());
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), (Arc::clone(&session), handler));
        Ok(session)
    }

    fn create_publisher(
        &self,
        publisher_id: &str,
        _properties: &PublisherProperties,
        handler: PublisherHandler,
    ) -> Result<Arc<dyn NativePublisher>, SdkError> {
        self.check_creation(ErrorDomain::Publisher)?;
        let publisher = Arc::new(MockPublisher::default());
        self.publishers
            .lock()
            .unwrap()
            .insert(publisher_id.to_string(), (Arc::clone(&publisher), handler));
        Ok(publisher)
    }

    fn create_subscriber(
        &self,
        stream: &StreamInfo,
        _properties: &SubscriberProperties,
        handler: SubscriberHandler,
    ) -> Result<Arc<dyn NativeSubscriber>, SdkError> {
        self.check_creation(ErrorDomain::Subscriber)?;
        let subscriber = Arc::new(MockSubscriber::default());
        self.subscribers
            .lock()
            .unwrap()
            .push((stream.stream_id.clone(), Arc::clone(&subscriber), handler));
        Ok(subscriber)
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Default)]
pub struct MockViews {
    cleared: Mutex<Vec<String>>,
}

impl MockViews {
    pub fn cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }
}

impl ViewRegistry for MockViews {
    fn clear_and_drop(&self, entity_id: &str) {
        self.cleared.lock().unwrap().push(entity_id.to_string());
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub bridge: Bridge,
    pub sdk: Arc<MockSdk>,
    pub views: Arc<MockViews>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let sdk = MockSdk::new();
        let views = Arc::new(MockViews::default());
        let bridge = Bridge::builder()
            .config(config)
            .view_registry(views.clone())
            .build(sdk.clone())
            .expect("bridge should build");

        Self { bridge, sdk, views }
    }

    /// `init_session` plus a simulated SDK connect
    pub fn connected_session(&self, session_id: &str) {
        self.bridge
            .init_session("api-key", session_id, SessionOptions::default())
            .unwrap();
        let pending = self.bridge.connect(session_id, "token");
        self.sdk.session_handler(session_id).on_connected();
        pending.wait().unwrap();
    }

    /// A connected session with `publisher_id` published into it
    pub fn published(&self, session_id: &str, publisher_id: &str) {
        self.connected_session(session_id);
        self.bridge
            .init_publisher(publisher_id, PublisherProperties::default())
            .wait()
            .unwrap();
        self.bridge.publish(session_id, publisher_id).wait().unwrap();
    }

    /// A connected session that has received `stream_id`
    pub fn with_remote_stream(&self, session_id: &str, stream_id: &str) {
        self.connected_session(session_id);
        self.sdk
            .session_handler(session_id)
            .on_stream_received(StreamInfo::new(stream_id, session_id));
    }

    /// Drain every event delivered so far
    pub fn drain_events(&self) -> Vec<Envelope> {
        self.bridge.events().try_iter().collect()
    }

    /// Wait for the next delivered event
    pub fn next_event(&self) -> Option<Envelope> {
        self.bridge.events().recv_timeout(Duration::from_secs(1))
    }
}
