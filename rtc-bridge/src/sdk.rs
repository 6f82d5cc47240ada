//! Seams to the native media SDK and the view-container registry
//!
//! The bridge never talks to a concrete SDK. A platform integration implements
//! [`MediaSdk`] and the three entity traits, and forwards SDK notifications to
//! the handler it was given when the entity was created. Every native call is
//! fire-and-forget: completion is observed later through a handler method.

use std::sync::Arc;

use crate::config::{PublisherProperties, SessionOptions, SubscriberProperties};
use crate::error::SdkError;
use crate::handlers::{PublisherHandler, SessionHandler, SubscriberHandler};
use crate::model::{ConnectionInfo, StreamInfo};

/// Factory for native entities
pub trait MediaSdk: Send + Sync {
    /// Build a session; `handler` receives every session notification
    fn create_session(
        &self,
        api_key: &str,
        session_id: &str,
        options: &SessionOptions,
        handler: SessionHandler,
    ) -> Result<Arc<dyn NativeSession>, SdkError>;

    /// Build a publisher; `handler` receives publisher notifications
    fn create_publisher(
        &self,
        publisher_id: &str,
        properties: &PublisherProperties,
        handler: PublisherHandler,
    ) -> Result<Arc<dyn NativePublisher>, SdkError>;

    /// Build a subscriber for `stream`
    fn create_subscriber(
        &self,
        stream: &StreamInfo,
        properties: &SubscriberProperties,
        handler: SubscriberHandler,
    ) -> Result<Arc<dyn NativeSubscriber>, SdkError>;
}

/// A native session
pub trait NativeSession: Send + Sync {
    fn connect(&self, token: &str);
    fn disconnect(&self);
    fn publish(&self, publisher: &dyn NativePublisher);
    fn unpublish(&self, publisher: &dyn NativePublisher);
    fn subscribe(&self, subscriber: &dyn NativeSubscriber);
    /// Broadcast a signal to every connection in the session
    fn send_signal(&self, signal_type: &str, data: &str);
    /// Send a signal to one connection
    fn send_signal_to(&self, signal_type: &str, data: &str, connection_id: &str);
    /// The local participant's connection, once connected
    fn local_connection(&self) -> Option<ConnectionInfo>;
}

/// A native publisher
pub trait NativePublisher: Send + Sync {
    fn set_publish_audio(&self, enabled: bool);
    fn set_publish_video(&self, enabled: bool);
    fn cycle_camera(&self);
    fn set_audio_fallback_enabled(&self, enabled: bool);
    fn stop_capture(&self);
}

/// A native subscriber
pub trait NativeSubscriber: Send + Sync {
    fn set_subscribe_to_audio(&self, enabled: bool);
    fn set_subscribe_to_video(&self, enabled: bool);
}

/// View containers keyed by publisher id or stream id
pub trait ViewRegistry: Send + Sync {
    /// Remove every child view of the container for `entity_id`, then forget it
    fn clear_and_drop(&self, entity_id: &str);
}

/// View registry for headless hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViews;

impl ViewRegistry for NoopViews {
    fn clear_and_drop(&self, _entity_id: &str) {}
}
