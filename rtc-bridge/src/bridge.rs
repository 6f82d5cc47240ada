//! Host-facing bridge
//!
//! Every host request is a method on [`Bridge`]. Requests that complete
//! asynchronously return a [`Pending`]; absence of an entity resolves it with
//! [`BridgeError::NotFound`] rather than failing on the calling thread.
//!
//! # Example
//!
//! ```rust,ignore
//! use rtc_bridge::{Bridge, SessionOptions};
//!
//! let bridge = Bridge::builder().build(sdk)?;
//! bridge.set_native_events(["s1:session:onConnected"]);
//!
//! bridge.init_session("api-key", "s1", SessionOptions::default())?;
//! bridge.connect("s1", "token").wait()?;
//!
//! for event in bridge.events() {
//!     println!("{} {}", event.qualified_name(), event.payload);
//! }
//! ```

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::completion::{completion, Pending};
use crate::config::{BridgeConfig, PublisherProperties, SessionOptions, SignalRequest, SubscriberProperties};
use crate::context::BridgeContext;
use crate::error::{BridgeError, EntityKind, Result};
use crate::events::{Envelope, EventIterator, EventRouter};
use crate::handlers::{PublisherHandler, SessionHandler, SubscriberHandler};
use crate::lifecycle::{spawn_lifecycle_worker, Command, LifecycleQueue, Origin};
use crate::logging::diag;
use crate::model::{CameraPosition, PublisherRecord, SessionInfo, SessionRecord, SubscriberRecord, VideoSource};
use crate::sdk::{MediaSdk, NoopViews, ViewRegistry};
use crate::status::ConnectionStatus;

/// Builder for [`Bridge`]
pub struct BridgeBuilder {
    config: BridgeConfig,
    views: Option<Arc<dyn ViewRegistry>>,
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self {
            config: BridgeConfig::default(),
            views: None,
        }
    }
}

impl BridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// View containers cleared on teardown; defaults to [`NoopViews`]
    pub fn view_registry(mut self, views: Arc<dyn ViewRegistry>) -> Self {
        self.views = Some(views);
        self
    }

    /// Build the bridge and start its lifecycle worker
    pub fn build(self, sdk: Arc<dyn MediaSdk>) -> Result<Bridge> {
        let (event_tx, event_rx) = mpsc::channel();
        let (command_tx, command_rx) = mpsc::channel();

        let views = self.views.unwrap_or_else(|| Arc::new(NoopViews));
        let ctx = Arc::new(BridgeContext::new(
            self.config,
            views,
            EventRouter::new(event_tx),
            LifecycleQueue::new(command_tx),
        ));

        let worker = spawn_lifecycle_worker(Arc::clone(&ctx), command_rx).map_err(|e| {
            tracing::error!("Failed to spawn lifecycle worker: {}", e);
            BridgeError::WorkerUnavailable
        })?;

        tracing::debug!(
            worker = %ctx.config().worker_thread_name,
            "Bridge started"
        );

        Ok(Bridge {
            ctx,
            sdk,
            event_rx: Arc::new(Mutex::new(event_rx)),
            worker: parking_lot::Mutex::new(Some(worker)),
        })
    }
}

/// Bridge between a native media SDK and a single-threaded host
pub struct Bridge {
    ctx: Arc<BridgeContext>,
    sdk: Arc<dyn MediaSdk>,
    event_rx: Arc<Mutex<mpsc::Receiver<Envelope>>>,
    worker: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl Bridge {
    /// Bridge with default configuration
    pub fn new(sdk: Arc<dyn MediaSdk>) -> Result<Self> {
        Self::builder().build(sdk)
    }

    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    /// Shared state, for inspection
    pub fn context(&self) -> &BridgeContext {
        &self.ctx
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Create a session and register it under `session_id`
    ///
    /// An earlier session with the same id is replaced.
    pub fn init_session(&self, api_key: &str, session_id: &str, options: SessionOptions) -> Result<()> {
        let handler = SessionHandler::new(&self.ctx, session_id);
        let native = self
            .sdk
            .create_session(api_key, session_id, &options, handler)?;

        let replaced = self.ctx.sessions().put(
            session_id.to_string(),
            SessionRecord {
                native,
                api_key: api_key.to_string(),
                options,
            },
        );
        if replaced.is_some() {
            tracing::debug!(session_id, "Replaced existing session");
        }
        Ok(())
    }

    /// Connect a session; resolves when the SDK reports connected
    ///
    /// A connection-failure error from the SDK resolves it with
    /// [`BridgeError::ConnectionFailure`].
    pub fn connect(&self, session_id: &str, token: &str) -> Pending<()> {
        let Some(session) = self.ctx.sessions().get(session_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Session, session_id)));
        };

        let (done, pending) = completion();
        self.ctx.connect_callbacks().register(session_id, done);
        session.native.connect(token);
        pending
    }

    /// Disconnect a session; resolves when the SDK confirms
    pub fn disconnect_session(&self, session_id: &str) -> Pending<()> {
        let (done, pending) = completion();
        self.ctx.submit(Command::DisconnectSession {
            session_id: session_id.to_string(),
            completion: done,
        });
        pending
    }

    /// Send a signal to one connection if `to` is known, else to the session
    pub fn send_signal(&self, session_id: &str, signal: SignalRequest) -> Pending<()> {
        let Some(session) = self.ctx.sessions().get(session_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Session, session_id)));
        };

        let target = signal
            .to
            .as_deref()
            .filter(|connection_id| self.ctx.connections().contains(*connection_id));

        match target {
            Some(connection_id) => {
                session
                    .native
                    .send_signal_to(&signal.signal_type, &signal.data, connection_id)
            }
            None => session.native.send_signal(&signal.signal_type, &signal.data),
        }
        Pending::ready(Ok(()))
    }

    /// `None` for unknown sessions
    pub fn get_session_info(&self, session_id: &str) -> Option<SessionInfo> {
        let session = self.ctx.sessions().get(session_id)?;

        Some(SessionInfo {
            session_id: session_id.to_string(),
            connection_status: self.ctx.status().get(session_id),
            connection: session.native.local_connection(),
        })
    }

    /// `Disconnected` for unknown sessions
    pub fn connection_status(&self, session_id: &str) -> ConnectionStatus {
        self.ctx.status().get(session_id)
    }

    // ========================================================================
    // Publishers
    // ========================================================================

    /// Create a publisher and register it under `publisher_id`
    pub fn init_publisher(&self, publisher_id: &str, properties: PublisherProperties) -> Pending<()> {
        let handler = PublisherHandler::new(&self.ctx, publisher_id);
        let native = match self.sdk.create_publisher(publisher_id, &properties, handler) {
            Ok(native) => native,
            Err(e) => return Pending::ready(Err(e.into())),
        };
        self.ctx.retired_publishers().remove(publisher_id);

        if properties.video_source == VideoSource::Camera
            && properties.camera_position == CameraPosition::Back
        {
            native.cycle_camera();
        }
        native.set_audio_fallback_enabled(properties.audio_fallback_enabled);
        native.set_publish_video(properties.publish_video);
        native.set_publish_audio(properties.publish_audio);

        self.ctx.publishers().put(
            publisher_id.to_string(),
            PublisherRecord {
                native,
                video_source: properties.video_source,
                camera_position: properties.camera_position,
                session_id: None,
                publish_audio: properties.publish_audio,
                publish_video: properties.publish_video,
            },
        );
        Pending::ready(Ok(()))
    }

    /// Publish a registered publisher into a session
    pub fn publish(&self, session_id: &str, publisher_id: &str) -> Pending<()> {
        let Some(session) = self.ctx.sessions().get(session_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Session, session_id)));
        };
        let Some(publisher) = self.ctx.publishers().get(publisher_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Publisher, publisher_id)));
        };

        // A queued teardown may have removed it since the lookup
        let attached = self
            .ctx
            .publishers()
            .update(publisher_id, |record| record.session_id = Some(session_id.to_string()));
        if !attached {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Publisher, publisher_id)));
        }
        session.native.publish(publisher.native.as_ref());
        Pending::ready(Ok(()))
    }

    /// Tear down a publisher; resolves exactly once when teardown is complete
    ///
    /// If the publisher was already torn down, by the SDK or an earlier
    /// destroy, resolves `Ok`. An id that was never registered resolves
    /// [`BridgeError::NotFound`].
    pub fn destroy_publisher(&self, publisher_id: &str) -> Pending<()> {
        let (done, pending) = completion();
        self.ctx.destroy_callbacks().register(publisher_id, done);
        self.ctx.submit(Command::DestroyPublisher {
            publisher_id: publisher_id.to_string(),
            origin: Origin::Host,
        });
        pending
    }

    /// Alias of [`destroy_publisher`](Self::destroy_publisher)
    pub fn destroy(&self, publisher_id: &str) -> Pending<()> {
        self.destroy_publisher(publisher_id)
    }

    pub fn publish_audio(&self, publisher_id: &str, enabled: bool) {
        if let Some(publisher) = self.ctx.publishers().get(publisher_id) {
            publisher.native.set_publish_audio(enabled);
            self.ctx
                .publishers()
                .update(publisher_id, |record| record.publish_audio = enabled);
        }
    }

    pub fn publish_video(&self, publisher_id: &str, enabled: bool) {
        if let Some(publisher) = self.ctx.publishers().get(publisher_id) {
            publisher.native.set_publish_video(enabled);
            self.ctx
                .publishers()
                .update(publisher_id, |record| record.publish_video = enabled);
        }
    }

    /// Switch to `position`, or to the other camera when `None`
    pub fn change_camera_position(&self, publisher_id: &str, position: Option<CameraPosition>) {
        let Some(publisher) = self.ctx.publishers().get(publisher_id) else {
            return;
        };

        let target = position.unwrap_or_else(|| publisher.camera_position.toggled());
        if target == publisher.camera_position {
            return;
        }

        publisher.native.cycle_camera();
        self.ctx
            .publishers()
            .update(publisher_id, |record| record.camera_position = target);
    }

    // ========================================================================
    // Subscribers
    // ========================================================================

    /// Subscribe to a known stream; resolves with the stream id
    ///
    /// An existing subscriber for the stream is replaced.
    pub fn subscribe_to_stream(
        &self,
        stream_id: &str,
        session_id: &str,
        properties: SubscriberProperties,
    ) -> Pending<String> {
        let Some(session) = self.ctx.sessions().get(session_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Session, session_id)));
        };
        let Some(stream) = self.ctx.streams().get(stream_id) else {
            return Pending::ready(Err(BridgeError::not_found(EntityKind::Stream, stream_id)));
        };

        let handler = SubscriberHandler::new(&self.ctx, stream_id);
        let native = match self.sdk.create_subscriber(&stream, &properties, handler) {
            Ok(native) => native,
            Err(e) => return Pending::ready(Err(e.into())),
        };
        native.set_subscribe_to_audio(properties.subscribe_to_audio);
        native.set_subscribe_to_video(properties.subscribe_to_video);

        let replaced = self.ctx.subscribers().put(
            stream_id.to_string(),
            SubscriberRecord {
                native: Arc::clone(&native),
                session_id: session_id.to_string(),
                subscribe_to_audio: properties.subscribe_to_audio,
                subscribe_to_video: properties.subscribe_to_video,
            },
        );
        if replaced.is_some() {
            tracing::debug!(stream_id, "Replaced existing subscriber");
        }

        session.native.subscribe(native.as_ref());
        Pending::ready(Ok(stream_id.to_string()))
    }

    /// Tear down the subscriber for a stream; always resolves `Ok`
    pub fn remove_subscriber(&self, stream_id: &str) -> Pending<()> {
        let (done, pending) = completion();
        self.ctx.submit(Command::RemoveSubscriber {
            stream_id: stream_id.to_string(),
            completion: Some(done),
        });
        pending
    }

    pub fn subscribe_to_audio(&self, stream_id: &str, enabled: bool) {
        if let Some(subscriber) = self.ctx.subscribers().get(stream_id) {
            subscriber.native.set_subscribe_to_audio(enabled);
            self.ctx
                .subscribers()
                .update(stream_id, |record| record.subscribe_to_audio = enabled);
        }
    }

    pub fn subscribe_to_video(&self, stream_id: &str, enabled: bool) {
        if let Some(subscriber) = self.ctx.subscribers().get(stream_id) {
            subscriber.native.set_subscribe_to_video(enabled);
            self.ctx
                .subscribers()
                .update(stream_id, |record| record.subscribe_to_video = enabled);
        }
    }

    // ========================================================================
    // Events and diagnostics
    // ========================================================================

    pub fn set_native_events<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ctx.router().subscriptions().native.add(names);
    }

    pub fn remove_native_events<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ctx.router().subscriptions().native.remove(names);
    }

    pub fn set_js_component_events<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ctx.router().subscriptions().component.add(names);
    }

    pub fn remove_js_component_events<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ctx.router().subscriptions().component.remove(names);
    }

    /// Toggle per-event diagnostic logging
    pub fn enable_logs(&self, enabled: bool) {
        self.ctx.diagnostics().set_enabled(enabled);
        diag!(self.ctx.diagnostics(), "Diagnostics enabled");
    }

    /// Blocking iterator over delivered events
    pub fn events(&self) -> EventIterator {
        EventIterator::new(Arc::clone(&self.event_rx))
    }

    // ========================================================================
    // Bridge lifecycle
    // ========================================================================

    /// Block until every lifecycle command queued so far has run
    ///
    /// Must not be called from an SDK callback running on the lifecycle worker.
    pub fn flush(&self) -> Result<()> {
        let (done, pending) = completion();
        self.ctx.submit(Command::Barrier(done));
        pending.wait()
    }

    /// Forget all entities, statuses, pending callbacks and subscriptions
    ///
    /// Pending requests resolve with [`BridgeError::Discarded`]. Native
    /// entities are not torn down.
    pub fn reset(&self) {
        self.ctx.reset();
        tracing::debug!("Bridge state reset");
    }

    /// Stop the lifecycle worker after it drains queued commands
    ///
    /// Later destroy-class requests resolve with
    /// [`BridgeError::WorkerUnavailable`]. Called on drop.
    pub fn shutdown(&self) {
        let Some(worker) = self.worker.lock().take() else {
            return;
        };

        self.ctx.lifecycle().close();

        if worker.thread().id() == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            tracing::warn!("Lifecycle worker panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.ctx.lifecycle().is_open()
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
