//! Shared bridge state
//!
//! One `BridgeContext` is built per [`Bridge`](crate::Bridge) and shared by
//! `Arc` between the facade, the lifecycle worker and (weakly) every SDK
//! handler. All fields are safe for concurrent access without external
//! locking.

use std::fmt;
use std::sync::Arc;

use dashmap::DashSet;
use entity_registry::Registry;

use crate::config::BridgeConfig;
use crate::correlator::CallbackCorrelator;
use crate::error::BridgeError;
use crate::events::EventRouter;
use crate::lifecycle::{Command, LifecycleQueue};
use crate::logging::DiagnosticsGate;
use crate::model::{ConnectionRecord, PublisherRecord, SessionRecord, StreamInfo, SubscriberRecord};
use crate::sdk::ViewRegistry;
use crate::status::ConnectionStatusTracker;

/// Registries, status, correlators and routing shared by all components
pub struct BridgeContext {
    config: BridgeConfig,

    sessions: Registry<SessionRecord>,
    publishers: Registry<PublisherRecord>,
    /// Keyed by stream id
    subscribers: Registry<SubscriberRecord>,
    connections: Registry<ConnectionRecord>,
    streams: Registry<StreamInfo>,
    /// Publisher ids the lifecycle worker has torn down
    retired_publishers: DashSet<String>,

    status: ConnectionStatusTracker,

    connect_callbacks: CallbackCorrelator,
    disconnect_callbacks: CallbackCorrelator,
    destroy_callbacks: CallbackCorrelator,

    router: EventRouter,
    diagnostics: DiagnosticsGate,
    views: Arc<dyn ViewRegistry>,
    lifecycle: LifecycleQueue,
}

impl BridgeContext {
    pub(crate) fn new(
        config: BridgeConfig,
        views: Arc<dyn ViewRegistry>,
        router: EventRouter,
        lifecycle: LifecycleQueue,
    ) -> Self {
        let diagnostics = DiagnosticsGate::new(config.diagnostics_enabled);

        Self {
            config,
            sessions: Registry::new(),
            publishers: Registry::new(),
            subscribers: Registry::new(),
            connections: Registry::new(),
            streams: Registry::new(),
            retired_publishers: DashSet::new(),
            status: ConnectionStatusTracker::new(),
            connect_callbacks: CallbackCorrelator::new("connect"),
            disconnect_callbacks: CallbackCorrelator::new("disconnect"),
            destroy_callbacks: CallbackCorrelator::new("destroy"),
            router,
            diagnostics,
            views,
            lifecycle,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Registry<SessionRecord> {
        &self.sessions
    }

    pub fn publishers(&self) -> &Registry<PublisherRecord> {
        &self.publishers
    }

    pub fn subscribers(&self) -> &Registry<SubscriberRecord> {
        &self.subscribers
    }

    pub fn connections(&self) -> &Registry<ConnectionRecord> {
        &self.connections
    }

    pub fn streams(&self) -> &Registry<StreamInfo> {
        &self.streams
    }

    pub(crate) fn retired_publishers(&self) -> &DashSet<String> {
        &self.retired_publishers
    }

    pub fn status(&self) -> &ConnectionStatusTracker {
        &self.status
    }

    pub fn connect_callbacks(&self) -> &CallbackCorrelator {
        &self.connect_callbacks
    }

    pub fn disconnect_callbacks(&self) -> &CallbackCorrelator {
        &self.disconnect_callbacks
    }

    pub fn destroy_callbacks(&self) -> &CallbackCorrelator {
        &self.destroy_callbacks
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn diagnostics(&self) -> &DiagnosticsGate {
        &self.diagnostics
    }

    pub(crate) fn views(&self) -> &dyn ViewRegistry {
        self.views.as_ref()
    }

    pub(crate) fn lifecycle(&self) -> &LifecycleQueue {
        &self.lifecycle
    }

    /// Queue a command on the lifecycle worker
    ///
    /// If the worker is gone, host-originated commands resolve with
    /// `WorkerUnavailable` rather than hanging.
    pub(crate) fn submit(&self, command: Command) {
        if let Err(command) = self.lifecycle.submit(command) {
            self.reject(command);
        }
    }

    fn reject(&self, command: Command) {
        tracing::warn!(command = command.label(), "Lifecycle worker unavailable, rejecting command");

        match command {
            Command::DestroyPublisher { publisher_id, .. } => {
                self.destroy_callbacks
                    .resolve(&publisher_id, Err(BridgeError::WorkerUnavailable));
            }
            Command::RemoveSubscriber { completion, .. } => {
                if let Some(completion) = completion {
                    completion.complete(Err(BridgeError::WorkerUnavailable));
                }
            }
            Command::DisconnectSession { completion, .. } | Command::Barrier(completion) => {
                completion.complete(Err(BridgeError::WorkerUnavailable));
            }
            Command::Shutdown => {}
        }
    }

    /// Forget every entity, status, pending callback and subscription
    ///
    /// Pending callbacks are dropped, not invoked.
    pub(crate) fn reset(&self) {
        self.sessions.clear();
        self.publishers.clear();
        self.subscribers.clear();
        self.connections.clear();
        self.streams.clear();
        self.retired_publishers.clear();
        self.status.clear();
        self.connect_callbacks.clear();
        self.disconnect_callbacks.clear();
        self.destroy_callbacks.clear();
        self.router.subscriptions().clear();
    }
}

impl fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeContext")
            .field("sessions", &self.sessions.len())
            .field("publishers", &self.publishers.len())
            .field("subscribers", &self.subscribers.len())
            .field("connections", &self.connections.len())
            .field("streams", &self.streams.len())
            .field("pending_connects", &self.connect_callbacks.len())
            .field("pending_disconnects", &self.disconnect_callbacks.len())
            .field("pending_destroys", &self.destroy_callbacks.len())
            .finish()
    }
}
