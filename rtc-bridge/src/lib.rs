//! Sync-first bridge between a native real-time media SDK and a host
//!
//! The native SDK raises notifications for sessions, publishers, subscribers,
//! connections and streams from its own threads, concurrently. The host is a
//! single-threaded consumer issuing one-shot requests. This crate sits between
//! the two:
//!
//! - **Registries** map host and SDK ids to live entities
//! - **Connection status** is tracked per session (0, 1, 3, 6)
//! - **Correlators** resolve connect, disconnect and destroy requests exactly once
//! - **The event router** turns notifications into filtered [`Envelope`]s
//! - **The lifecycle worker** serializes every teardown on one thread
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rtc_bridge::{Bridge, PublisherProperties, SessionOptions};
//!
//! let bridge = Bridge::new(Arc::new(my_sdk))?;
//! bridge.set_native_events(["s1:session:onConnected", "s1:session:onStreamReceived"]);
//!
//! bridge.init_session("api-key", "s1", SessionOptions::default())?;
//! bridge.connect("s1", "token").wait()?;
//!
//! bridge.init_publisher("p1", PublisherProperties::default()).wait()?;
//! bridge.publish("s1", "p1").wait()?;
//!
//! for event in bridge.events() {
//!     println!("{}: {}", event.qualified_name(), event.payload);
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//!   SDK threads                                          host thread
//!  ─────────────                                        ─────────────
//!  SessionHandler ──┐                                   Bridge methods
//!  PublisherHandler ├─► BridgeContext ◄─────────────────┤
//!  SubscriberHandler┘    │ registries / status          │
//!                        │ correlators ──► Pending<T> ──┤
//!                        │ EventRouter ──► mpsc ────────► EventIterator
//!                        └ LifecycleQueue ──► lifecycle worker (teardown)
//! ```

pub mod bridge;
pub mod completion;
pub mod config;
pub mod context;
pub mod correlator;
pub mod error;
pub mod events;
pub mod handlers;
mod lifecycle;
pub mod logging;
pub mod model;
pub mod sdk;
pub mod status;

pub use bridge::{Bridge, BridgeBuilder};
pub use completion::{completion, Completion, Pending};
pub use config::{BridgeConfig, PublisherProperties, SessionOptions, SignalRequest, SubscriberProperties};
pub use context::BridgeContext;
pub use correlator::CallbackCorrelator;
pub use error::{BridgeError, EntityKind, ErrorDomain, Result, SdkError};
pub use events::{Envelope, EventCategory, EventIterator};
pub use handlers::{PublisherHandler, SessionHandler, SubscriberHandler};
pub use logging::{init_logging, init_logging_from_env, LoggingMode};
pub use model::{
    AudioStats, CameraPosition, ConnectionInfo, Dimensions, SessionInfo, StreamInfo, VideoSource, VideoStats,
    VideoType,
};
pub use sdk::{MediaSdk, NativePublisher, NativeSession, NativeSubscriber, NoopViews, ViewRegistry};
pub use status::{ConnectionStatus, ConnectionStatusTracker};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bridge, BridgeConfig, BridgeError, CameraPosition, ConnectionStatus, Envelope, MediaSdk, Pending,
        PublisherProperties, SessionOptions, SignalRequest, StreamInfo, SubscriberProperties,
    };
}
