//! Outbound events: envelopes, subscription filtering and host delivery

pub mod envelope;
pub mod iter;
pub mod router;
pub mod subscriptions;

pub use envelope::{qualified_name, Envelope, EventCategory};
pub use iter::{EventIterator, TimeoutIter, TryIter};
pub use router::EventRouter;
pub use subscriptions::{EventSubscriptions, SubscriptionSet};

/// Outbound event names
pub mod names {
    pub const ON_CONNECTED: &str = "onConnected";
    pub const ON_DISCONNECTED: &str = "onDisconnected";
    pub const ON_RECONNECTING: &str = "onReconnecting";
    pub const ON_RECONNECTED: &str = "onReconnected";
    pub const ON_ERROR: &str = "onError";
    pub const ON_STREAM_RECEIVED: &str = "onStreamReceived";
    pub const ON_STREAM_DROPPED: &str = "onStreamDropped";
    pub const ON_STREAM_CREATED: &str = "onStreamCreated";
    pub const ON_STREAM_DESTROYED: &str = "onStreamDestroyed";
    pub const ON_STREAM_PROPERTY_CHANGED: &str = "onStreamPropertyChanged";
    pub const ON_CONNECTION_CREATED: &str = "onConnectionCreated";
    pub const ON_CONNECTION_DESTROYED: &str = "onConnectionDestroyed";
    pub const ON_ARCHIVE_STARTED: &str = "onArchiveStarted";
    pub const ON_ARCHIVE_STOPPED: &str = "onArchiveStopped";
    pub const ON_SIGNAL_RECEIVED: &str = "onSignalReceived";
    pub const ON_AUDIO_LEVEL_UPDATED: &str = "onAudioLevelUpdated";
    pub const ON_AUDIO_STATS: &str = "onAudioStats";
    pub const ON_VIDEO_STATS: &str = "onVideoStats";
    pub const ON_VIDEO_DISABLED: &str = "onVideoDisabled";
    pub const ON_VIDEO_ENABLED: &str = "onVideoEnabled";
    pub const ON_VIDEO_DISABLE_WARNING: &str = "onVideoDisableWarning";
    pub const ON_VIDEO_DISABLE_WARNING_LIFTED: &str = "onVideoDisableWarningLifted";
    pub const ON_VIDEO_DATA_RECEIVED: &str = "onVideoDataReceived";
}
