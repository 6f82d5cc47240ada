//! Entity data model
//!
//! Plain data mirrored from the SDK (`StreamInfo`, `ConnectionInfo`, stats)
//! and the records the bridge keeps per live entity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SessionOptions;
use crate::sdk::{NativePublisher, NativeSession, NativeSubscriber};
use crate::status::ConnectionStatus;

/// Video type of a stream as reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Camera,
    Screen,
    Custom,
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VideoType::Camera => "camera",
            VideoType::Screen => "screen",
            VideoType::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Capture source of a publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    #[default]
    Camera,
    Screen,
}

/// Which camera a publisher captures from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    #[default]
    Front,
    Back,
}

impl CameraPosition {
    /// The other camera
    pub fn toggled(self) -> Self {
        match self {
            CameraPosition::Front => CameraPosition::Back,
            CameraPosition::Back => CameraPosition::Front,
        }
    }
}

/// Video frame dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Snapshot of an SDK stream
///
/// Stored in the stream registry under `stream_id` and attached to events as
/// the nested `stream` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub stream_id: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub name: String,
    pub has_audio: bool,
    pub has_video: bool,
    #[serde(flatten)]
    pub dimensions: Dimensions,
    pub video_type: VideoType,
}

impl StreamInfo {
    /// A camera stream with audio and video and no dimensions yet
    pub fn new(stream_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            session_id: session_id.into(),
            connection_id: None,
            name: String::new(),
            has_audio: true,
            has_video: true,
            dimensions: Dimensions::default(),
            video_type: VideoType::Camera,
        }
    }

    pub fn with_connection(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = Some(connection_id.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Dimensions::new(width, height);
        self
    }

    pub fn with_video_type(mut self, video_type: VideoType) -> Self {
        self.video_type = video_type;
        self
    }

    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A remote or local participant connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub connection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    pub data: String,
}

impl ConnectionInfo {
    pub fn new(connection_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            connection_id: connection_id.into(),
            creation_time: None,
            data: data.into(),
        }
    }
}

/// Subscriber audio network statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStats {
    pub audio_packets_lost: u64,
    pub audio_packets_received: u64,
    pub audio_bytes_received: u64,
    pub timestamp: f64,
}

/// Subscriber video network statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub video_packets_lost: u64,
    pub video_packets_received: u64,
    pub video_bytes_received: u64,
    pub timestamp: f64,
}

/// Answer to `get_session_info`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub connection_status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,
}

// ============================================================================
// Registry records
// ============================================================================

/// A session created by `init_session`
#[derive(Clone)]
pub struct SessionRecord {
    pub native: Arc<dyn NativeSession>,
    pub api_key: String,
    pub options: SessionOptions,
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("api_key", &self.api_key)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A publisher created by `init_publisher`
///
/// `session_id` is set once the publisher has been published into a session.
#[derive(Clone)]
pub struct PublisherRecord {
    pub native: Arc<dyn NativePublisher>,
    pub video_source: VideoSource,
    pub camera_position: CameraPosition,
    pub session_id: Option<String>,
    pub publish_audio: bool,
    pub publish_video: bool,
}

impl fmt::Debug for PublisherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherRecord")
            .field("video_source", &self.video_source)
            .field("camera_position", &self.camera_position)
            .field("session_id", &self.session_id)
            .field("publish_audio", &self.publish_audio)
            .field("publish_video", &self.publish_video)
            .finish_non_exhaustive()
    }
}

/// A subscriber created by `subscribe_to_stream`, keyed by stream id
#[derive(Clone)]
pub struct SubscriberRecord {
    pub native: Arc<dyn NativeSubscriber>,
    pub session_id: String,
    pub subscribe_to_audio: bool,
    pub subscribe_to_video: bool,
}

impl fmt::Debug for SubscriberRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRecord")
            .field("session_id", &self.session_id)
            .field("subscribe_to_audio", &self.subscribe_to_audio)
            .field("subscribe_to_video", &self.subscribe_to_video)
            .finish_non_exhaustive()
    }
}

/// A connection together with the session that reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub info: ConnectionInfo,
    pub session_id: String,
}
