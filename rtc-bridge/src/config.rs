//! Bridge configuration and pre-validated host request structs
//!
//! Host structs derive `Deserialize` with camelCase names so a host can hand
//! over its JSON options verbatim. Missing fields take the defaults below.

use serde::Deserialize;

use crate::model::{CameraPosition, VideoSource};

/// Session error codes treated as connection failures
///
/// 1006 connection failed, 1021 connection timed out, 1023 connection refused.
pub const DEFAULT_CONNECTION_FAILURE_CODES: [i32; 3] = [1006, 1021, 1023];

/// Default name of the lifecycle worker thread
pub const DEFAULT_WORKER_THREAD_NAME: &str = "rtc-bridge-lifecycle";

/// Configuration for a [`Bridge`](crate::Bridge)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Session error codes that move a session to `ConnectionFailed`
    pub connection_failure_codes: Vec<i32>,

    /// Initial state of the per-event diagnostics gate
    pub diagnostics_enabled: bool,

    /// Name given to the lifecycle worker thread
    pub worker_thread_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connection_failure_codes: DEFAULT_CONNECTION_FAILURE_CODES.to_vec(),
            diagnostics_enabled: false,
            worker_thread_name: DEFAULT_WORKER_THREAD_NAME.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn with_connection_failure_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.connection_failure_codes = codes.into_iter().collect();
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics_enabled = enabled;
        self
    }

    pub fn with_worker_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = name.into();
        self
    }

    /// Whether an SDK session error code is a connection failure
    pub fn is_connection_failure(&self, code: i32) -> bool {
        self.connection_failure_codes.contains(&code)
    }
}

/// Options for `init_session`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Layout flag: which view renders on top
    pub android_on_top: String,
    /// Layout flag: z-order of the view layer
    pub android_z_order: String,
    pub use_texture_views: bool,
    pub is_camera2_capable: bool,
    pub connection_events_suppressed: bool,
    pub ip_whitelist: bool,
    pub proxy_url: Option<String>,
}

/// Properties for `init_publisher`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublisherProperties {
    pub name: String,
    pub video_source: VideoSource,
    pub camera_position: CameraPosition,
    pub audio_track: bool,
    pub video_track: bool,
    pub audio_bitrate: u32,
    /// Capture resolution label, `LOW`, `MEDIUM` or `HIGH`
    pub resolution: String,
    pub frame_rate: u32,
    pub audio_fallback_enabled: bool,
    pub publish_audio: bool,
    pub publish_video: bool,
}

impl Default for PublisherProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            video_source: VideoSource::Camera,
            camera_position: CameraPosition::Front,
            audio_track: true,
            video_track: true,
            audio_bitrate: 40_000,
            resolution: "MEDIUM".to_string(),
            frame_rate: 30,
            audio_fallback_enabled: true,
            publish_audio: true,
            publish_video: true,
        }
    }
}

impl PublisherProperties {
    /// Frame rate as the SDK's capture-rate label, e.g. `FPS_30`
    pub fn frame_rate_label(&self) -> String {
        format!("FPS_{}", self.frame_rate)
    }
}

/// Properties for `subscribe_to_stream`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriberProperties {
    pub subscribe_to_audio: bool,
    pub subscribe_to_video: bool,
}

impl Default for SubscriberProperties {
    fn default() -> Self {
        Self {
            subscribe_to_audio: true,
            subscribe_to_video: true,
        }
    }
}

/// A signal to send through a session
///
/// `to` names a connection id; when it is absent or unknown the signal is
/// broadcast to the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SignalRequest {
    #[serde(rename = "type")]
    pub signal_type: String,
    pub data: String,
    pub to: Option<String>,
}

impl SignalRequest {
    pub fn broadcast(signal_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            signal_type: signal_type.into(),
            data: data.into(),
            to: None,
        }
    }

    pub fn to(mut self, connection_id: impl Into<String>) -> Self {
        self.to = Some(connection_id.into());
        self
    }
}
