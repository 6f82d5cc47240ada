//! Subscriber notifications
//!
//! Subscriber events are emitted unscoped (`subscriber:<name>`). Hosts with
//! several subscribers tell them apart by the nested `stream` field.

use std::sync::{Arc, Weak};

use serde_json::{json, Map, Value};

use super::{stream_map, upgrade};
use crate::context::BridgeContext;
use crate::error::SdkError;
use crate::events::names;
use crate::logging::diag;
use crate::model::{AudioStats, VideoStats};

/// Receives notifications for the subscriber of one stream
#[derive(Debug, Clone)]
pub struct SubscriberHandler {
    ctx: Weak<BridgeContext>,
    stream_id: String,
}

impl SubscriberHandler {
    pub(crate) fn new(ctx: &Arc<BridgeContext>, stream_id: impl Into<String>) -> Self {
        Self {
            ctx: Arc::downgrade(ctx),
            stream_id: stream_id.into(),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Emit `name` with `{stream?}` plus `extra`
    fn emit(&self, name: &'static str, extra: Option<(&str, Value)>) -> Option<Arc<BridgeContext>> {
        let ctx = upgrade(&self.ctx, &self.stream_id)?;

        let mut payload: Map<String, Value> = stream_map(&ctx, &self.stream_id);
        if let Some((key, value)) = extra {
            payload.insert(key.to_string(), value);
        }
        ctx.router().subscriber(name, Value::Object(payload));

        Some(ctx)
    }

    pub fn on_connected(&self) {
        if let Some(ctx) = self.emit(names::ON_CONNECTED, None) {
            diag!(ctx.diagnostics(), "onConnected: Subscriber connected. Stream: {}", self.stream_id);
        }
    }

    pub fn on_disconnected(&self) {
        if let Some(ctx) = self.emit(names::ON_DISCONNECTED, None) {
            diag!(ctx.diagnostics(), "onDisconnected: Subscriber disconnected. Stream: {}", self.stream_id);
        }
    }

    pub fn on_reconnected(&self) {
        if let Some(ctx) = self.emit(names::ON_RECONNECTED, None) {
            diag!(ctx.diagnostics(), "onReconnected: Subscriber reconnected. Stream: {}", self.stream_id);
        }
    }

    pub fn on_error(&self, error: SdkError) {
        if let Some(ctx) = self.emit(names::ON_ERROR, Some(("error", error.to_payload()))) {
            diag!(ctx.diagnostics(), "onError: {} : {} - {}", error.domain, error.code, error.message);
        }
    }

    pub fn on_audio_stats(&self, stats: AudioStats) {
        self.emit(names::ON_AUDIO_STATS, Some(("audioStats", json!(stats))));
    }

    pub fn on_video_stats(&self, stats: VideoStats) {
        self.emit(names::ON_VIDEO_STATS, Some(("videoStats", json!(stats))));
    }

    pub fn on_audio_level_updated(&self, audio_level: f32) {
        self.emit(
            names::ON_AUDIO_LEVEL_UPDATED,
            Some(("audioLevel", Value::String(audio_level.to_string()))),
        );
    }

    pub fn on_video_disabled(&self, reason: &str) {
        if let Some(ctx) = self.emit(names::ON_VIDEO_DISABLED, Some(("reason", json!(reason)))) {
            diag!(ctx.diagnostics(), "onVideoDisabled: {}", reason);
        }
    }

    pub fn on_video_enabled(&self, reason: &str) {
        if let Some(ctx) = self.emit(names::ON_VIDEO_ENABLED, Some(("reason", json!(reason)))) {
            diag!(ctx.diagnostics(), "onVideoEnabled: {}", reason);
        }
    }

    pub fn on_video_disable_warning(&self) {
        if let Some(ctx) = self.emit(names::ON_VIDEO_DISABLE_WARNING, None) {
            diag!(ctx.diagnostics(), "onVideoDisableWarning");
        }
    }

    pub fn on_video_disable_warning_lifted(&self) {
        if let Some(ctx) = self.emit(names::ON_VIDEO_DISABLE_WARNING_LIFTED, None) {
            diag!(ctx.diagnostics(), "onVideoDisableWarningLifted");
        }
    }

    pub fn on_video_data_received(&self) {
        self.emit(names::ON_VIDEO_DATA_RECEIVED, None);
    }
}
