//! Publisher notifications

use std::sync::{Arc, Weak};

use serde_json::Value;

use super::upgrade;
use crate::context::BridgeContext;
use crate::error::SdkError;
use crate::events::names;
use crate::lifecycle::{Command, Origin};
use crate::logging::diag;
use crate::model::StreamInfo;

/// Receives notifications for one publisher
#[derive(Debug, Clone)]
pub struct PublisherHandler {
    ctx: Weak<BridgeContext>,
    publisher_id: String,
}

impl PublisherHandler {
    pub(crate) fn new(ctx: &Arc<BridgeContext>, publisher_id: impl Into<String>) -> Self {
        Self {
            ctx: Arc::downgrade(ctx),
            publisher_id: publisher_id.into(),
        }
    }

    pub fn publisher_id(&self) -> &str {
        &self.publisher_id
    }

    fn context(&self) -> Option<Arc<BridgeContext>> {
        upgrade(&self.ctx, &self.publisher_id)
    }

    pub fn on_stream_created(&self, stream: StreamInfo) {
        let Some(ctx) = self.context() else { return };

        let payload = stream.to_payload();
        let stream_id = stream.stream_id.clone();
        ctx.streams().put(stream_id.clone(), stream);
        ctx.router()
            .publisher(&self.publisher_id, names::ON_STREAM_CREATED, payload);

        diag!(ctx.diagnostics(), "onStreamCreated: Publisher Stream Created. Own stream {}", stream_id);
    }

    /// Drops the stream record, emits, then queues the publisher teardown
    ///
    /// The teardown resolves a pending host destroy callback. If the host
    /// already destroyed this publisher the teardown is a no-op.
    pub fn on_stream_destroyed(&self, stream: StreamInfo) {
        let Some(ctx) = self.context() else { return };

        ctx.streams().remove(&stream.stream_id);
        ctx.router()
            .publisher(&self.publisher_id, names::ON_STREAM_DESTROYED, stream.to_payload());
        ctx.submit(Command::DestroyPublisher {
            publisher_id: self.publisher_id.clone(),
            origin: Origin::Sdk,
        });

        diag!(
            ctx.diagnostics(),
            "onStreamDestroyed: Publisher Stream Destroyed. Own stream {}",
            stream.stream_id
        );
    }

    pub fn on_error(&self, error: SdkError) {
        let Some(ctx) = self.context() else { return };

        ctx.router()
            .publisher(&self.publisher_id, names::ON_ERROR, error.to_payload());

        diag!(ctx.diagnostics(), "onError: {} : {} - {}", error.domain, error.code, error.message);
    }

    /// The level is delivered as a string
    pub fn on_audio_level_updated(&self, audio_level: f32) {
        let Some(ctx) = self.context() else { return };

        ctx.router().publisher(
            &self.publisher_id,
            names::ON_AUDIO_LEVEL_UPDATED,
            Value::String(audio_level.to_string()),
        );
    }
}
