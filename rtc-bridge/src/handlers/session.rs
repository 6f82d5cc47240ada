//! Session notifications

use std::sync::{Arc, Weak};

use serde_json::{json, Value};

use super::upgrade;
use crate::context::BridgeContext;
use crate::error::{BridgeError, SdkError};
use crate::events::names;
use crate::lifecycle::{finish_session_disconnect, Command};
use crate::logging::diag;
use crate::model::{ConnectionInfo, ConnectionRecord, Dimensions, StreamInfo, VideoType};
use crate::status::{StatusEvent, Transition};

/// Receives notifications for one session
#[derive(Debug, Clone)]
pub struct SessionHandler {
    ctx: Weak<BridgeContext>,
    session_id: String,
}

impl SessionHandler {
    pub(crate) fn new(ctx: &Arc<BridgeContext>, session_id: impl Into<String>) -> Self {
        Self {
            ctx: Arc::downgrade(ctx),
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn context(&self) -> Option<Arc<BridgeContext>> {
        upgrade(&self.ctx, &self.session_id)
    }

    fn emit(&self, ctx: &BridgeContext, name: &'static str, payload: Value) {
        ctx.router().session(&self.session_id, name, payload);
    }

    /// `{sessionId, connection?}` for the local participant
    fn session_payload(&self, ctx: &BridgeContext) -> Value {
        let connection = ctx
            .sessions()
            .get(&self.session_id)
            .and_then(|session| session.native.local_connection());

        match connection {
            Some(connection) => json!({ "sessionId": self.session_id, "connection": connection }),
            None => json!({ "sessionId": self.session_id }),
        }
    }

    pub fn on_connected(&self) {
        let Some(ctx) = self.context() else { return };

        let transition = ctx.status().apply(&self.session_id, StatusEvent::Connected);
        if let Transition::Ignored { current } = transition {
            tracing::debug!(session_id = %self.session_id, %current, "Ignoring connected notification");
        }
        ctx.connect_callbacks().resolve(&self.session_id, Ok(()));
        self.emit(&ctx, names::ON_CONNECTED, self.session_payload(&ctx));

        diag!(ctx.diagnostics(), "onConnected: Connected to session: {}", self.session_id);
    }

    /// Resets status and drops session state before emitting
    ///
    /// The payload is captured first so it still carries the local connection.
    pub fn on_disconnected(&self) {
        let Some(ctx) = self.context() else { return };

        ctx.status().apply(&self.session_id, StatusEvent::Disconnected);
        let payload = self.session_payload(&ctx);
        finish_session_disconnect(&ctx, &self.session_id);
        self.emit(&ctx, names::ON_DISCONNECTED, payload);

        diag!(ctx.diagnostics(), "onDisconnected: Disconnected from session: {}", self.session_id);
    }

    pub fn on_error(&self, error: SdkError) {
        let Some(ctx) = self.context() else { return };

        if ctx.config().is_connection_failure(error.code) {
            ctx.status().apply(&self.session_id, StatusEvent::ConnectionFailed);
            ctx.connect_callbacks()
                .resolve(&self.session_id, Err(BridgeError::ConnectionFailure(error.clone())));
        }
        self.emit(&ctx, names::ON_ERROR, error.to_payload());

        diag!(ctx.diagnostics(), "onError: {} : {} - {}", error.domain, error.code, error.message);
    }

    pub fn on_reconnecting(&self) {
        let Some(ctx) = self.context() else { return };

        self.apply_reconnect(&ctx, StatusEvent::ReconnectStarted);
        self.emit(&ctx, names::ON_RECONNECTING, Value::Null);

        diag!(ctx.diagnostics(), "Reconnecting");
    }

    pub fn on_reconnected(&self) {
        let Some(ctx) = self.context() else { return };

        self.apply_reconnect(&ctx, StatusEvent::Reconnected);
        self.emit(&ctx, names::ON_RECONNECTED, Value::Null);

        diag!(ctx.diagnostics(), "Reconnected");
    }

    fn apply_reconnect(&self, ctx: &BridgeContext, event: StatusEvent) {
        if let Transition::Ignored { current } = ctx.status().apply(&self.session_id, event) {
            tracing::debug!(
                session_id = %self.session_id,
                ?event,
                %current,
                "Ignoring invalid reconnect transition"
            );
        }
    }

    pub fn on_stream_received(&self, stream: StreamInfo) {
        let Some(ctx) = self.context() else { return };

        let payload = stream.to_payload();
        let stream_id = stream.stream_id.clone();
        ctx.streams().put(stream_id.clone(), stream);
        self.emit(&ctx, names::ON_STREAM_RECEIVED, payload);

        diag!(
            ctx.diagnostics(),
            "onStreamReceived: New Stream Received {} in session: {}",
            stream_id,
            self.session_id
        );
    }

    /// Emits, then queues removal of the stream's subscriber
    pub fn on_stream_dropped(&self, stream: StreamInfo) {
        let Some(ctx) = self.context() else { return };

        self.emit(&ctx, names::ON_STREAM_DROPPED, stream.to_payload());
        ctx.submit(Command::RemoveSubscriber {
            stream_id: stream.stream_id.clone(),
            completion: None,
        });

        diag!(
            ctx.diagnostics(),
            "onStreamDropped: Stream Dropped: {} in session: {}",
            stream.stream_id,
            self.session_id
        );
    }

    pub fn on_connection_created(&self, connection: ConnectionInfo) {
        let Some(ctx) = self.context() else { return };

        let connection_id = connection.connection_id.clone();
        ctx.connections().put(
            connection_id.clone(),
            ConnectionRecord {
                info: connection.clone(),
                session_id: self.session_id.clone(),
            },
        );
        self.emit(&ctx, names::ON_CONNECTION_CREATED, self.connection_payload(&connection));

        diag!(ctx.diagnostics(), "onConnectionCreated: Connection Created: {}", connection_id);
    }

    pub fn on_connection_destroyed(&self, connection: ConnectionInfo) {
        let Some(ctx) = self.context() else { return };

        ctx.connections().remove(&connection.connection_id);
        self.emit(&ctx, names::ON_CONNECTION_DESTROYED, self.connection_payload(&connection));

        diag!(
            ctx.diagnostics(),
            "onConnectionDestroyed: Connection Destroyed: {}",
            connection.connection_id
        );
    }

    fn connection_payload(&self, connection: &ConnectionInfo) -> Value {
        let mut payload = serde_json::to_value(connection).unwrap_or_else(|_| json!({}));
        if let Value::Object(map) = &mut payload {
            map.insert("sessionId".to_string(), json!(self.session_id));
        }
        payload
    }

    pub fn on_archive_started(&self, archive_id: &str, name: &str) {
        let Some(ctx) = self.context() else { return };

        self.emit(
            &ctx,
            names::ON_ARCHIVE_STARTED,
            json!({ "archiveId": archive_id, "name": name, "sessionId": self.session_id }),
        );

        diag!(ctx.diagnostics(), "Archive Started: {}", archive_id);
    }

    pub fn on_archive_stopped(&self, archive_id: &str) {
        let Some(ctx) = self.context() else { return };

        self.emit(
            &ctx,
            names::ON_ARCHIVE_STOPPED,
            json!({ "archiveId": archive_id, "name": "", "sessionId": self.session_id }),
        );

        diag!(ctx.diagnostics(), "Archive Stopped: {}", archive_id);
    }

    /// `connection` is the sender's connection, absent for server-sent signals
    pub fn on_signal_received(&self, signal_type: &str, data: &str, connection: Option<&ConnectionInfo>) {
        let Some(ctx) = self.context() else { return };

        let mut payload = json!({ "type": signal_type, "data": data, "sessionId": self.session_id });
        if let (Some(connection), Value::Object(map)) = (connection, &mut payload) {
            map.insert("connectionId".to_string(), json!(connection.connection_id));
        }
        self.emit(&ctx, names::ON_SIGNAL_RECEIVED, payload);

        diag!(ctx.diagnostics(), "onSignalReceived: {} in session: {}", signal_type, self.session_id);
    }

    pub fn on_stream_has_audio_changed(&self, stream: StreamInfo, has_audio: bool) {
        let Some(ctx) = self.context() else { return };

        ctx.streams().update(&stream.stream_id, |s| s.has_audio = has_audio);
        self.emit_property_changed(&ctx, "hasAudio", json!(!has_audio), json!(has_audio), stream);

        diag!(ctx.diagnostics(), "onStreamHasAudioChanged");
    }

    pub fn on_stream_has_video_changed(&self, stream: StreamInfo, has_video: bool) {
        let Some(ctx) = self.context() else { return };

        ctx.streams().update(&stream.stream_id, |s| s.has_video = has_video);
        self.emit_property_changed(&ctx, "hasVideo", json!(!has_video), json!(has_video), stream);

        diag!(ctx.diagnostics(), "onStreamHasVideoChanged");
    }

    /// Old dimensions come from the registered stream record, `{}` if none
    pub fn on_stream_video_dimensions_changed(&self, stream: StreamInfo, dimensions: Dimensions) {
        let Some(ctx) = self.context() else { return };

        let mut old = None;
        ctx.streams().update(&stream.stream_id, |s| {
            old = Some(s.dimensions);
            s.dimensions = dimensions;
        });

        let old_value = old.map(|d| json!(d)).unwrap_or_else(|| json!({}));
        self.emit_property_changed(&ctx, "videoDimensions", old_value, json!(dimensions), stream);

        diag!(ctx.diagnostics(), "onStreamVideoDimensionsChanged");
    }

    /// Old type comes from the registered stream record, else the notification
    pub fn on_stream_video_type_changed(&self, stream: StreamInfo, video_type: VideoType) {
        let Some(ctx) = self.context() else { return };

        let mut old = stream.video_type;
        ctx.streams().update(&stream.stream_id, |s| {
            old = s.video_type;
            s.video_type = video_type;
        });

        self.emit_property_changed(&ctx, "videoType", json!(old), json!(video_type), stream);

        diag!(ctx.diagnostics(), "onStreamVideoTypeChanged");
    }

    fn emit_property_changed(
        &self,
        ctx: &BridgeContext,
        property: &str,
        old_value: Value,
        new_value: Value,
        stream: StreamInfo,
    ) {
        let current = ctx.streams().get(&stream.stream_id).unwrap_or(stream);
        let payload = json!({
            "changedProperty": property,
            "oldValue": old_value,
            "newValue": new_value,
            "stream": current.to_payload(),
            "sessionId": self.session_id,
        });
        self.emit(ctx, names::ON_STREAM_PROPERTY_CHANGED, payload);
    }
}
