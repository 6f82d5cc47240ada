//! Teardown sequences run on the lifecycle worker

use crate::completion::Completion;
use crate::context::BridgeContext;
use crate::error::{BridgeError, EntityKind};
use crate::logging::diag;

/// Tear down a publisher
///
/// 1. Remove it from the registry and mark it retired; if it was already
///    gone, stop here
/// 2. Unpublish it from its session, if attached
/// 3. Stop its capture source
/// 4. Resolve a pending destroy callback
/// 5. Clear and drop its view container
///
/// Returns `false` when the publisher was already gone.
pub(crate) fn destroy_publisher(ctx: &BridgeContext, publisher_id: &str) -> bool {
    let Some(publisher) = ctx.publishers().remove(publisher_id) else {
        tracing::debug!(publisher_id, "Publisher already torn down");
        return false;
    };
    ctx.retired_publishers().insert(publisher_id.to_string());

    if let Some(session_id) = publisher.session_id.as_deref() {
        match ctx.sessions().get(session_id) {
            Some(session) => session.native.unpublish(publisher.native.as_ref()),
            None => tracing::debug!(publisher_id, session_id, "Session gone before unpublish"),
        }
    }

    publisher.native.stop_capture();
    ctx.destroy_callbacks().resolve(publisher_id, Ok(()));
    ctx.views().clear_and_drop(publisher_id);

    diag!(ctx.diagnostics(), "destroyPublisher: Publisher destroyed: {}", publisher_id);
    true
}

/// Tear down the subscriber for `stream_id`
///
/// The view container and stream record are dropped even when no subscriber
/// was registered. Returns whether a subscriber was removed.
pub(crate) fn remove_subscriber(ctx: &BridgeContext, stream_id: &str) -> bool {
    let removed = ctx.subscribers().remove(stream_id).is_some();
    ctx.views().clear_and_drop(stream_id);
    ctx.streams().remove(stream_id);

    diag!(ctx.diagnostics(), "removeSubscriber: Subscriber removed for stream: {} ({})", stream_id, removed);
    removed
}

/// Start a host-requested disconnect
///
/// The callback is registered before the SDK is asked to disconnect and fires
/// from the SDK's disconnected notification.
pub(crate) fn disconnect_session(ctx: &BridgeContext, session_id: &str, completion: Completion<()>) {
    let Some(session) = ctx.sessions().get(session_id) else {
        completion.complete(Err(BridgeError::not_found(EntityKind::Session, session_id)));
        return;
    };

    ctx.disconnect_callbacks().register(session_id, completion);
    session.native.disconnect();
}

/// Drop session state after the SDK confirmed a disconnect
///
/// Runs inline on the notifying thread, so a host that re-initialises the id
/// after `onDisconnected` keeps its new session. Removes the session and its
/// connections, discards a still-pending connect callback and resolves the
/// disconnect callback.
pub(crate) fn finish_session_disconnect(ctx: &BridgeContext, session_id: &str) {
    ctx.sessions().remove(session_id);

    let connections = ctx
        .connections()
        .remove_where(|_, connection| connection.session_id == session_id);

    if ctx.connect_callbacks().discard(session_id) {
        tracing::debug!(session_id, "Discarded pending connect callback");
    }
    ctx.disconnect_callbacks().resolve(session_id, Ok(()));

    tracing::debug!(
        session_id,
        connections = connections.len(),
        "Session state dropped after disconnect"
    );
}
