//! Per-category SDK notification handlers
//!
//! Each handler is bound to one entity id and given to the SDK when that
//! entity is created. Handlers are cheap to clone and may be called from any
//! thread. They hold the bridge context weakly: once the bridge is dropped,
//! notifications are ignored.

mod publisher;
mod session;
mod subscriber;

use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

pub use publisher::PublisherHandler;
pub use session::SessionHandler;
pub use subscriber::SubscriberHandler;

use crate::context::BridgeContext;

fn upgrade(ctx: &Weak<BridgeContext>, entity_id: &str) -> Option<Arc<BridgeContext>> {
    let ctx = ctx.upgrade();
    if ctx.is_none() {
        tracing::trace!(entity_id, "Bridge dropped, ignoring SDK notification");
    }
    ctx
}

/// `{ stream? }` with the current stream record if it is still registered
fn stream_map(ctx: &BridgeContext, stream_id: &str) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(stream) = ctx.streams().get(stream_id) {
        map.insert("stream".to_string(), stream.to_payload());
    }
    map
}
