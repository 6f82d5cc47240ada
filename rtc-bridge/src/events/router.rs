//! Filtered hand-off of envelopes to the host delivery channel

use std::sync::mpsc;

use serde_json::Value;

use super::envelope::{Envelope, EventCategory};
use super::subscriptions::EventSubscriptions;

/// Routes envelopes to the host if their qualified name is subscribed
///
/// Delivery is a single send on the host channel, performed on the calling
/// thread. The router never retries and never reorders.
#[derive(Debug)]
pub struct EventRouter {
    subscriptions: EventSubscriptions,
    sink: mpsc::Sender<Envelope>,
}

impl EventRouter {
    pub fn new(sink: mpsc::Sender<Envelope>) -> Self {
        Self {
            subscriptions: EventSubscriptions::new(),
            sink,
        }
    }

    pub fn subscriptions(&self) -> &EventSubscriptions {
        &self.subscriptions
    }

    /// Deliver `envelope` if subscribed; returns whether it was handed off
    pub fn dispatch(&self, envelope: Envelope) -> bool {
        let qualified = envelope.qualified_name();
        if !self.subscriptions.is_subscribed(&qualified) {
            tracing::trace!(event = %qualified, "Dropping unsubscribed event");
            return false;
        }

        match self.sink.send(envelope) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(event = %qualified, "Event receiver dropped, event not delivered");
                false
            }
        }
    }

    pub fn session(&self, session_id: &str, name: &'static str, payload: Value) -> bool {
        self.dispatch(Envelope::scoped(session_id, EventCategory::Session, name, payload))
    }

    pub fn publisher(&self, publisher_id: &str, name: &'static str, payload: Value) -> bool {
        self.dispatch(Envelope::scoped(publisher_id, EventCategory::Publisher, name, payload))
    }

    pub fn subscriber(&self, name: &'static str, payload: Value) -> bool {
        self.dispatch(Envelope::unscoped(EventCategory::Subscriber, name, payload))
    }
}
