//! Outbound event envelope

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Entity category an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Session,
    Publisher,
    Subscriber,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Session => "session",
            EventCategory::Publisher => "publisher",
            EventCategory::Subscriber => "subscriber",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event handed to the host
///
/// Session and publisher events are scoped by the emitting entity's id.
/// Subscriber events carry no scope; hosts tell subscribers apart through the
/// nested `stream` payload field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub scope_id: Option<String>,
    pub category: EventCategory,
    pub name: &'static str,
    pub payload: Value,
}

impl Envelope {
    pub fn scoped(
        scope_id: impl Into<String>,
        category: EventCategory,
        name: &'static str,
        payload: Value,
    ) -> Self {
        Self {
            scope_id: Some(scope_id.into()),
            category,
            name,
            payload,
        }
    }

    pub fn unscoped(category: EventCategory, name: &'static str, payload: Value) -> Self {
        Self {
            scope_id: None,
            category,
            name,
            payload,
        }
    }

    /// `<scopeId>:<category>:<name>` or `<category>:<name>`
    pub fn qualified_name(&self) -> String {
        qualified_name(self.scope_id.as_deref(), self.category, self.name)
    }
}

/// Build the fully-qualified name subscriptions are matched against
pub fn qualified_name(scope_id: Option<&str>, category: EventCategory, name: &str) -> String {
    match scope_id {
        Some(scope) => format!("{}:{}:{}", scope, category, name),
        None => format!("{}:{}", category, name),
    }
}
