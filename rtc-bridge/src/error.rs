//! Error types for the bridge
//!
//! Absence of an entity is modelled as [`BridgeError::NotFound`] and delivered
//! through the request's completion, never raised on the calling thread.
//! SDK failures are carried verbatim in [`SdkError`].

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Kind of entity a lookup was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Session,
    Publisher,
    Subscriber,
    Stream,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Session => "session",
            EntityKind::Publisher => "publisher",
            EntityKind::Subscriber => "subscriber",
            EntityKind::Stream => "stream",
        };
        f.write_str(name)
    }
}

/// Domain an SDK error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorDomain {
    #[serde(rename = "SessionErrorDomain")]
    Session,
    #[serde(rename = "PublisherErrorDomain")]
    Publisher,
    #[serde(rename = "SubscriberErrorDomain")]
    Subscriber,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorDomain::Session => "SessionErrorDomain",
            ErrorDomain::Publisher => "PublisherErrorDomain",
            ErrorDomain::Subscriber => "SubscriberErrorDomain",
        };
        f.write_str(name)
    }
}

/// Error reported by the native media SDK
///
/// The domain, code and message are passed through to the host unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{domain} ({code}): {message}")]
#[serde(rename_all = "camelCase")]
pub struct SdkError {
    pub domain: ErrorDomain,
    pub code: i32,
    pub message: String,
}

impl SdkError {
    pub fn new(domain: ErrorDomain, code: i32, message: impl Into<String>) -> Self {
        Self {
            domain,
            code,
            message: message.into(),
        }
    }

    /// Host payload for error events: `{code, domain, message}`
    pub fn to_payload(&self) -> Value {
        json!({
            "code": self.code,
            "domain": self.domain,
            "message": self.message,
        })
    }
}

/// Errors that can resolve a host request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// No entity registered under the given id
    #[error("Could not find native {kind} instance for id '{id}'")]
    NotFound { kind: EntityKind, id: String },

    /// The SDK rejected the operation
    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),

    /// The SDK reported a connection-level failure while a connect was pending
    #[error("Connection failed: {0}")]
    ConnectionFailure(#[source] SdkError),

    /// The request was dropped before the SDK answered (session went away or bridge reset)
    #[error("Request was discarded before it completed")]
    Discarded,

    /// The lifecycle worker has stopped
    #[error("Lifecycle worker is not running")]
    WorkerUnavailable,
}

impl BridgeError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        BridgeError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// The SDK error behind this failure, if any
    pub fn sdk_error(&self) -> Option<&SdkError> {
        match self {
            BridgeError::Sdk(err) | BridgeError::ConnectionFailure(err) => Some(err),
            _ => None,
        }
    }

    /// Render the error payload handed to host callbacks
    ///
    /// SDK-originated errors carry `code` and `domain`; bridge-originated
    /// errors carry only a `message`.
    pub fn to_payload(&self) -> Value {
        match self.sdk_error() {
            Some(err) => err.to_payload(),
            None => json!({ "message": self.to_string() }),
        }
    }
}
