//! Generic Entity Registry
//!
//! A thread-safe keyed store for live entities, with last-writer-wins
//! insertion and atomic removal.
//!
//! # Features
//!
//! - **Concurrent access**: every operation is safe from any thread without external locking
//! - **Atomic removal**: `remove()` returns the removed value to exactly one caller
//! - **Overwrite detection**: `put()` returns the value it replaced
//! - **In-place updates**: `update()` mutates an entry under its shard lock
//! - **Generic keys**: any hashable identifier, `String` by default
//!
//! # Quick Start
//!
//! ```rust
//! use entity_registry::Registry;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Stream {
//!     has_audio: bool,
//! }
//!
//! let streams: Registry<Stream> = Registry::new();
//! streams.put("stream-1".to_string(), Stream { has_audio: true });
//!
//! assert_eq!(streams.get("stream-1"), Some(Stream { has_audio: true }));
//!
//! streams.update("stream-1", |s| s.has_audio = false);
//! assert_eq!(streams.get("stream-1").map(|s| s.has_audio), Some(false));
//!
//! // Only the first remover observes the value
//! assert!(streams.remove("stream-1").is_some());
//! assert!(streams.remove("stream-1").is_none());
//! ```
//!
//! # Architecture
//!
//! ```text
//! Registry<V, Id>
//!     │
//!     └── entries: Arc<DashMap<Id, V>>   (sharded, lock per shard)
//!             │
//!             ├── put      -> insert, returns previous
//!             ├── remove   -> remove, returns removed
//!             └── update   -> get_mut under the shard lock
//! ```

pub mod store;

pub use store::Registry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::store::Registry;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Connection {
        session_id: String,
        data: String,
    }

    #[test]
    fn test_full_workflow() {
        let connections: Registry<Connection> = Registry::new();

        connections.put(
            "conn-1".to_string(),
            Connection {
                session_id: "s1".to_string(),
                data: "alice".to_string(),
            },
        );
        connections.put(
            "conn-2".to_string(),
            Connection {
                session_id: "s2".to_string(),
                data: "bob".to_string(),
            },
        );

        assert_eq!(connections.len(), 2);
        assert_eq!(
            connections.get("conn-1").map(|c| c.data),
            Some("alice".to_string())
        );

        // Cascade removal by owner
        let removed = connections.remove_where(|_, c| c.session_id == "s1");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].0, "conn-1");
        assert!(!connections.contains("conn-1"));
        assert!(connections.contains("conn-2"));
    }

    #[test]
    fn test_registry_clone_shares_state() {
        let registry1: Registry<u8> = Registry::new();
        let registry2 = registry1.clone();

        registry1.put("a".to_string(), 1);

        assert_eq!(registry2.get("a"), Some(1));
    }
}
