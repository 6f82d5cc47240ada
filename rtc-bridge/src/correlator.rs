//! Pending one-shot callbacks keyed by request identity
//!
//! A key is a session id (connect, disconnect) or a publisher id (destroy).
//! `resolve` removes the entry before invoking it, so concurrent resolvers
//! for the same key cannot both fire it.

use std::fmt;

use dashmap::DashMap;

use crate::completion::Completion;
use crate::error::Result;

/// Table of pending completions
pub struct CallbackCorrelator<T = ()> {
    name: &'static str,
    pending: DashMap<String, Completion<T>>,
}

impl<T> CallbackCorrelator<T> {
    /// Create a table; `name` labels log lines
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: DashMap::new(),
        }
    }

    /// Store `completion` under `key`
    ///
    /// A stale registration for the same key is dropped, which its waiter
    /// observes as `Discarded`. Returns `true` if one was replaced.
    pub fn register(&self, key: impl Into<String>, completion: Completion<T>) -> bool {
        let key = key.into();
        let replaced = self.pending.insert(key.clone(), completion).is_some();
        if replaced {
            tracing::debug!(correlator = self.name, key = %key, "Replaced stale pending callback");
        }
        replaced
    }

    /// Remove and invoke the callback for `key`
    ///
    /// Returns `false` (and does nothing) if no callback is pending.
    pub fn resolve(&self, key: &str, result: Result<T>) -> bool {
        match self.pending.remove(key) {
            Some((_, completion)) => {
                if !completion.complete(result) {
                    tracing::debug!(correlator = self.name, key, "Host stopped waiting before resolution");
                }
                true
            }
            None => false,
        }
    }

    /// Drop the callback for `key` without invoking it
    pub fn discard(&self, key: &str) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending callback
    pub fn clear(&self) {
        self.pending.clear();
    }
}

impl<T> fmt::Debug for CallbackCorrelator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCorrelator")
            .field("name", &self.name)
            .field("pending", &self.pending.len())
            .finish()
    }
}
