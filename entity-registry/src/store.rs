//! Concurrent keyed storage for live entities
//!
//! `Registry<V, Id>` is a thin, intention-revealing wrapper over a sharded
//! concurrent map. Values are cloned out on read so no shard lock is ever held
//! by a caller; entities that are expensive to clone should be stored behind
//! an `Arc`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

/// Thread-safe keyed store with atomic put/remove-with-previous-value
///
/// Cloning a `Registry` yields another handle onto the same entries.
///
/// # Ordering
///
/// Operations on the same key from the same caller are observed in program
/// order. No ordering is implied between different callers beyond what the
/// per-shard lock provides.
///
/// # Example
///
/// ```rust
/// use entity_registry::Registry;
///
/// let sessions: Registry<&'static str> = Registry::new();
///
/// assert_eq!(sessions.put("s1".to_string(), "first"), None);
/// assert_eq!(sessions.put("s1".to_string(), "second"), Some("first"));
/// assert_eq!(sessions.get("s1"), Some("second"));
/// assert_eq!(sessions.remove("s1"), Some("second"));
/// assert_eq!(sessions.get("s1"), None);
/// ```
pub struct Registry<V, Id = String>
where
    Id: Eq + Hash,
{
    entries: Arc<DashMap<Id, V>>,
}

impl<V, Id> Registry<V, Id>
where
    V: Clone + Send + Sync + 'static,
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Insert a value, returning the value it replaced
    ///
    /// Insertion is last-writer-wins; a previous value for the same id is
    /// silently overwritten and handed back.
    pub fn put(&self, id: Id, value: V) -> Option<V> {
        self.entries.insert(id, value)
    }

    /// Get a clone of the value stored under `id`
    pub fn get<Q>(&self, id: &Q) -> Option<V>
    where
        Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Check whether a value is stored under `id`
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(id)
    }

    /// Remove the value stored under `id`
    ///
    /// When several callers race to remove the same id, exactly one of them
    /// receives `Some`. This is the single authoritative path by which an
    /// entity stops being visible.
    pub fn remove<Q>(&self, id: &Q) -> Option<V>
    where
        Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(id).map(|(_, value)| value)
    }

    /// Mutate the value stored under `id` in place
    ///
    /// Returns `false` if nothing is stored under `id`. The closure runs while
    /// the entry's shard is locked and must not call back into this registry.
    pub fn update<Q, F>(&self, id: &Q, f: F) -> bool
    where
        Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&mut V),
    {
        match self.entries.get_mut(id) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    /// Remove every entry matching `predicate`, returning the removed pairs
    ///
    /// Each removal is individually atomic: an entry removed concurrently by
    /// another caller is not reported twice.
    pub fn remove_where<F>(&self, predicate: F) -> Vec<(Id, V)>
    where
        F: Fn(&Id, &V) -> bool,
    {
        let candidates: Vec<Id> = self
            .entries
            .iter()
            .filter(|entry| predicate(entry.key(), entry.value()))
            .map(|entry| entry.key().clone())
            .collect();

        candidates
            .into_iter()
            .filter_map(|id| self.entries.remove_if(&id, |k, v| predicate(k, v)))
            .collect()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all ids currently stored
    pub fn ids(&self) -> Vec<Id> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of all values matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Vec<V>
    where
        F: Fn(&Id, &V) -> bool,
    {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.key(), entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<V, Id> Default for Registry<V, Id>
where
    V: Clone + Send + Sync + 'static,
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, Id> Clone for Registry<V, Id>
where
    Id: Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V, Id> fmt::Debug for Registry<V, Id>
where
    Id: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}
