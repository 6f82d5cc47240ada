//! Host-managed event subscription sets
//!
//! Each set counts references per qualified event name: adding a name twice
//! and removing it once leaves it subscribed.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Reference-counted set of qualified event names
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    refs: RwLock<HashMap<String, usize>>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one reference for each name
    pub fn add<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut refs = self.refs.write();
        for name in names {
            let count = refs.entry(name.as_ref().to_string()).or_insert(0);
            *count += 1;
        }
    }

    /// Release one reference for each name
    pub fn remove<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut refs = self.refs.write();
        for name in names {
            let name = name.as_ref();
            let remaining = refs.get_mut(name).map(|count| {
                *count = count.saturating_sub(1);
                *count
            });

            match remaining {
                Some(0) => {
                    refs.remove(name);
                }
                Some(_) => {}
                None => {
                    tracing::debug!(event = name, "Removing event that was never subscribed");
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.refs.read().contains_key(name)
    }

    /// Current reference count for `name`
    pub fn count(&self, name: &str) -> usize {
        self.refs.read().get(name).copied().unwrap_or(0)
    }

    /// Number of distinct subscribed names
    pub fn len(&self) -> usize {
        self.refs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.read().is_empty()
    }

    pub fn clear(&self) {
        self.refs.write().clear();
    }
}

/// The two subscription sets consulted by the router
///
/// `native` is fed by `setNativeEvents`, `component` by
/// `setJSComponentEvents`. Membership in either is enough for delivery.
#[derive(Debug, Default)]
pub struct EventSubscriptions {
    pub native: SubscriptionSet,
    pub component: SubscriptionSet,
}

impl EventSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self, qualified_name: &str) -> bool {
        self.native.contains(qualified_name) || self.component.contains(qualified_name)
    }

    pub fn clear(&self) {
        self.native.clear();
        self.component.clear();
    }
}
