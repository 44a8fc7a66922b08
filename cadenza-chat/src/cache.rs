//! Single-slot session cache.
//!
//! Sessions hold large model state, so the cache stores a `Weak` handle:
//! whoever created the session keeps the only strong reference, and
//! dropping it invalidates the cache entry automatically. Capacity is one —
//! inserting under a new key evicts the previous entry.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

/// Keyed, single-entry cache of non-owning session handles.
pub struct SessionCache<T> {
    slot: Mutex<Option<(String, Weak<T>)>>,
}

impl<T> SessionCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Upgrade the cached handle if `key` matches and the session is still
    /// alive. A dead handle is cleared on the way out.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some((cached_key, handle)) if cached_key == key => match handle.upgrade() {
                Some(session) => Some(session),
                None => {
                    *slot = None;
                    None
                }
            },
            _ => None,
        }
    }

    /// Remember `session` under `key`, evicting whatever was cached
    /// before. The cache keeps only a weak handle; the caller remains the
    /// owner.
    pub fn insert(&self, key: impl Into<String>, session: &Arc<T>) {
        let key = key.into();
        debug!(key = %key, "caching session");
        *self.slot.lock() = Some((key, Arc::downgrade(session)));
    }

    /// Drop the cached entry, if any.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Whether a live entry is cached for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T> Default for SessionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
