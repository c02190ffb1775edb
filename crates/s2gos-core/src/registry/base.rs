//! Base registry trait and implementation.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

/// Trait for items that can be stored in a registry.
pub trait Registerable: Send + Sync {
    /// Returns the unique identifier for this item.
    fn registry_id(&self) -> &str;
}

/// Generic insertion-ordered registry keyed by ID.
///
/// Registering an existing ID replaces the item in place, so iteration order
/// always reflects the first registration.
pub struct BaseRegistry<T: ?Sized + Registerable> {
    items: RwLock<IndexMap<String, Arc<T>>>,
}

impl<T: ?Sized + Registerable> BaseRegistry<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(IndexMap::new()),
        }
    }

    /// Register an item, returning the one it replaced.
    pub fn register(&self, item: Arc<T>) -> Option<Arc<T>> {
        let id = item.registry_id().to_string();
        self.items.write().insert(id, item)
    }

    /// Unregister an item by ID, returning it if it existed.
    pub fn unregister(&self, id: &str) -> Option<Arc<T>> {
        self.items.write().shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.read().contains_key(id)
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.items.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Snapshot of all items in registration order.
    pub fn values(&self) -> Vec<Arc<T>> {
        self.items.read().values().cloned().collect()
    }
}

impl<T: ?Sized + Registerable> Default for BaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
