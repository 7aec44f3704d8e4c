//! Generic registry for named components.
//!
//! This module provides a `Registry<T>` type that wraps the
//! `Arc<RwLock<HashMap<String, Arc<T>>>>` pattern used for module tables.
//! Registration happens once at start-up; lookups are frequent afterwards,
//! so reads take a shared lock and never block each other.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rcodezero_common::Registry;
//!
//! let registry: Registry<&'static str> = Registry::new();
//! registry.try_insert("dns.providers.rcodezero", Arc::new("rcodezero")).unwrap();
//!
//! assert!(registry.get("dns.providers.rcodezero").is_some());
//! assert!(registry.try_insert("dns.providers.rcodezero", Arc::new("again")).is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Errors raised when mutating a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entry with this ID is already registered
    #[error("component already registered: {id}")]
    Duplicate { id: String },
}

/// A thread-safe registry for named components.
#[derive(Debug)]
pub struct Registry<T> {
    items: Arc<RwLock<HashMap<String, Arc<T>>>>,
}

impl<T> Registry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a component by ID.
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.read().get(id).cloned()
    }

    /// Insert a component, failing if the ID is taken.
    pub fn try_insert(&self, id: impl Into<String>, item: Arc<T>) -> Result<(), RegistryError> {
        let id = id.into();
        let mut items = self.items.write();
        if items.contains_key(&id) {
            return Err(RegistryError::Duplicate { id });
        }
        items.insert(id, item);
        Ok(())
    }

    /// Get all component IDs, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}
