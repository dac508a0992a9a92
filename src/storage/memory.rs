//! In-memory token store

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::TokenStore;
use crate::error::{Error, Result};

/// Store backed by a shared map. Clones share the same data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("memory store lock poisoned".to_string())
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}
