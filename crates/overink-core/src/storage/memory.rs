//! In-memory page store.

use super::{PageKey, PageStore};
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store for testing and ephemeral use.
///
/// Clones share the same underlying map, so a test can hand one handle to
/// the engine and keep another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pages: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pages.
    pub fn len(&self) -> usize {
        self.pages.read().map(|pages| pages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageStore for MemoryStore {
    fn save(&self, key: &PageKey, payload: &str) -> Result<(), StoreError> {
        let mut pages = self
            .pages
            .write()
            .map_err(|e| StoreError::Backend(format!("lock error: {}", e)))?;
        pages.insert(key.as_str().to_string(), payload.to_string());
        Ok(())
    }

    fn load(&self, key: &PageKey) -> Result<Option<String>, StoreError> {
        let pages = self
            .pages
            .read()
            .map_err(|e| StoreError::Backend(format!("lock error: {}", e)))?;
        Ok(pages.get(key.as_str()).cloned())
    }

    fn delete(&self, key: &PageKey) -> Result<(), StoreError> {
        let mut pages = self
            .pages
            .write()
            .map_err(|e| StoreError::Backend(format!("lock error: {}", e)))?;
        pages.remove(key.as_str());
        Ok(())
    }
}
