//! Keyed persistence backends for annotation payloads.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Document-identity key for one page's annotations.
///
/// Derived from the page's path with every character outside
/// `[A-Za-z0-9_-]` replaced by `_`, so the key is safe to use as a file
/// name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey(String);

impl PageKey {
    const BASE: &'static str = "pageAnnotations";

    pub fn from_path(path: &str) -> Self {
        let safe: String = path
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(format!("{}_{}", Self::BASE, safe))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A keyed store holding one serialized payload per page.
///
/// Synchronous by design: persistence runs inside event handlers and its
/// failures are caught and logged by the engine, never surfaced.
pub trait PageStore {
    /// Store `payload` under `key`, replacing any previous value.
    fn save(&self, key: &PageKey, payload: &str) -> Result<(), StoreError>;

    /// Fetch the payload stored under `key`, or `None` if absent.
    fn load(&self, key: &PageKey) -> Result<Option<String>, StoreError>;

    /// Remove the payload stored under `key`. Removing an absent key is
    /// not an error.
    fn delete(&self, key: &PageKey) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_sanitizes_path() {
        let key = PageKey::from_path("/docs/intro.html");
        assert_eq!(key.as_str(), "pageAnnotations__docs_intro_html");
    }

    #[test]
    fn test_page_key_keeps_safe_chars() {
        let key = PageKey::from_path("notes_v2-final");
        assert_eq!(key.as_str(), "pageAnnotations_notes_v2-final");
    }

    #[test]
    fn test_same_path_same_key() {
        assert_eq!(PageKey::from_path("/a/b"), PageKey::from_path("/a/b"));
        assert_ne!(PageKey::from_path("/a/b"), PageKey::from_path("/a/c"));
    }
}
