//! File-backed page store.

use super::{PageKey, PageStore};
use crate::error::StoreError;
use std::fs;
use std::path::PathBuf;

/// Stores one `<key>.json` file per page under a base directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`, creating the directory
    /// if it does not exist.
    pub fn new(base_path: PathBuf) -> Result<Self, StoreError> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location,
    /// `<platform data dir>/overink/pages/`.
    pub fn default_location() -> Result<Self, StoreError> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Backend("could not determine home directory".to_string()))?;
        Self::new(base.join("overink").join("pages"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn page_path(&self, key: &PageKey) -> PathBuf {
        // PageKey already guarantees a filename-safe character set.
        self.base_path.join(format!("{}.json", key.as_str()))
    }
}

impl PageStore for FileStore {
    fn save(&self, key: &PageKey, payload: &str) -> Result<(), StoreError> {
        fs::write(self.page_path(key), payload)?;
        Ok(())
    }

    fn load(&self, key: &PageKey) -> Result<Option<String>, StoreError> {
        let path = self.page_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn delete(&self, key: &PageKey) -> Result<(), StoreError> {
        let path = self.page_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let key = PageKey::from_path("/docs/guide");

        assert!(store.load(&key).unwrap().is_none());

        store.save(&key, "[{\"tool\":\"pen\"}]").unwrap();
        assert_eq!(
            store.load(&key).unwrap().as_deref(),
            Some("[{\"tool\":\"pen\"}]")
        );

        store.delete(&key).unwrap();
        assert!(store.load(&key).unwrap().is_none());
    }

    #[test]
    fn test_creates_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(nested.clone()).unwrap();

        assert!(nested.exists());
        assert_eq!(store.base_path(), &nested);
    }

    #[test]
    fn test_one_file_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.save(&PageKey::from_path("/a"), "[]").unwrap();
        store.save(&PageKey::from_path("/b"), "[]").unwrap();

        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 2);
    }
}
