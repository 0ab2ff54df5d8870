//! The persistence bridge: serialize the current content under a fixed key
//! in an injected key-value store, and reconstruct it at startup.
//!
//! The store is a capability handed to [`ContentStorage`] at construction,
//! not ambient global state. A missing key means "start empty" and is not an
//! error; a malformed payload is an error the caller downgrades to an empty
//! session plus a diagnostic. No retries, no versioning, no migration.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::DocumentContent;
use crate::raw::{self, RawError};

/// The fixed key the editor persists its document under.
pub const CONTENT_KEY: &str = "draftEditorContent";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read from content store: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write to content store: {0}")]
    Write(#[source] std::io::Error),
    #[error("stored content is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored content is invalid: {0}")]
    Invalid(#[from] RawError),
}

/// String key-value persistence capability (the local-storage analog).
pub trait KeyValueStore {
    /// Read the value at `key`; `Ok(None)` when the key has never been set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write `value` at `key`, overwriting any prior value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-per-key store under a data directory: key `k` lives at `<root>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(StoreError::Write)?;
        fs::write(self.path_for(key), value).map_err(StoreError::Write)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persistence bridge: content round-trips through the raw
/// representation under one fixed key.
#[derive(Debug)]
pub struct ContentStorage<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ContentStorage<S> {
    /// Bridge over `store` using the default [`CONTENT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CONTENT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and reconstruct the persisted content. `Ok(None)` when nothing
    /// has been persisted yet; errors for unreadable or malformed payloads.
    pub fn load(&self) -> Result<Option<DocumentContent>, StoreError> {
        let Some(payload) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let raw = serde_json::from_str(&payload)?;
        Ok(Some(raw::convert_from_raw(&raw)?))
    }

    /// Serialize `content` and overwrite the stored value.
    pub fn save(&self, content: &DocumentContent) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&raw::convert_to_raw(content))?;
        self.store.set(&self.key, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType, InlineStyle};
    use crate::tests::{content_of, styled_block, unstyled};
    use pretty_assertions::assert_eq;

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get(CONTENT_KEY).unwrap().is_none());
    }

    #[test]
    fn file_store_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("someKey", "payload").unwrap();
        assert_eq!(store.get("someKey").unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn file_store_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn file_store_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/data"));

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn load_without_prior_save_is_none() {
        let storage = ContentStorage::new(MemoryStore::new());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips_content() {
        let storage = ContentStorage::new(MemoryStore::new());
        let content = content_of(vec![
            Block::new(BlockType::HeaderOne, "Title"),
            styled_block("* bold text", 0..11, InlineStyle::Bold),
            unstyled("plain"),
        ]);

        storage.save(&content).unwrap();
        let restored = storage.load().unwrap().expect("content was saved");
        assert_eq!(restored, content);
    }

    #[test]
    fn save_uses_the_fixed_key() {
        let storage = ContentStorage::new(MemoryStore::new());
        storage.save(&content_of(vec![unstyled("x")])).unwrap();

        assert!(storage.store().get(CONTENT_KEY).unwrap().is_some());
        assert_eq!(storage.key(), "draftEditorContent");
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        let store = MemoryStore::new();
        store.set(CONTENT_KEY, "{not json").unwrap();

        let storage = ContentStorage::new(store);
        assert!(matches!(storage.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn invalid_raw_content_is_an_error() {
        let store = MemoryStore::new();
        store
            .set(
                CONTENT_KEY,
                r#"{"blocks":[{"key":"a","type":"no-such-type","text":""}],"entityMap":{}}"#,
            )
            .unwrap();

        let storage = ContentStorage::new(store);
        assert!(matches!(storage.load(), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn overflowing_style_range_in_payload_is_an_error() {
        let store = MemoryStore::new();
        store
            .set(
                CONTENT_KEY,
                r#"{"blocks":[{"key":"a","type":"unstyled","text":"ab","inlineStyleRanges":[{"offset":18446744073709551615,"length":2,"style":"BOLD"}]}],"entityMap":{}}"#,
            )
            .unwrap();

        let storage = ContentStorage::new(store);
        assert!(matches!(storage.load(), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn custom_key_is_respected() {
        let storage = ContentStorage::with_key(MemoryStore::new(), "scratchPad");
        storage.save(&content_of(vec![unstyled("x")])).unwrap();

        assert!(storage.store().get("scratchPad").unwrap().is_some());
        assert!(storage.store().get(CONTENT_KEY).unwrap().is_none());
    }
}
