//! Push-notification credential documents
//!
//! Two singleton JSON documents, `client` and `server`, each replaced
//! wholesale on write. The contents are opaque here; only well-formedness
//! is checked. Storage goes through [`DocumentStore`] so the file backend
//! can be swapped without touching callers.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use stash_fs::{NormalizedPath, RobustnessConfig, io, validate_path_identifier};

use crate::Result;

/// A small key-value store of JSON documents.
///
/// `get` returns `Ok(None)` for a key that was never set; that is distinct
/// from a stored empty document.
pub trait DocumentStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, doc: &Value) -> Result<()>;

    /// Returns `false` when the key was already absent.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// One `<key>.json` file per document in a directory.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    dir: NormalizedPath,
    robustness: RobustnessConfig,
}

impl FileDocumentStore {
    pub fn new(dir: impl Into<NormalizedPath>, robustness: RobustnessConfig) -> Self {
        Self {
            dir: dir.into(),
            robustness,
        }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<NormalizedPath> {
        validate_path_identifier(key)?;
        Ok(self.dir.join(&format!("{}.json", key)))
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let content = match io::read_bytes(&path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Bytes that are not UTF-8 are malformed JSON, not an I/O failure
        let doc = serde_json::from_slice(&content).map_err(|e| stash_fs::Error::Parse {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;
        Ok(Some(doc))
    }

    fn set(&self, key: &str, doc: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        let content = serde_json::to_string(doc).map_err(|e| stash_fs::Error::Serialize {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;
        io::write_atomic(&path, content.as_bytes(), self.robustness)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        Ok(io::remove_file_if_exists(&path)?)
    }
}

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(key).cloned())
    }

    fn set(&self, key: &str, doc: &Value) -> Result<()> {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        docs.insert(key.to_string(), doc.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        Ok(docs.remove(key).is_some())
    }
}

/// Which credential bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Client,
    Server,
}

impl CredentialKind {
    /// Document key, also the file stem on disk.
    pub fn key(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Client and server credential documents.
#[derive(Debug)]
pub struct CredentialStore<S = FileDocumentStore> {
    store: S,
}

impl<S: DocumentStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing document store.
    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn get(&self, kind: CredentialKind) -> Result<Option<Value>> {
        self.store.get(kind.key())
    }

    pub fn set(&self, kind: CredentialKind, doc: &Value) -> Result<()> {
        self.store.set(kind.key(), doc)?;
        tracing::debug!(%kind, "Stored credential document");
        Ok(())
    }

    /// Forget a credential document, returning to "not configured".
    pub fn clear(&self, kind: CredentialKind) -> Result<bool> {
        let removed = self.store.remove(kind.key())?;
        tracing::debug!(%kind, removed, "Cleared credential document");
        Ok(removed)
    }

    pub fn get_client(&self) -> Result<Option<Value>> {
        self.get(CredentialKind::Client)
    }

    pub fn set_client(&self, doc: &Value) -> Result<()> {
        self.set(CredentialKind::Client, doc)
    }

    pub fn get_server(&self) -> Result<Option<Value>> {
        self.get(CredentialKind::Server)
    }

    pub fn set_server(&self, doc: &Value) -> Result<()> {
        self.set(CredentialKind::Server, doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_distinguishes_absent_from_empty() {
        let creds = CredentialStore::new(MemoryDocumentStore::new());
        assert_eq!(creds.get_client().unwrap(), None);

        creds.set_client(&json!({})).unwrap();
        assert_eq!(creds.get_client().unwrap(), Some(json!({})));
        assert_eq!(creds.get_server().unwrap(), None);
    }

    #[test]
    fn memory_store_clear() {
        let creds = CredentialStore::new(MemoryDocumentStore::new());
        creds.set_server(&json!({"project_id": "p"})).unwrap();

        assert!(creds.clear(CredentialKind::Server).unwrap());
        assert!(!creds.clear(CredentialKind::Server).unwrap());
        assert_eq!(creds.get_server().unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path(), RobustnessConfig::default());
        assert!(store.set("../escape", &json!(1)).is_err());
    }
}
