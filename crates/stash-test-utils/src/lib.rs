//! Shared test utilities for the stash workspace.
//!
//! Dev-dependency only; never published.
//!
//! - [`TestStash`]: a store opened in a temporary base directory
//! - [`random_guid`]: a fresh attachment GUID

use std::fs;
use std::path::{Path, PathBuf};

use stash_core::{Stash, StoreConfig};
use tempfile::TempDir;

/// A fresh uppercase GUID, shaped like the ones attachment senders use.
pub fn random_guid() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

/// Split `bytes` into chunks of at most `size` bytes, paired with their index.
pub fn split_chunks(bytes: &[u8], size: usize) -> Vec<(u32, Vec<u8>)> {
    bytes
        .chunks(size.max(1))
        .enumerate()
        .map(|(i, chunk)| (i as u32, chunk.to_vec()))
        .collect()
}

/// A [`Stash`] opened in a temporary directory that is removed on drop.
///
/// # Example
///
/// ```rust,no_run
/// use stash_test_utils::TestStash;
///
/// let test = TestStash::new();
/// test.stash.attachments().save_chunk("abc", 0, b"A").unwrap();
/// test.assert_file_exists("Attachments/abc/0.chunk");
/// ```
pub struct TestStash {
    temp_dir: TempDir,
    /// The opened store
    pub stash: Stash,
}

impl Default for TestStash {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStash {
    /// Open a store with default settings in a new temporary directory.
    ///
    /// # Panics
    /// Panics if the directory cannot be created or the store fails to open.
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Open a store after adjusting the default configuration.
    pub fn with_config(adjust: impl FnOnce(StoreConfig) -> StoreConfig) -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("TestStash: tempdir: {e}"));
        let config = adjust(StoreConfig::at(temp_dir.path().join("stash")));
        let stash = Stash::open(config).unwrap_or_else(|e| panic!("TestStash: open failed: {e}"));
        Self { temp_dir, stash }
    }

    /// The temporary directory containing the base directory.
    pub fn temp_root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Native path of the store base directory.
    pub fn base(&self) -> PathBuf {
        self.stash.layout().base.to_native()
    }

    /// Native path of `rel` under the base directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.base().join(rel)
    }

    /// Write chunks directly through the store.
    pub fn write_chunks(&self, guid: &str, chunks: &[(u32, Vec<u8>)]) {
        for (index, payload) in chunks {
            self.stash
                .attachments()
                .save_chunk(guid, *index, payload)
                .unwrap_or_else(|e| panic!("TestStash: save_chunk {guid}/{index}: {e}"));
        }
    }

    /// Write a raw file under the base directory, bypassing the store.
    pub fn write_raw(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap_or_else(|e| panic!("TestStash: write {rel}: {e}"));
    }

    /// Sorted names of the entries directly under `rel`.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(rel))
            .unwrap_or_else(|e| panic!("TestStash: list {rel}: {e}"))
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `rel` exists under the base directory.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.path(rel).exists(), "expected {rel} to exist");
    }

    /// Assert that `rel` does not exist under the base directory.
    pub fn assert_file_not_exists(&self, rel: &str) {
        assert!(!self.path(rel).exists(), "expected {rel} to be absent");
    }
}
