//! Attachment persistence: whole files and per-GUID chunk directories
//!
//! ```text
//! Attachments/
//!   photo.jpg            <- save_whole("photo.jpg", ..)
//!   <guid>/
//!     0.chunk            <- save_chunk(<guid>, 0, ..)
//!     1.chunk
//! ```
//!
//! There is no in-process locking. Two callers writing the same
//! `(guid, index)` race and the last rename wins.

use std::fs;
use std::path::Path;

use stash_fs::{NormalizedPath, RobustnessConfig, io, validate_path_identifier};

use crate::chunk::ChunkIndex;
use crate::{Error, Result};

/// Outcome of a best-effort removal.
#[derive(Debug)]
#[must_use]
pub enum Removal {
    Removed,
    Failed(Error),
}

impl Removal {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Name recorded for a directory entry that could not even be listed.
pub const UNREADABLE_ENTRY: &str = "<unreadable entry>";

/// An entry [`AttachmentStore::purge_all`] could not remove.
#[derive(Debug)]
pub struct PurgeFailure {
    pub name: String,
    pub error: Error,
}

/// Per-entry results of a purge.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub removed: Vec<String>,
    pub failed: Vec<PurgeFailure>,
}

impl PurgeReport {
    /// Every entry was removed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Stores attachment bytes under the attachments root.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: NormalizedPath,
    robustness: RobustnessConfig,
}

impl AttachmentStore {
    pub fn new(root: impl Into<NormalizedPath>, robustness: RobustnessConfig) -> Self {
        Self {
            root: root.into(),
            robustness,
        }
    }

    /// The attachments root directory.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Path of a whole (single-file) attachment.
    pub fn whole_path(&self, name: &str) -> Result<NormalizedPath> {
        validate_path_identifier(name)?;
        Ok(self.root.join(name))
    }

    /// Directory holding the chunks of `guid`.
    pub fn chunk_dir(&self, guid: &str) -> Result<NormalizedPath> {
        validate_path_identifier(guid)?;
        Ok(self.root.join(guid))
    }

    /// Path of one chunk file.
    pub fn chunk_path(&self, guid: &str, index: ChunkIndex) -> Result<NormalizedPath> {
        Ok(self.chunk_dir(guid)?.join(&index.file_name()))
    }

    /// Whether a chunk directory exists for `guid`.
    pub fn has_chunks(&self, guid: &str) -> bool {
        self.chunk_dir(guid).map(|dir| dir.is_dir()).unwrap_or(false)
    }

    /// Write `bytes` as a single attachment file, replacing any previous one.
    pub fn save_whole(&self, name: &str, bytes: &[u8]) -> Result<NormalizedPath> {
        let path = self.whole_path(name)?;
        io::write_atomic(&path, bytes, self.robustness)?;
        tracing::debug!(name, bytes = bytes.len(), "Saved attachment");
        Ok(path)
    }

    /// Write one chunk of `guid`, replacing a previous chunk with the same index.
    pub fn save_chunk(&self, guid: &str, index: u32, bytes: &[u8]) -> Result<NormalizedPath> {
        let index = ChunkIndex::new(index);
        let dir = self.chunk_dir(guid)?;
        io::ensure_dir(&dir)?;

        let path = dir.join(&index.file_name());
        io::write_atomic(&path, bytes, self.robustness)?;
        tracing::debug!(guid, %index, bytes = bytes.len(), "Saved attachment chunk");
        Ok(path)
    }

    /// Remove the chunk directory of `guid` and everything in it.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn delete_chunks(&self, guid: &str) -> Result<bool> {
        let dir = self.chunk_dir(guid)?;
        let removed = io::remove_dir_all_if_exists(&dir)?;
        tracing::debug!(guid, removed, "Deleted attachment chunks");
        Ok(removed)
    }

    /// Delete one whole attachment file. Best-effort: failures are logged
    /// and reported, never raised.
    pub fn remove_whole(&self, name: &str) -> Removal {
        let result = self
            .whole_path(name)
            .and_then(|path| {
                let native = path.to_native();
                fs::remove_file(&native)
                    .map_err(|e| stash_fs::Error::io_or_not_found(&native, e).into())
            });

        match result {
            Ok(()) => {
                tracing::debug!(name, "Removed attachment");
                Removal::Removed
            }
            Err(error) => {
                tracing::warn!("Failed to remove attachment {}: {}", name, error);
                Removal::Failed(error)
            }
        }
    }

    /// Remove every entry directly under the attachments root.
    ///
    /// Chunk directories are removed recursively. One entry failing does not
    /// stop the rest; only failing to list the root is an error.
    pub fn purge_all(&self) -> Result<PurgeReport> {
        let native_root = self.root.to_native();
        let entries =
            fs::read_dir(&native_root).map_err(|e| stash_fs::Error::io_or_not_found(&native_root, e))?;

        let report = self.purge_entries(entries, |path, is_dir| {
            if is_dir {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            }
        });

        tracing::info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Purged attachments"
        );
        Ok(report)
    }

    fn purge_entries<I, F>(&self, entries: I, mut remove: F) -> PurgeReport
    where
        I: IntoIterator<Item = std::io::Result<fs::DirEntry>>,
        F: FnMut(&Path, bool) -> std::io::Result<()>,
    {
        let native_root = self.root.to_native();
        let mut report = PurgeReport::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to read attachment entry: {}", e);
                    report.failed.push(PurgeFailure {
                        name: UNREADABLE_ENTRY.to_string(),
                        error: stash_fs::Error::io(&native_root, e).into(),
                    });
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            match remove(&path, is_dir) {
                Ok(()) => report.removed.push(name),
                Err(e) => {
                    tracing::warn!("Failed to remove attachment {}: {}", name, e);
                    report.failed.push(PurgeFailure {
                        name,
                        error: stash_fs::Error::io_or_not_found(&path, e).into(),
                    });
                }
            }
        }
        report
    }
}
