//! Reassembly of chunked attachments

use std::fs;
use std::io::Write;

use stash_fs::{NormalizedPath, io};

use crate::attachments::AttachmentStore;
use crate::chunk::{Chunk, ChunkEntry, ChunkIndex, is_bookkeeping};
use crate::{Error, Result};

/// How strictly the chunk sequence is checked before reassembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssemblyPolicy {
    /// Concatenate whatever chunks exist in index order. Gaps pass silently.
    #[default]
    Permissive,
    /// Require indices to be exactly `0..n` with no repeats.
    Contiguous,
}

/// Rebuilds attachments from their chunk files.
///
/// Every call re-reads the directory; nothing is cached.
#[derive(Debug, Clone)]
pub struct Assembler {
    store: AttachmentStore,
    policy: AssemblyPolicy,
}

impl Assembler {
    pub fn new(store: AttachmentStore) -> Self {
        Self {
            store,
            policy: AssemblyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AssemblyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> AssemblyPolicy {
        self.policy
    }

    /// List the chunk files of `guid` in ascending index order.
    ///
    /// Hidden temp files are skipped. Entries that do not parse as
    /// chunk names, or that are not regular files, are skipped with a
    /// warning. A missing directory is
    /// [`stash_fs::Error::NotFound`]; an empty one yields an empty list.
    pub fn list_chunks(&self, guid: &str) -> Result<Vec<ChunkEntry>> {
        let dir = self.store.chunk_dir(guid)?;
        let native_dir = dir.to_native();
        let read_dir =
            fs::read_dir(&native_dir).map_err(|e| stash_fs::Error::io_or_not_found(&native_dir, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| stash_fs::Error::io(&native_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if is_bookkeeping(&name) {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| stash_fs::Error::io(entry.path(), e))?;
            match name.parse::<ChunkIndex>() {
                Ok(_) if !file_type.is_file() => {
                    tracing::warn!(guid, "Skipping non-file entry in chunk directory: {}", name)
                }
                Ok(index) => {
                    let path = dir.join(&name);
                    entries.push((name, ChunkEntry { index, path }));
                }
                Err(e) => tracing::warn!(guid, "Skipping entry in chunk directory: {}", e),
            }
        }

        // Ties (e.g. "1.chunk" and "01.chunk") fall back to the file name
        entries.sort_by(|(a_name, a), (b_name, b)| {
            a.index.cmp(&b.index).then_with(|| a_name.cmp(b_name))
        });
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Read every chunk of `guid` into memory, in order.
    pub fn chunks(&self, guid: &str) -> Result<Vec<Chunk>> {
        let entries = self.checked_entries(guid)?;
        entries
            .into_iter()
            .map(|entry| -> Result<Chunk> {
                let payload = io::read_bytes(&entry.path)?;
                Ok(Chunk {
                    index: entry.index,
                    payload,
                })
            })
            .collect()
    }

    /// Concatenate the chunks of `guid` in ascending index order.
    pub fn reconstruct(&self, guid: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reconstruct_to(guid, &mut bytes)?;
        Ok(bytes)
    }

    /// Stream the chunks of `guid` into `writer`, returning the byte count.
    pub fn reconstruct_to<W: Write>(&self, guid: &str, writer: &mut W) -> Result<u64> {
        let entries = self.checked_entries(guid)?;

        let mut total = 0u64;
        for entry in &entries {
            let payload = io::read_bytes(&entry.path)?;
            writer
                .write_all(&payload)
                .map_err(|e| stash_fs::Error::io(entry.path.to_native(), e))?;
            total += payload.len() as u64;
        }

        tracing::debug!(guid, chunks = entries.len(), bytes = total, "Reconstructed attachment");
        Ok(total)
    }

    /// Random-access read of any file; see [`stash_fs::io::read_range`].
    pub fn read_range(&self, path: &NormalizedPath, offset: u64, length: usize) -> Result<Vec<u8>> {
        Ok(io::read_range(path, offset, length)?)
    }

    fn checked_entries(&self, guid: &str) -> Result<Vec<ChunkEntry>> {
        let entries = self.list_chunks(guid)?;
        if self.policy == AssemblyPolicy::Contiguous {
            check_contiguous(guid, &entries)?;
        }
        Ok(entries)
    }
}

fn check_contiguous(guid: &str, entries: &[ChunkEntry]) -> Result<()> {
    for (expected, entry) in entries.iter().enumerate() {
        let expected = expected as u32;
        if entry.index.value() != expected {
            return Err(Error::ChunkSequence {
                guid: guid.to_string(),
                expected,
                found: entry.index.value(),
            });
        }
    }
    Ok(())
}
