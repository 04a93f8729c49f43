//! Chunk naming and the `(index, payload)` model
//!
//! A chunk lives at `Attachments/<guid>/<index>.chunk`. The file name is the
//! only place the index is recorded, so parsing it is kept strict: anything
//! that is not `<digits>.chunk` is not a chunk.

use std::fmt;
use std::str::FromStr;

use stash_fs::NormalizedPath;

/// File extension of chunk files.
pub const CHUNK_EXTENSION: &str = "chunk";

/// Zero-based ordering key of a chunk within its attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkIndex(pub u32);

impl ChunkIndex {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// File name this index is stored under.
    pub fn file_name(self) -> String {
        format!("{}.{}", self.0, CHUNK_EXTENSION)
    }
}

impl From<u32> for ChunkIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file name that is not `<nonnegative integer>.chunk`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a chunk file name: {name:?}")]
pub struct ParseChunkNameError {
    pub name: String,
}

impl FromStr for ChunkIndex {
    type Err = ParseChunkNameError;

    /// Parse a chunk file name such as `"12.chunk"`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let err = || ParseChunkNameError {
            name: name.to_string(),
        };

        let stem = name
            .strip_suffix(CHUNK_EXTENSION)
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(err)?;

        if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        stem.parse::<u32>().map(ChunkIndex).map_err(|_| err())
    }
}

/// One numbered fragment of an attachment, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: ChunkIndex,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(index: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            index: ChunkIndex(index),
            payload: payload.into(),
        }
    }
}

/// A chunk file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEntry {
    pub index: ChunkIndex,
    pub path: NormalizedPath,
}

/// Whether a directory entry is store bookkeeping (hidden temp file).
pub(crate) fn is_bookkeeping(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn file_name_round_trips() {
        let index = ChunkIndex::new(42);
        assert_eq!(index.file_name(), "42.chunk");
        assert_eq!(index.file_name().parse::<ChunkIndex>(), Ok(index));
    }

    #[test]
    fn leading_zeros_parse_to_same_index() {
        assert_eq!("007.chunk".parse::<ChunkIndex>(), Ok(ChunkIndex(7)));
    }

    #[rstest]
    #[case("chunk")]
    #[case(".chunk")]
    #[case("a.chunk")]
    #[case("-1.chunk")]
    #[case("1.chunk.tmp")]
    #[case("1.part")]
    #[case("1chunk")]
    #[case("99999999999.chunk")]
    fn malformed_names_are_rejected(#[case] name: &str) {
        assert!(name.parse::<ChunkIndex>().is_err());
    }

    #[test]
    fn hidden_entries_are_bookkeeping() {
        assert!(is_bookkeeping(".0.chunk.1234.0.tmp"));
        assert!(is_bookkeeping(".0.chunk.4242.7.tmp"));
        assert!(!is_bookkeeping("0.chunk"));
    }
}
