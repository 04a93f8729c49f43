//! Error types for stash-core

/// Result type for stash-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stash-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Chunks on disk do not form `0..n` under the contiguous policy
    #[error("Chunk sequence for {guid} is broken: expected index {expected}, found {found}")]
    ChunkSequence {
        guid: String,
        expected: u32,
        found: u32,
    },

    /// A script catalog entry could not be turned into a script
    #[error("Invalid script catalog: {message}")]
    InvalidCatalog { message: String },

    /// Configuration could not be resolved
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Filesystem error from stash-fs
    #[error(transparent)]
    Fs(#[from] stash_fs::Error),
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Creation, read or write failed (permissions, disk full, locking)
    Io,
    /// The attachment, chunk directory or file does not exist
    NotFound,
    /// A stored document exists but is not well-formed
    Parse,
    /// The caller supplied something the store refuses to act on
    InvalidInput,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChunkSequence { .. } | Self::InvalidCatalog { .. } | Self::Config { .. } => {
                ErrorKind::InvalidInput
            }
            Self::Fs(err) => match err {
                stash_fs::Error::NotFound { .. } => ErrorKind::NotFound,
                stash_fs::Error::Parse { .. } => ErrorKind::Parse,
                stash_fs::Error::InvalidName { .. } | stash_fs::Error::UnsupportedFormat { .. } => {
                    ErrorKind::InvalidInput
                }
                _ => ErrorKind::Io,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
