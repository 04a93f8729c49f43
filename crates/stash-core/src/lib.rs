//! Local attachment storage
//!
//! Persists attachments that arrive as numbered chunks, reassembles them on
//! demand, keeps the client and server push-notification credential
//! documents, and provisions helper scripts.
//!
//! # Architecture
//!
//! ```text
//!              stash-cli
//!                  |
//!              stash-core   Stash, AttachmentStore, Assembler,
//!                  |        CredentialStore, ScriptProvisioner
//!              stash-fs     layout, atomic I/O, range reads, config files
//! ```
//!
//! All operations are synchronous filesystem calls and nothing is cached.
//! Writes never wait on each other; two writers of the same chunk race and
//! the last rename wins.

pub mod assembler;
pub mod attachments;
pub mod chunk;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod scripts;
pub mod stash;

pub use assembler::{Assembler, AssemblyPolicy};
pub use attachments::{AttachmentStore, PurgeFailure, PurgeReport, Removal};
pub use chunk::{Chunk, ChunkEntry, ChunkIndex, ParseChunkNameError};
pub use config::{RobustnessSettings, StoreConfig};
pub use credentials::{
    CredentialKind, CredentialStore, DocumentStore, FileDocumentStore, MemoryDocumentStore,
};
pub use error::{Error, ErrorKind, Result};
pub use scripts::{
    ManifestCatalog, ProvisionReport, ProvisionedScript, Script, ScriptCatalog, ScriptProvisioner,
    StaticCatalog,
};
pub use stash::Stash;
