//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stash_core::CredentialKind;

/// Stash - local storage for chunked attachments, credentials and scripts
#[derive(Parser, Debug)]
#[command(name = "stash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store base directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "STASH_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Store configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the store directory layout
    ///
    /// Examples:
    ///   stash init
    ///   stash init --catalog scripts.toml   # Also provision helper scripts
    Init {
        /// Script manifest to provision after setup
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Save a whole attachment file
    Save {
        /// Attachment file name under Attachments/
        name: String,

        /// File to read the bytes from
        file: PathBuf,
    },

    /// Save one numbered chunk of an attachment
    ///
    /// Examples:
    ///   stash save-chunk 7F3A-... 0 part0.bin
    ///   stash save-chunk 7F3A-... 1 part1.bin
    SaveChunk {
        /// Attachment GUID
        guid: String,

        /// Zero-based chunk index
        index: u32,

        /// File to read the chunk bytes from
        file: PathBuf,
    },

    /// Delete every chunk of an attachment
    DeleteChunks {
        /// Attachment GUID
        guid: String,
    },

    /// Remove a whole attachment file (best-effort)
    Remove {
        /// Attachment file name under Attachments/
        name: String,
    },

    /// Remove everything under Attachments/
    Purge,

    /// Reassemble a chunked attachment
    Reconstruct {
        /// Attachment GUID
        guid: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Read a byte range from any file
    ReadRange {
        /// File to read
        file: PathBuf,

        /// Starting byte offset
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Maximum number of bytes (defaults to the configured read length)
        #[arg(long)]
        length: Option<usize>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Read or write push-notification credential documents
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },

    /// Write helper scripts from a manifest into Scripts/
    Provision {
        /// Script manifest (TOML, JSON or YAML)
        #[arg(long)]
        catalog: PathBuf,
    },
}

/// Credential subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CredentialAction {
    /// Print a credential document as JSON
    Get {
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Replace a credential document
    Set {
        #[arg(value_enum)]
        kind: KindArg,

        /// JSON file to store (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Forget a credential document
    Clear {
        #[arg(value_enum)]
        kind: KindArg,
    },
}

/// Which credential document
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Client,
    Server,
}

impl From<KindArg> for CredentialKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Client => CredentialKind::Client,
            KindArg::Server => CredentialKind::Server,
        }
    }
}
