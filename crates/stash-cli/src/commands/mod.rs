//! Command implementations for stash-cli

pub mod attachments;
pub mod credential;
pub mod init;
pub mod provision;

use std::path::{Path, PathBuf};

use stash_core::{Stash, StoreConfig};
use stash_fs::NormalizedPath;

use crate::error::Result;

pub use attachments::{
    run_delete_chunks, run_purge, run_read_range, run_reconstruct, run_remove, run_save,
    run_save_chunk,
};
pub use credential::run_credential;
pub use init::run_init;
pub use provision::run_provision;

/// Build the store configuration: config file first, then the base
/// directory flag (or `STASH_BASE_DIR`) on top.
pub fn load_config(config_file: Option<&Path>, base_dir: Option<PathBuf>) -> Result<StoreConfig> {
    let mut config = match config_file {
        Some(path) => StoreConfig::load(&NormalizedPath::new(path))?,
        None => StoreConfig::default(),
    };
    if let Some(base_dir) = base_dir {
        config = config.with_base_dir(base_dir);
    }
    Ok(config)
}

/// Open the store described by the global flags.
pub fn open_stash(config_file: Option<&Path>, base_dir: Option<PathBuf>) -> Result<Stash> {
    let config = load_config(config_file, base_dir)?;
    Ok(Stash::open(config)?)
}
