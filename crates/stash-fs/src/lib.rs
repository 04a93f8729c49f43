//! Filesystem layer for the stash attachment store
//!
//! Provides normalized paths, the store directory layout, atomic writes,
//! range reads and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::{ConfigStore, Format};
pub use constants::StoreDir;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use layout::StoreLayout;
pub use path::{NormalizedPath, validate_path_identifier};
