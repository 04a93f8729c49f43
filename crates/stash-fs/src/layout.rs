//! Store directory layout
//!
//! A base directory plus the fixed [`StoreDir`] children beneath it. The
//! base is supplied by the caller; nothing here reads global state.

use std::fs;

use crate::{Error, NormalizedPath, Result, StoreDir, io};

/// Resolved on-disk layout rooted at a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// Base directory owning every store path
    pub base: NormalizedPath,
}

impl StoreLayout {
    pub fn new(base: impl Into<NormalizedPath>) -> Self {
        Self { base: base.into() }
    }

    /// Path of one of the fixed subdirectories.
    pub fn dir(&self, dir: StoreDir) -> NormalizedPath {
        self.base.join(dir.as_str())
    }

    pub fn attachments_dir(&self) -> NormalizedPath {
        self.dir(StoreDir::Attachments)
    }

    pub fn contacts_dir(&self) -> NormalizedPath {
        self.dir(StoreDir::Contacts)
    }

    pub fn scripts_dir(&self) -> NormalizedPath {
        self.dir(StoreDir::Scripts)
    }

    pub fn fcm_dir(&self) -> NormalizedPath {
        self.dir(StoreDir::Fcm)
    }

    /// Create the base directory and every fixed subdirectory that is missing.
    ///
    /// Idempotent. Failures other than "already exists" are returned as-is;
    /// callers treat them as fatal to startup.
    pub fn setup(&self) -> Result<()> {
        let base = self.base.to_native();
        if base.exists() && !base.is_dir() {
            return Err(Error::LayoutValidation {
                message: format!("base {} exists but is not a directory", self.base),
            });
        }
        fs::create_dir_all(&base).map_err(|e| Error::io(&base, e))?;

        let mut created = Vec::new();
        for dir in StoreDir::ALL {
            if io::ensure_dir(&self.dir(dir))? {
                created.push(dir.as_str());
            }
        }

        if created.is_empty() {
            tracing::debug!(base = %self.base, "Store layout already present");
        } else {
            tracing::info!(base = %self.base, ?created, "Created store directories");
        }
        Ok(())
    }

    /// Check that the layout exists on disk without creating anything.
    pub fn validate(&self) -> Result<()> {
        if !self.base.is_dir() {
            return Err(Error::LayoutValidation {
                message: format!("base directory {} is missing", self.base),
            });
        }
        for dir in StoreDir::ALL {
            let path = self.dir(dir);
            if !path.is_dir() {
                return Err(Error::LayoutValidation {
                    message: format!("{} directory missing at {}", dir, path),
                });
            }
        }
        Ok(())
    }

    /// Return a copy whose base is the canonical form of this one.
    ///
    /// The base must exist, so call this after [`StoreLayout::setup`].
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.base.to_native();
        let canonical = dunce::canonicalize(&native).map_err(|e| Error::io(&native, e))?;
        Ok(Self::new(canonical))
    }
}
