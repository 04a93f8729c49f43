//! Helper script provisioning
//!
//! The script catalog is supplied from outside; this module only lays the
//! payloads down under `Scripts/`, replacing whatever an earlier run wrote.

use serde::Deserialize;
use stash_fs::{ConfigStore, NormalizedPath, RobustnessConfig, io, validate_path_identifier};

use crate::{Error, Result};

/// One catalog entry: a file name and its opaque contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub contents: Vec<u8>,
}

impl Script {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Source of the scripts to provision.
pub trait ScriptCatalog {
    fn scripts(&self) -> Result<Vec<Script>>;
}

/// A catalog fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    scripts: Vec<Script>,
}

impl StaticCatalog {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self { scripts }
    }
}

impl ScriptCatalog for StaticCatalog {
    fn scripts(&self) -> Result<Vec<Script>> {
        Ok(self.scripts.clone())
    }
}

impl<C: ScriptCatalog + ?Sized> ScriptCatalog for &C {
    fn scripts(&self) -> Result<Vec<Script>> {
        (**self).scripts()
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    /// Inline contents
    contents: Option<String>,
    /// File to copy, relative to the manifest
    source: Option<String>,
}

/// A catalog described by a TOML, JSON or YAML manifest.
///
/// ```toml
/// [[scripts]]
/// name = "startMessages.scpt"
/// contents = "tell application \"Messages\" to launch"
///
/// [[scripts]]
/// name = "restart.sh"
/// source = "scripts/restart.sh"
/// ```
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: NormalizedPath,
}

impl ManifestCatalog {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self { path: path.into() }
    }
}

impl ScriptCatalog for ManifestCatalog {
    fn scripts(&self) -> Result<Vec<Script>> {
        let manifest: Manifest = ConfigStore::new().load(&self.path)?;
        let base = self.path.parent().unwrap_or_else(|| NormalizedPath::new(""));

        manifest
            .scripts
            .into_iter()
            .map(|entry| -> Result<Script> {
                match (entry.contents, entry.source) {
                    (Some(contents), None) => Ok(Script::new(entry.name, contents)),
                    (None, Some(source)) => {
                        let contents = io::read_bytes(&base.join(&source))?;
                        Ok(Script::new(entry.name, contents))
                    }
                    _ => Err(Error::InvalidCatalog {
                        message: format!(
                            "script {:?} must set exactly one of `contents` or `source`",
                            entry.name
                        ),
                    }),
                }
            })
            .collect()
    }
}

/// A script written by [`ScriptProvisioner::provision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedScript {
    pub name: String,
    pub path: NormalizedPath,
    /// An earlier copy existed and was deleted first
    pub replaced: bool,
}

/// Scripts written by one provisioning run.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub scripts: Vec<ProvisionedScript>,
}

/// Writes a catalog into the scripts directory.
#[derive(Debug, Clone)]
pub struct ScriptProvisioner<C> {
    dir: NormalizedPath,
    catalog: C,
    robustness: RobustnessConfig,
}

impl<C: ScriptCatalog> ScriptProvisioner<C> {
    pub fn new(dir: impl Into<NormalizedPath>, catalog: C, robustness: RobustnessConfig) -> Self {
        Self {
            dir: dir.into(),
            catalog,
            robustness,
        }
    }

    /// Where the script `name` is written.
    pub fn script_path(&self, name: &str) -> Result<NormalizedPath> {
        validate_path_identifier(name)?;
        Ok(self.dir.join(name))
    }

    /// Delete and rewrite every catalog script.
    pub fn provision(&self) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        for script in self.catalog.scripts()? {
            let path = self.script_path(&script.name)?;
            let replaced = io::remove_file_if_exists(&path)?;
            io::write_atomic(&path, &script.contents, self.robustness)?;
            tracing::debug!(name = %script.name, replaced, "Provisioned script");

            report.scripts.push(ProvisionedScript {
                name: script.name,
                path,
                replaced,
            });
        }

        tracing::info!(count = report.scripts.len(), dir = %self.dir, "Provisioned scripts");
        Ok(report)
    }
}
