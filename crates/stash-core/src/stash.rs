//! The assembled store

use stash_fs::{NormalizedPath, StoreLayout};

use crate::assembler::Assembler;
use crate::attachments::AttachmentStore;
use crate::config::StoreConfig;
use crate::credentials::{CredentialStore, FileDocumentStore};
use crate::scripts::{ProvisionReport, ScriptCatalog, ScriptProvisioner};
use crate::Result;

/// Every store component, rooted at one base directory.
///
/// ```no_run
/// use stash_core::{Stash, StoreConfig};
///
/// let stash = Stash::open(StoreConfig::at("/tmp/stash"))?;
/// stash.attachments().save_chunk("guid", 0, b"hello")?;
/// let bytes = stash.assembler().reconstruct("guid")?;
/// # Ok::<(), stash_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Stash {
    config: StoreConfig,
    layout: StoreLayout,
    attachments: AttachmentStore,
    assembler: Assembler,
    credentials: CredentialStore<FileDocumentStore>,
}

impl Stash {
    /// Create the directory layout if needed and open the store.
    ///
    /// A layout failure aborts opening; there is no partially opened store.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let base = config.resolve_base_dir()?;
        let layout = StoreLayout::new(base);
        layout.setup()?;
        let layout = layout.canonicalize()?;

        let robustness = config.robustness();
        let attachments = AttachmentStore::new(layout.attachments_dir(), robustness);
        let assembler = Assembler::new(attachments.clone());
        let credentials = CredentialStore::new(FileDocumentStore::new(layout.fcm_dir(), robustness));

        tracing::debug!(base = %layout.base, "Opened stash");
        Ok(Self {
            config,
            layout,
            attachments,
            assembler,
            credentials,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    /// Replace the assembler, e.g. to switch reassembly policy.
    pub fn set_assembler(&mut self, assembler: Assembler) {
        self.assembler = assembler;
    }

    pub fn credentials(&self) -> &CredentialStore<FileDocumentStore> {
        &self.credentials
    }

    /// A provisioner writing `catalog` into the scripts directory.
    pub fn provisioner<C: ScriptCatalog>(&self, catalog: C) -> ScriptProvisioner<C> {
        ScriptProvisioner::new(self.layout.scripts_dir(), catalog, self.config.robustness())
    }

    /// Write every script of `catalog`, replacing earlier copies.
    pub fn provision<C: ScriptCatalog>(&self, catalog: C) -> Result<ProvisionReport> {
        self.provisioner(catalog).provision()
    }

    /// Range read using the configured default length when `length` is `None`.
    pub fn read_range(&self, path: &NormalizedPath, offset: u64, length: Option<usize>) -> Result<Vec<u8>> {
        self.assembler
            .read_range(path, offset, length.unwrap_or(self.config.read_length))
    }
}
