//! Provision command implementation

use std::path::Path;

use colored::Colorize;
use stash_core::{ManifestCatalog, Stash};

use crate::error::Result;

/// Run the provision command
pub fn run_provision(stash: &Stash, catalog: &Path) -> Result<()> {
    let report = stash.provision(ManifestCatalog::new(catalog))?;

    println!("{}", "Provisioned scripts".bold());
    if report.scripts.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for script in &report.scripts {
        let status = if script.replaced {
            "replaced".yellow()
        } else {
            "new".green()
        };
        println!("  {} {} ({})", "+".green(), script.name.cyan(), status);
    }
    Ok(())
}
