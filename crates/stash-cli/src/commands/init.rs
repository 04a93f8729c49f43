//! Init command implementation

use std::path::Path;

use colored::Colorize;
use stash_core::Stash;
use stash_fs::StoreDir;

use crate::error::Result;

/// Run the init command
///
/// Opening the store already created the layout; this reports it and
/// optionally provisions scripts.
pub fn run_init(stash: &Stash, catalog: Option<&Path>) -> Result<()> {
    let layout = stash.layout();
    layout.validate()?;

    println!("{} {}", "Initialized".green().bold(), layout.base);
    for dir in StoreDir::ALL {
        println!("  {} {}", "+".green(), layout.dir(dir));
    }

    if let Some(catalog) = catalog {
        println!();
        super::run_provision(stash, catalog)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::StoreConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_reports_layout() {
        let temp = TempDir::new().unwrap();
        let stash = Stash::open(StoreConfig::at(temp.path().join("s"))).unwrap();
        assert!(run_init(&stash, None).is_ok());
    }

    #[test]
    fn test_init_with_missing_catalog_fails() {
        let temp = TempDir::new().unwrap();
        let stash = Stash::open(StoreConfig::at(temp.path().join("s"))).unwrap();
        assert!(run_init(&stash, Some(&temp.path().join("missing.toml"))).is_err());
    }
}
