//! Credential command implementation

use std::io::Read;

use colored::Colorize;
use serde_json::Value;
use stash_core::{CredentialKind, Stash};
use stash_fs::{NormalizedPath, io};

use crate::cli::CredentialAction;
use crate::error::{CliError, Result};

/// Run the credential command
pub fn run_credential(stash: &Stash, action: CredentialAction) -> Result<()> {
    let credentials = stash.credentials();

    match action {
        CredentialAction::Get { kind } => {
            let kind = CredentialKind::from(kind);
            match credentials.get(kind)? {
                Some(doc) => {
                    let pretty = serde_json::to_string_pretty(&doc)
                        .map_err(|e| CliError::user(format!("cannot format {} credentials: {}", kind, e)))?;
                    println!("{}", pretty);
                }
                None => eprintln!("{} {} credentials are not configured", "note:".dimmed(), kind),
            }
        }
        CredentialAction::Set { kind, file } => {
            let kind = CredentialKind::from(kind);
            let content = match file {
                Some(file) => io::read_text(&NormalizedPath::new(file))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let doc = parse_document(&content)?;
            credentials.set(kind, &doc)?;
            println!("{} {} credentials", "Stored".green().bold(), kind);
        }
        CredentialAction::Clear { kind } => {
            let kind = CredentialKind::from(kind);
            if credentials.clear(kind)? {
                println!("{} {} credentials", "Cleared".green().bold(), kind);
            } else {
                println!("{} {} credentials were not configured", "Nothing to do:".dimmed(), kind);
            }
        }
    }
    Ok(())
}

fn parse_document(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| CliError::user(format!("credential document is not valid JSON: {}", e)))
}
