//! Attachment commands: save, chunk, remove, purge, reconstruct, read-range

use std::fs::File;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use stash_core::{Removal, Stash};
use stash_fs::checksum::{ChecksumWriter, compute_checksum};
use stash_fs::{NormalizedPath, io};

use crate::error::Result;

/// Run the save command
pub fn run_save(stash: &Stash, name: &str, file: &Path) -> Result<()> {
    let bytes = io::read_bytes(&NormalizedPath::new(file))?;
    let path = stash.attachments().save_whole(name, &bytes)?;

    println!(
        "{} {} ({} bytes, {})",
        "Saved".green().bold(),
        path,
        bytes.len(),
        compute_checksum(&bytes).dimmed()
    );
    Ok(())
}

/// Run the save-chunk command
pub fn run_save_chunk(stash: &Stash, guid: &str, index: u32, file: &Path) -> Result<()> {
    let bytes = io::read_bytes(&NormalizedPath::new(file))?;
    let path = stash.attachments().save_chunk(guid, index, &bytes)?;

    println!(
        "{} chunk {} of {} ({} bytes)",
        "Saved".green().bold(),
        index,
        guid.cyan(),
        bytes.len()
    );
    tracing::debug!(path = %path, "Chunk written");
    Ok(())
}

/// Run the delete-chunks command
pub fn run_delete_chunks(stash: &Stash, guid: &str) -> Result<()> {
    if stash.attachments().delete_chunks(guid)? {
        println!("{} chunks of {}", "Deleted".green().bold(), guid.cyan());
    } else {
        println!("{} no chunks stored for {}", "Nothing to do:".dimmed(), guid.cyan());
    }
    Ok(())
}

/// Run the remove command
///
/// Removal is best-effort; a failure is reported as a warning and the
/// command still succeeds.
pub fn run_remove(stash: &Stash, name: &str) -> Result<()> {
    match stash.attachments().remove_whole(name) {
        Removal::Removed => println!("{} {}", "Removed".green().bold(), name),
        Removal::Failed(e) => eprintln!("{} could not remove {}: {}", "warning:".yellow().bold(), name, e),
    }
    Ok(())
}

/// Run the purge command
pub fn run_purge(stash: &Stash) -> Result<()> {
    let report = stash.attachments().purge_all()?;

    println!(
        "{} {} attachment entries",
        "Purged".green().bold(),
        report.removed.len()
    );
    for failure in &report.failed {
        eprintln!(
            "{} could not remove {}: {}",
            "warning:".yellow().bold(),
            failure.name,
            failure.error
        );
    }
    Ok(())
}

/// Run the reconstruct command
///
/// Chunks stream straight to the destination; the checksum is computed on
/// the way through.
pub fn run_reconstruct(stash: &Stash, guid: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(out) => {
            let mut writer = ChecksumWriter::new(File::create(out)?);
            let written = match stash.assembler().reconstruct_to(guid, &mut writer) {
                Ok(written) => written,
                Err(e) => {
                    drop(writer);
                    let _ = std::fs::remove_file(out);
                    return Err(e.into());
                }
            };
            let (file, checksum) = writer.finish();
            file.sync_all()?;

            println!(
                "{} {} -> {} ({} bytes, {})",
                "Reconstructed".green().bold(),
                guid.cyan(),
                out.display(),
                written,
                checksum.dimmed()
            );
        }
        None => {
            let mut writer = ChecksumWriter::new(std::io::stdout().lock());
            stash.assembler().reconstruct_to(guid, &mut writer)?;
            let (mut stdout, checksum) = writer.finish();
            stdout.flush()?;
            eprintln!("{}", checksum);
        }
    }
    Ok(())
}

/// Run the read-range command
pub fn run_read_range(
    stash: &Stash,
    file: &Path,
    offset: u64,
    length: Option<usize>,
    out: Option<&Path>,
) -> Result<()> {
    let bytes = stash.read_range(&NormalizedPath::new(file), offset, length)?;

    match out {
        Some(out) => {
            std::fs::write(out, &bytes)?;
            println!(
                "{} {} bytes at offset {} -> {} ({})",
                "Read".green().bold(),
                bytes.len(),
                offset,
                out.display(),
                compute_checksum(&bytes).dimmed()
            );
        }
        None => {
            write_stdout(&bytes)?;
            eprintln!("{}", compute_checksum(&bytes));
        }
    }
    Ok(())
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
