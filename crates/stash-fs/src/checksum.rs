//! SHA-256 checksums in the `sha256:<hex>` form
//!
//! Used to check a reassembled attachment against what the sender
//! transmitted. [`ChecksumWriter`] hashes while streaming, so large
//! attachments never need a second pass.

use std::io::{self, Write};

use sha2::{Digest, Sha256};

use crate::{NormalizedPath, Result};

const PREFIX: &str = "sha256:";

fn render(hasher: Sha256) -> String {
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of an in-memory buffer.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    render(hasher)
}

/// Checksum of a file's contents.
///
/// A missing file is [`crate::Error::NotFound`].
pub fn compute_file_checksum(path: &NormalizedPath) -> Result<String> {
    let content = crate::io::read_bytes(path)?;
    Ok(compute_checksum(&content))
}

/// A writer that hashes everything passed through to `inner`.
#[derive(Debug)]
pub struct ChecksumWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> ChecksumWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Return the inner writer and the checksum of what it received.
    pub fn finish(self) -> (W, String) {
        (self.inner, render(self.hasher))
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
