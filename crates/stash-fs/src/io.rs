//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Number of bytes returned by a range read when the caller does not ask
/// for a specific length.
pub const DEFAULT_READ_LENGTH: usize = 1024;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Tuning knobs for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the temp file's advisory lock.
    pub lock_timeout: Duration,
    /// Flush file contents to disk before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// write. Each writer locks its own uniquely named temp file, so writers
/// never wait on each other; concurrent writes to the same path are
/// last-rename-wins.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let result = write_temp(&temp_path, &native_path, content, config)
        .and_then(|()| fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    tracing::trace!(path = %path, bytes = content.len(), "atomic write");
    result
}

fn write_temp(temp_path: &Path, target: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    acquire_lock(&temp_file, config.lock_timeout).map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if config.enable_fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })
}

fn acquire_lock(file: &File, timeout: Duration) -> std::io::Result<()> {
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(5))
        .with_max_interval(Duration::from_millis(100))
        .with_max_elapsed_time(Some(timeout))
        .build();

    backoff::retry(policy, || {
        file.try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    })
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io_or_not_found(&native_path, e))
}

/// Read the whole file as bytes.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io_or_not_found(&native_path, e))
}

/// Write text content to a file atomically with default robustness.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Read up to `length` bytes starting at `offset`.
///
/// An offset past the end of the file is clamped to the file size, so the
/// result is empty (or short) rather than an error.
pub fn read_range(path: &NormalizedPath, offset: u64, length: usize) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    let mut file = File::open(&native_path).map_err(|e| Error::io_or_not_found(&native_path, e))?;
    let size = file
        .metadata()
        .map_err(|e| Error::io(&native_path, e))?
        .len();

    let start = offset.min(size);
    file.seek(SeekFrom::Start(start))
        .map_err(|e| Error::io(&native_path, e))?;

    let available = usize::try_from(size - start).unwrap_or(usize::MAX);
    let mut buf = Vec::with_capacity(length.min(available));
    file.take(length as u64)
        .read_to_end(&mut buf)
        .map_err(|e| Error::io(&native_path, e))?;
    Ok(buf)
}

/// Create a single directory unless it already exists.
///
/// Returns `true` when the directory was created by this call. A
/// non-directory occupying the path is a layout error.
pub fn ensure_dir(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::create_dir(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if native_path.is_dir() {
                Ok(false)
            } else {
                Err(Error::LayoutValidation {
                    message: format!("{} exists but is not a directory", path),
                })
            }
        }
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Recursively remove a directory. Returns `false` when it was already absent.
pub fn remove_dir_all_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::remove_dir_all(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Remove a file. Returns `false` when it was already absent.
pub fn remove_file_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::remove_file(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}
