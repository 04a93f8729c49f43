//! Subscriber setup for applications embedding the store
//!
//! Library code only emits events; installing a subscriber is left to the
//! binary. Targets are `stash_core::*` and `stash_fs::*`, so
//! `RUST_LOG=stash_core::assembler=debug` narrows output to reassembly.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a compact stderr subscriber filtered by `RUST_LOG`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with_default(DEFAULT_FILTER)
}

/// Like [`init`], with `default` as the filter when `RUST_LOG` is unset.
///
/// Fails if `default` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_with_default(default: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default)?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
