//! Configuration management for `PocketLedger`.
//!
//! Settings are environment-variable driven, with an optional `.env` file
//! loaded via `dotenvy`. The crate never installs a tracing subscriber on its
//! own; embedding binaries call [`init_tracing`] once at startup.

/// Database URL resolution, connection and schema creation
pub mod database;

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info`. Intended for embedding binaries; calling it twice
/// panics, so the library itself never invokes it.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
