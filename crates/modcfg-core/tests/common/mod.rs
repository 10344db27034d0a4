//! Shared utilities for the integration tests.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Installs a test-friendly `tracing` subscriber once per test binary.
///
/// Level is overridden by `RUST_LOG`; the default shows the warnings emitted
/// for unknown groups and unparsable values.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// A unique scratch directory, removed on drop.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Self {
        init_tracing();
        Self {
            path: std::env::temp_dir().join(format!("modcfg_test_{}", Uuid::new_v4())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.path).ok();
    }
}
