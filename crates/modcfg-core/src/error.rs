//! Errors surfaced to callers of the registry API.
//!
//! Only programmer errors (duplicate registrations, typed reads with the wrong
//! type) and explicit file-system failures are returned.  Problems caused by
//! file content are logged and recovered from inside [`Config::load`].
//!
//! [`Config::load`]: crate::Config::load

use std::path::PathBuf;

use thiserror::Error;

/// Error type for registry, group, entry and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config with this identifier is already registered.
    #[error("config '{0}' already exists")]
    DuplicateIdentifier(String),

    /// An entry with this name is already declared in the group.
    #[error("config entry '{name}' already exists in group '{group}'")]
    DuplicateName { group: String, name: String },

    /// A typed read asked for a different type than the entry was declared with.
    #[error("type mismatch for '{entry}': requested {requested}, declared {declared}")]
    TypeMismatch {
        entry: String,
        requested: &'static str,
        declared: &'static str,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
