//! Identifier → [`Config`] registry.
//!
//! The host application creates one [`Registry`] during start-up and passes it
//! by reference to every module that declares or reads settings.  Each module
//! registers its config under a stable identifier (typically its GUID or
//! reverse-DNS name); identifiers are unique for the registry's lifetime and
//! are never removed.
//!
//! Config files live directly under the registry's root directory and are
//! named `<sanitized identifier>.ini`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{info, warn};

use crate::codec::ConfigValue;
use crate::config::Config;
use crate::entry::ConfigEntry;
use crate::error::ConfigError;
use crate::group::Group;
use crate::path::sanitize_file_name;

/// Directory, relative to the working directory, used by [`Registry::default`].
pub const DEFAULT_CONFIG_DIR: &str = "Config";

/// Extension of every config file.
pub const CONFIG_FILE_EXTENSION: &str = "ini";

/// Registry of all configs known to the host.
pub struct Registry {
    root: PathBuf,
    configs: RefCell<Vec<Config>>,
}

impl Registry {
    /// Creates an empty registry whose files live under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            configs: RefCell::new(Vec::new()),
        }
    }

    /// Directory holding the config files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a config registered as `identifier` is stored at.
    pub fn config_path(&self, identifier: &str) -> PathBuf {
        self.root.join(format!(
            "{}.{CONFIG_FILE_EXTENSION}",
            sanitize_file_name(identifier, "_")
        ))
    }

    /// Registers a new, empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateIdentifier`] if `identifier` is taken.
    pub fn register(&self, identifier: &str) -> Result<Config, ConfigError> {
        if self.config(identifier).is_some() {
            return Err(ConfigError::DuplicateIdentifier(identifier.to_string()));
        }

        let path = self.config_path(identifier);
        if let Some(other) = self.configs.borrow().iter().find(|c| c.path() == path) {
            warn!(
                "config '{identifier}' shares file '{}' with config '{}'",
                path.display(),
                other.identifier()
            );
        }

        let config = Config::new(identifier.to_string(), path);
        info!("registered config '{identifier}' at '{}'", config.path().display());
        self.configs.borrow_mut().push(config.clone());
        Ok(config)
    }

    /// Looks up a config by identifier.
    pub fn config(&self, identifier: &str) -> Option<Config> {
        self.configs
            .borrow()
            .iter()
            .find(|c| c.identifier() == identifier)
            .cloned()
    }

    /// Looks up a group, or `None` if the config or group is missing.
    pub fn group(&self, identifier: &str, group_name: &str) -> Option<Group> {
        self.config(identifier)?.find_group(group_name)
    }

    /// Looks up an entry, or `None` if any step of the path is missing.
    pub fn entry(
        &self,
        identifier: &str,
        group_name: &str,
        entry_name: &str,
    ) -> Option<Rc<dyn ConfigEntry>> {
        self.group(identifier, group_name)?.find_entry(entry_name)
    }

    /// Reads a value by path, returning `fallback` on any failure.
    ///
    /// A missing config, group or entry, or an entry declared with a type other
    /// than `T`, all yield `fallback`.  This never reports an error.
    pub fn get_or_default<T: ConfigValue>(
        &self,
        identifier: &str,
        group_name: &str,
        entry_name: &str,
        fallback: T,
    ) -> T {
        self.entry(identifier, group_name, entry_name)
            .and_then(|entry| entry.get::<T>().ok())
            .unwrap_or(fallback)
    }

    /// Snapshot of all configs in registration order.
    pub fn configs(&self) -> Vec<Config> {
        self.configs.borrow().clone()
    }

    /// Number of registered configs.
    pub fn len(&self) -> usize {
        self.configs.borrow().len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.configs.borrow().is_empty()
    }
}

impl Default for Registry {
    /// Files under `./Config`, resolved against the current directory.
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(cwd.join(DEFAULT_CONFIG_DIR))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("root", &self.root)
            .field("configs", &*self.configs.borrow())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
