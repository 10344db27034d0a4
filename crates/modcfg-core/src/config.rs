//! One settings file and the groups declared in it.
//!
//! # File format
//!
//! ```text
//!
//!
//! # General settings
//! [general]
//!
//! # Number of worker threads.
//! maxWorkers = 8
//!
//! enableFoo = false
//! ```
//!
//! - Lines whose trimmed text starts with `#` are comments.
//! - `[Name]` on its own line starts a section.
//! - `key = value` lines are split on the first `=`; key and value are
//!   trimmed.
//! - Blank lines and anything unrecognised are ignored when reading.
//!
//! [`Config::save`] always rewrites the whole file from the declared groups
//! and entries, so comments and unknown keys added by hand are dropped on the
//! next save.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::group::Group;

/// Shared state behind a [`Config`] handle.
pub(crate) struct ConfigInner {
    identifier: String,
    path: PathBuf,
    groups: RefCell<Vec<Group>>,
}

/// Handle to one persisted settings file.
///
/// Created by [`Registry::register`](crate::Registry::register).  Cloning the
/// handle is cheap; all clones refer to the same config.
#[derive(Clone)]
pub struct Config {
    inner: Rc<ConfigInner>,
}

impl Config {
    pub(crate) fn new(identifier: String, path: PathBuf) -> Self {
        Self {
            inner: Rc::new(ConfigInner {
                identifier,
                path,
                groups: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<ConfigInner>) -> Self {
        Self { inner }
    }

    /// The identifier this config was registered under.
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Returns the group called `name`, declaring it first if needed.
    ///
    /// Repeated calls with the same name return the same group.  The
    /// description given on the first call is kept; later descriptions are
    /// ignored.
    pub fn group(&self, name: &str, description: &[&str]) -> Group {
        if let Some(existing) = self.find_group(name) {
            return existing;
        }

        let group = Group::new(
            name.to_string(),
            description.iter().map(|l| (*l).to_string()).collect(),
            Rc::downgrade(&self.inner),
        );
        self.inner.groups.borrow_mut().push(group.clone());
        group
    }

    /// Looks up a declared group by exact name.
    pub fn find_group(&self, name: &str) -> Option<Group> {
        self.inner
            .groups
            .borrow()
            .iter()
            .find(|g| g.name() == name)
            .cloned()
    }

    /// Snapshot of the groups in declaration order.
    pub fn groups(&self) -> Vec<Group> {
        self.inner.groups.borrow().clone()
    }

    /// Returns `true` if both handles refer to the same config.
    pub fn ptr_eq(&self, other: &Config) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Rewrites the backing file from the current values.
    ///
    /// The parent directory is created if missing.  The file is written in a
    /// single pass through a buffered handle that is closed when this function
    /// returns, on success or failure.  The write is not atomic: a crash part
    /// way through can leave a truncated file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory or file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = &self.inner.path;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        debug!("saved config '{}' to '{}'", self.identifier(), path.display());
        Ok(())
    }

    /// Reads values for the declared entries from the backing file.
    ///
    /// A missing file is not an error: every entry keeps its current value.
    /// Content problems never abort the load (see [`Config::load_from_str`]).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<(), ConfigError> {
        let path = &self.inner.path;

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config file at '{}'; keeping defaults", path.display());
                return Ok(());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        debug!(
            "loading {} lines from config file '{}'",
            text.lines().count(),
            path.display()
        );
        self.load_from_str(&text);
        Ok(())
    }

    /// Applies settings file text to the declared entries.
    ///
    /// Lines are processed in order with a "current group" that starts unset.
    /// A header for an undeclared group logs a warning and unsets the current
    /// group, so its keys are skipped until the next known header.  Unknown
    /// keys and malformed lines are skipped.  Values that fail to decode reset
    /// their entry to its default.
    pub fn load_from_str(&self, text: &str) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut current: Option<Group> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') {
                if trimmed.len() < 2 || !trimmed.ends_with(']') {
                    continue;
                }
                let name = &trimmed[1..trimmed.len() - 1];
                current = self.find_group(name);
                if current.is_none() {
                    warn!(
                        "group '{name}' not found in config '{}' ({})",
                        self.identifier(),
                        self.inner.path.display()
                    );
                }
                continue;
            }

            let Some(group) = current.as_ref() else {
                continue;
            };
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };

            let key = key.trim();
            match group.find_entry(key) {
                Some(entry) => entry.load_value(value.trim()),
                None => debug!("ignoring unknown key '{key}' in group '{}'", group.name()),
            }
        }
    }

    /// Renders the file content [`Config::save`] would write.
    pub fn to_file_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Writes every group: two blank lines, its `# ` description lines, the
    /// `[Name]` header, then its entries.
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in self.inner.groups.borrow().iter() {
            writeln!(writer)?;
            writeln!(writer)?;
            for line in group.description() {
                writeln!(writer, "# {line}")?;
            }
            writeln!(writer, "[{}]", group.name())?;
            group.write_to(writer)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("identifier", &self.inner.identifier)
            .field("path", &self.inner.path)
            .field("groups", &*self.inner.groups.borrow())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, Vector2Int};

    fn make_config() -> (Registry, Config) {
        let registry = Registry::new(std::env::temp_dir().join("modcfg_config_unit"));
        let config = registry.register("config-tests").unwrap();
        (registry, config)
    }

    // ── group declaration ─────────────────────────────────────────────────────

    #[test]
    fn test_group_is_idempotent_and_first_description_wins() {
        // Arrange
        let (_registry, config) = make_config();

        // Act
        let first = config.group("general", &["first"]);
        let second = config.group("general", &["second", "ignored"]);

        // Assert
        assert!(first.ptr_eq(&second));
        assert_eq!(second.description(), ["first".to_string()]);
        assert_eq!(config.groups().len(), 1);
    }

    #[test]
    fn test_groups_keep_declaration_order() {
        let (_registry, config) = make_config();
        config.group("b", &[]);
        config.group("a", &[]);
        let names: Vec<String> = config.groups().iter().map(|g| g.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_file_string_matches_documented_layout() {
        // Arrange
        let (_registry, config) = make_config();
        let general = config.group("general", &["General settings"]);
        general
            .entry("maxWorkers", 4_i32)
            .description(&["Number of worker threads."])
            .build()
            .unwrap();
        general.add_entry("enableFoo", false).unwrap();
        config.group("empty", &[]);

        // Act
        let text = config.to_file_string();

        // Assert
        assert_eq!(
            text,
            "\n\n# General settings\n[general]\n\n# Number of worker threads.\nmaxWorkers = 4\n\nenableFoo = false\n\n\n[empty]\n"
        );
    }

    // ── parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_load_from_str_applies_known_keys() {
        // Arrange
        let (_registry, config) = make_config();
        let general = config.group("general", &[]);
        let workers = general.add_entry("maxWorkers", 4_i32).unwrap();
        let origin = general.add_entry("origin", Vector2Int::new(0, 0)).unwrap();

        // Act
        config.load_from_str("[general]\n  maxWorkers   =   12  \norigin = (3, -4)\n");

        // Assert
        assert_eq!(workers.get(), 12);
        assert_eq!(origin.get(), Vector2Int::new(3, -4));
    }

    #[test]
    fn test_load_from_str_ignores_keys_before_any_header() {
        let (_registry, config) = make_config();
        let workers = config.group("general", &[]).add_entry("maxWorkers", 4_i32).unwrap();

        config.load_from_str("maxWorkers = 99\n[general]\n");

        assert_eq!(workers.get(), 4);
    }

    #[test]
    fn test_load_from_str_skips_section_of_unknown_group() {
        // Arrange
        let (_registry, config) = make_config();
        let general = config.group("general", &[]);
        let workers = general.add_entry("maxWorkers", 4_i32).unwrap();

        // Act: `maxWorkers` under [other] must not leak into [general].
        config.load_from_str("[general]\nmaxWorkers = 5\n[other]\nmaxWorkers = 6\n");

        // Assert
        assert_eq!(workers.get(), 5);
    }

    #[test]
    fn test_load_from_str_resumes_at_next_known_header() {
        let (_registry, config) = make_config();
        let workers = config.group("general", &[]).add_entry("maxWorkers", 4_i32).unwrap();

        config.load_from_str("[ghost]\nmaxWorkers = 6\n[general]\nmaxWorkers = 7\n");

        assert_eq!(workers.get(), 7);
    }

    #[test]
    fn test_load_from_str_survives_malformed_lines() {
        // Arrange
        let (_registry, config) = make_config();
        let general = config.group("general", &[]);
        let workers = general.add_entry("maxWorkers", 4_i32).unwrap();
        let flag = general.add_entry("enableFoo", false).unwrap();

        // Act
        config.load_from_str(
            "[\n[general\n]\n[general]\njust some words\n= orphan value\nunknown = 1\n   # comment = 3\nmaxWorkers = 1 = 2\nenableFoo = true\n",
        );

        // Assert: "1 = 2" is not an integer, so maxWorkers falls back.
        assert_eq!(workers.get(), 4);
        assert!(flag.get());
    }

    #[test]
    fn test_load_from_str_value_keeps_later_equals_signs() {
        let (_registry, config) = make_config();
        let expr = config.group("general", &[]).add_entry("expr", String::new()).unwrap();

        config.load_from_str("[general]\nexpr = a=b\n");

        assert_eq!(expr.get(), "a=b");
    }

    #[test]
    fn test_load_from_str_strips_byte_order_mark() {
        let (_registry, config) = make_config();
        let flag = config.group("general", &[]).add_entry("enableFoo", false).unwrap();

        config.load_from_str("\u{feff}[general]\nenableFoo = true\n");

        assert!(flag.get());
    }

    #[test]
    fn test_load_from_str_resets_bad_value_to_default() {
        // Arrange
        let (_registry, config) = make_config();
        let workers = config.group("general", &[]).add_entry("maxWorkers", 4_i32).unwrap();
        config.load_from_str("[general]\nmaxWorkers = 10\n");

        // Act
        config.load_from_str("[general]\nmaxWorkers = lots\n");

        // Assert
        assert_eq!(workers.get(), 4);
    }

    #[test]
    fn test_load_of_missing_file_keeps_defaults() {
        // Arrange
        let registry = Registry::new(
            std::env::temp_dir().join("modcfg_definitely_missing_dir").join("nested"),
        );
        let config = registry.register("absent").unwrap();
        let workers = config.group("general", &[]).add_entry("maxWorkers", 4_i32).unwrap();

        // Act
        let result = config.load();

        // Assert
        assert!(result.is_ok());
        assert_eq!(workers.get(), 4);
    }
}
