//! `[Section]`s of a settings file.
//!
//! A group owns its entries in declaration order; that order is the order in
//! which they are written to disk.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::codec::ConfigValue;
use crate::config::{Config, ConfigInner};
use crate::entry::{ConfigEntry, Entry, EntryState, Observer};
use crate::error::ConfigError;

/// Shared state behind a [`Group`] handle.
pub(crate) struct GroupInner {
    name: String,
    description: Vec<String>,
    config: Weak<ConfigInner>,
    entries: RefCell<Vec<Rc<dyn ConfigEntry>>>,
}

impl GroupInner {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// The owning config, if it is still alive.
    pub(crate) fn config(&self) -> Option<Config> {
        self.config.upgrade().map(Config::from_inner)
    }
}

/// Handle to a named section of a [`Config`].
#[derive(Clone)]
pub struct Group {
    inner: Rc<GroupInner>,
}

impl Group {
    pub(crate) fn new(name: String, description: Vec<String>, config: Weak<ConfigInner>) -> Self {
        Self {
            inner: Rc::new(GroupInner {
                name,
                description,
                config,
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Section name, as written between the brackets.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Comment lines written above the section header.
    pub fn description(&self) -> &[String] {
        &self.inner.description
    }

    /// The config this group belongs to.
    pub fn config(&self) -> Option<Config> {
        self.inner.config()
    }

    /// Starts declaring a typed entry.  Nothing is registered until
    /// [`EntryBuilder::build`] is called.
    pub fn entry<T: ConfigValue>(&self, name: impl Into<String>, default: T) -> EntryBuilder<'_, T> {
        EntryBuilder {
            group: self,
            name: name.into(),
            default,
            requires_restart: false,
            description: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Declares an entry with no description, observers or restart flag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateName`] if the name is already taken in
    /// this group.
    pub fn add_entry<T: ConfigValue>(
        &self,
        name: impl Into<String>,
        default: T,
    ) -> Result<Entry<T>, ConfigError> {
        self.entry(name, default).build()
    }

    /// Looks up an entry by exact name.
    pub fn find_entry(&self, name: &str) -> Option<Rc<dyn ConfigEntry>> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|e| e.name() == name)
            .cloned()
    }

    /// Snapshot of the entries in declaration order.
    pub fn entries(&self) -> Vec<Rc<dyn ConfigEntry>> {
        self.inner.entries.borrow().clone()
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns `true` if no entry has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Returns `true` if both handles refer to the same group.
    pub fn ptr_eq(&self, other: &Group) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Writes every entry: a blank line, its `# ` description lines, then
    /// `Name = value`.
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for entry in self.inner.entries.borrow().iter() {
            writeln!(writer)?;
            for line in entry.description() {
                writeln!(writer, "# {line}")?;
            }
            writeln!(writer, "{} = {}", entry.name(), entry.save_value())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.inner.name)
            .field("entries", &self.len())
            .finish()
    }
}

/// Declaration of a typed entry, returned by [`Group::entry`].
#[must_use = "the entry is only declared once `build` is called"]
pub struct EntryBuilder<'g, T: ConfigValue> {
    group: &'g Group,
    name: String,
    default: T,
    requires_restart: bool,
    description: Vec<String>,
    observers: Vec<Observer<T>>,
}

impl<'g, T: ConfigValue> EntryBuilder<'g, T> {
    /// Marks the entry as only taking effect after the host restarts.
    pub fn requires_restart(mut self, requires_restart: bool) -> Self {
        self.requires_restart = requires_restart;
        self
    }

    /// Comment lines written above the entry.
    pub fn description(mut self, lines: &[&str]) -> Self {
        self.description = lines.iter().map(|l| (*l).to_string()).collect();
        self
    }

    /// Adds an observer called with `(old, new)` on every value change.
    pub fn on_changed<F>(mut self, observer: F) -> Self
    where
        F: Fn(&T, &T) + 'static,
    {
        self.observers.push(Rc::new(observer));
        self
    }

    /// Registers the entry in its group and returns the live handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateName`] if the group already has an
    /// entry with this name.
    pub fn build(self) -> Result<Entry<T>, ConfigError> {
        let group = &self.group.inner;
        let mut entries = group.entries.borrow_mut();
        if entries.iter().any(|e| e.name() == self.name) {
            return Err(ConfigError::DuplicateName {
                group: group.name.clone(),
                name: self.name,
            });
        }

        let state = Rc::new(EntryState::new(
            self.name,
            Rc::downgrade(group),
            self.default,
            self.requires_restart,
            self.description,
            self.observers,
        ));
        entries.push(Rc::clone(&state) as Rc<dyn ConfigEntry>);
        debug!("declared config entry '{}'", state.full_name());

        Ok(Entry::from_state(state))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
