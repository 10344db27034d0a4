//! Named, typed settings.
//!
//! An entry is created through [`Group::entry`](crate::Group::entry) and
//! handed back to the declaring module as an [`Entry<T>`] handle.  The group
//! keeps a type-erased view of the same entry ([`ConfigEntry`]) so the file
//! reader and writer can work with entries of any type.
//!
//! # Change notification
//!
//! [`Entry::set`] compares the new value with the current one.  Only a real
//! change updates the value, calls the observers in registration order with
//! `(old, new)` and rewrites the owning config file.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{error, warn};

use crate::codec::ConfigValue;
use crate::error::ConfigError;
use crate::group::GroupInner;

/// Callback invoked with `(old, new)` after a value change.
pub(crate) type Observer<T> = Rc<dyn Fn(&T, &T)>;

/// Type-erased view of an entry, independent of its value type.
pub trait ConfigEntry {
    /// The entry's key in its group.
    fn name(&self) -> &str;

    /// `group.entry`, or `.entry` if the group no longer exists.
    fn full_name(&self) -> String;

    /// Advisory flag: the host must restart before a change takes effect.
    fn requires_restart(&self) -> bool;

    /// Comment lines written above the entry.
    fn description(&self) -> &[String];

    /// Rust type name of the stored value.
    fn value_type_name(&self) -> &'static str;

    /// Replaces the current value with one decoded from `text`.
    ///
    /// Never fails: undecodable text resets the entry to its default and logs
    /// a warning.  Observers are not notified and nothing is saved.
    fn load_value(&self, text: &str);

    /// Encodes the current value for the settings file.
    ///
    /// Never fails: a value without a text form is logged and written as an
    /// empty string.
    fn save_value(&self) -> String;

    /// Access to the concrete entry for typed reads.
    fn as_any(&self) -> &dyn Any;
}

impl dyn ConfigEntry {
    /// Reads the current value as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] if the entry was not declared
    /// with value type `T`.
    pub fn get<T: ConfigValue>(&self) -> Result<T, ConfigError> {
        self.as_any()
            .downcast_ref::<EntryState<T>>()
            .map(|state| state.value.borrow().clone())
            .ok_or_else(|| ConfigError::TypeMismatch {
                entry: self.full_name(),
                requested: std::any::type_name::<T>(),
                declared: self.value_type_name(),
            })
    }
}

impl fmt::Debug for dyn ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("name", &self.full_name())
            .field("type", &self.value_type_name())
            .field("value", &self.save_value())
            .finish()
    }
}

/// Shared state behind an [`Entry<T>`] handle.
pub(crate) struct EntryState<T: ConfigValue> {
    name: String,
    group: Weak<GroupInner>,
    requires_restart: bool,
    description: Vec<String>,
    default: T,
    value: RefCell<T>,
    observers: RefCell<Vec<Observer<T>>>,
}

impl<T: ConfigValue> EntryState<T> {
    pub(crate) fn new(
        name: String,
        group: Weak<GroupInner>,
        default: T,
        requires_restart: bool,
        description: Vec<String>,
        observers: Vec<Observer<T>>,
    ) -> Self {
        Self {
            name,
            group,
            requires_restart,
            description,
            value: RefCell::new(default.clone()),
            default,
            observers: RefCell::new(observers),
        }
    }

    /// Rewrites the owning config file.  Failures are logged only; the new
    /// value stays in memory.
    fn save_owner(&self) {
        let Some(config) = self.group.upgrade().and_then(|group| group.config()) else {
            return;
        };
        if let Err(e) = config.save() {
            error!("failed to save config after changing '{}': {e}", self.full_name());
        }
    }
}

impl<T: ConfigValue> ConfigEntry for EntryState<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        let group = self
            .group
            .upgrade()
            .map(|g| g.name().to_string())
            .unwrap_or_default();
        format!("{group}.{}", self.name)
    }

    fn requires_restart(&self) -> bool {
        self.requires_restart
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn load_value(&self, text: &str) {
        let loaded = match T::decode(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "failed to parse config value '{text}' in '{}' as {}: {e}; using default",
                    self.full_name(),
                    self.value_type_name()
                );
                self.default.clone()
            }
        };
        *self.value.borrow_mut() = loaded;
    }

    fn save_value(&self) -> String {
        match self.value.borrow().encode() {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to save config value for '{}': {e}", self.full_name());
                String::new()
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Live handle to a typed setting.
///
/// Cloning the handle is cheap; all clones observe the same value.
pub struct Entry<T: ConfigValue> {
    state: Rc<EntryState<T>>,
}

impl<T: ConfigValue> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: ConfigValue> Entry<T> {
    pub(crate) fn from_state(state: Rc<EntryState<T>>) -> Self {
        Self { state }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// Changes the value.
    ///
    /// Setting the value it already has does nothing.  Otherwise the value is
    /// replaced, every observer runs with `(old, new)` and the owning config
    /// file is rewritten in full.  A failed write is logged; the in-memory
    /// value and the notifications are not rolled back.
    pub fn set(&self, value: T) {
        let old = {
            let mut current = self.state.value.borrow_mut();
            if *current == value {
                return;
            }
            std::mem::replace(&mut *current, value.clone())
        };

        // Snapshot so an observer may register further observers.
        let observers: Vec<Observer<T>> = self.state.observers.borrow().clone();
        for observer in &observers {
            observer(&old, &value);
        }

        self.state.save_owner();
    }

    /// The value the entry was declared with.
    pub fn default_value(&self) -> &T {
        &self.state.default
    }

    /// Appends a change observer.
    pub fn on_changed<F>(&self, observer: F)
    where
        F: Fn(&T, &T) + 'static,
    {
        self.state.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Key written on the `Name = value` line.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// `group.entry`, used in log messages and errors.
    pub fn full_name(&self) -> String {
        self.state.full_name()
    }

    /// Advisory flag: the host applies a change only after a restart.
    pub fn requires_restart(&self) -> bool {
        self.state.requires_restart
    }

    /// Comment lines written above the entry.
    pub fn description(&self) -> &[String] {
        &self.state.description
    }

    /// Type-erased view of this entry, as stored in its group.
    pub fn as_config_entry(&self) -> Rc<dyn ConfigEntry> {
        Rc::clone(&self.state) as Rc<dyn ConfigEntry>
    }
}

impl<T: ConfigValue> fmt::Display for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.state.save_value())
    }
}

impl<T: ConfigValue + fmt::Debug> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.full_name())
            .field("value", &*self.state.value.borrow())
            .field("default", &self.state.default)
            .field("requires_restart", &self.state.requires_restart)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, ConfigEnum};
    use std::cell::Cell;

    /// An entry with no owning group, so `set` never touches the disk.
    fn detached<T: ConfigValue>(name: &str, default: T) -> Entry<T> {
        Entry::from_state(Rc::new(EntryState::new(
            name.to_string(),
            Weak::new(),
            default,
            false,
            Vec::new(),
            Vec::new(),
        )))
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Fast,
        Hidden,
    }

    impl ConfigEnum for Mode {
        const VARIANTS: &'static [(&'static str, Self)] = &[("Fast", Mode::Fast)];
    }
    crate::config_enum!(Mode);

    // ── get / set ─────────────────────────────────────────────────────────────

    #[test]
    fn test_new_entry_starts_at_default() {
        let entry = detached("workers", 4_u32);
        assert_eq!(entry.get(), 4);
        assert_eq!(*entry.default_value(), 4);
    }

    #[test]
    fn test_set_equal_value_does_not_notify() {
        // Arrange
        let entry = detached("workers", 4_u32);
        let calls = Rc::new(Cell::new(0));
        let calls_in_observer = Rc::clone(&calls);
        entry.on_changed(move |_, _| calls_in_observer.set(calls_in_observer.get() + 1));

        // Act
        entry.set(4);

        // Assert
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_set_new_value_notifies_with_old_and_new() {
        // Arrange
        let entry = detached("workers", 4_u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_observer = Rc::clone(&seen);
        entry.on_changed(move |old, new| seen_in_observer.borrow_mut().push((*old, *new)));

        // Act
        entry.set(8);

        // Assert
        assert_eq!(entry.get(), 8);
        assert_eq!(*seen.borrow(), vec![(4, 8)]);
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        // Arrange
        let entry = detached("name", String::from("a"));
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            entry.on_changed(move |_, _| order.borrow_mut().push(tag));
        }

        // Act
        entry.set("b".to_string());

        // Assert
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_observer_may_read_entry_during_notification() {
        // Arrange
        let entry = detached("flag", false);
        let observed = Rc::new(Cell::new(false));
        let (entry_in_observer, observed_in_observer) = (entry.clone(), Rc::clone(&observed));
        entry.on_changed(move |_, _| observed_in_observer.set(entry_in_observer.get()));

        // Act
        entry.set(true);

        // Assert
        assert!(observed.get());
    }

    #[test]
    fn test_clones_share_value() {
        let a = detached("x", 1_i64);
        let b = a.clone();
        a.set(7);
        assert_eq!(b.get(), 7);
    }

    // ── load / save ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_value_replaces_current_value() {
        let entry = detached("ratio", 0.5_f64);
        entry.as_config_entry().load_value("0.75");
        assert_eq!(entry.get(), 0.75);
    }

    #[test]
    fn test_load_value_falls_back_to_default_on_bad_text() {
        // Arrange
        let entry = detached("workers", 4_u16);
        entry.set(9);

        // Act
        entry.as_config_entry().load_value("not-a-number");

        // Assert
        assert_eq!(entry.get(), 4);
    }

    #[test]
    fn test_load_value_does_not_notify_observers() {
        let entry = detached("workers", 4_u16);
        let calls = Rc::new(Cell::new(0));
        let calls_in_observer = Rc::clone(&calls);
        entry.on_changed(move |_, _| calls_in_observer.set(calls_in_observer.get() + 1));

        entry.as_config_entry().load_value("12");

        assert_eq!(entry.get(), 12);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_save_value_encodes_current_value() {
        let entry = detached("enabled", true);
        assert_eq!(entry.as_config_entry().save_value(), "true");
        assert_eq!(entry.to_string(), "true");
    }

    #[test]
    fn test_save_value_is_empty_when_encoding_fails() {
        // Arrange: `Hidden` is not in the variant table.
        let entry = detached("mode", Mode::Fast);
        entry.set(Mode::Hidden);

        // Act
        let text = entry.as_config_entry().save_value();

        // Assert
        assert_eq!(Mode::Hidden.encode(), Err(CodecError::UnknownVariant {
            type_name: std::any::type_name::<Mode>(),
            name: "<unnamed value>".to_string(),
        }));
        assert_eq!(text, "");
    }

    // ── type-erased access ────────────────────────────────────────────────────

    #[test]
    fn test_erased_get_with_declared_type_succeeds() {
        let entry = detached("workers", 4_i32);
        assert_eq!(entry.as_config_entry().get::<i32>().unwrap(), 4);
    }

    #[test]
    fn test_erased_get_with_other_type_is_type_mismatch() {
        // Arrange
        let erased = detached("workers", 4_i32).as_config_entry();

        // Act
        let result = erased.get::<i64>();

        // Assert
        match result {
            Err(ConfigError::TypeMismatch { requested, declared, .. }) => {
                assert_eq!(requested, "i64");
                assert_eq!(declared, "i32");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_detached_entry_full_name_has_empty_group() {
        assert_eq!(detached("orphan", 0_u8).full_name(), ".orphan");
    }
}
