//! # modcfg-core
//!
//! Typed, sectioned settings registry for mod frameworks.  Independently
//! developed modules declare named, typed settings grouped into sections; each
//! setting carries a default value, optional change observers and an advisory
//! "requires restart" marker.  Every module's settings are persisted to one
//! human-readable key/value file.
//!
//! # Architecture overview (for beginners)
//!
//! The crate is built leaves-first:
//!
//! - **`codec`** – The closed table of supported value types.  Every type that
//!   can be stored in a setting implements [`ConfigValue`], which turns a value
//!   into the text written after `Name = ` and parses it back.
//!
//! - **`entry`** – One named, typed setting.  [`Entry<T>`] is the live handle
//!   a module keeps around to read and change its value.
//!
//! - **`group`** – A `[Section]` in the file, owning an ordered list of entries.
//!
//! - **`config`** – One file on disk, owning an ordered list of groups.  It
//!   knows how to rewrite the whole file ([`Config::save`]) and how to read it
//!   back ([`Config::load`]).
//!
//! - **`registry`** – Maps a module's stable identifier to its [`Config`].
//!   The host application creates one [`Registry`] and hands it to every
//!   module that needs to register or look up settings.
//!
//! # Example
//!
//! ```rust
//! use modcfg_core::Registry;
//!
//! let root = std::env::temp_dir().join("modcfg_doc_example");
//! let registry = Registry::new(&root);
//! let config = registry.register("mymod").unwrap();
//! let general = config.group("general", &["General settings"]);
//! let workers = general.add_entry("maxWorkers", 4_i32).unwrap();
//!
//! config.load().unwrap();
//! assert_eq!(workers.get(), 4);
//!
//! assert_eq!(registry.get_or_default("mymod", "general", "maxWorkers", 1_i32), 4);
//! assert_eq!(registry.get_or_default("mymod", "general", "missing", 1_i32), 1);
//! # std::fs::remove_dir_all(&root).ok();
//! ```
//!
//! # Threading
//!
//! All handles are single-threaded (`Rc`/`RefCell`).  Settings are declared
//! during start-up and changed in response to user actions on the host's
//! control thread; there is no internal locking.

pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod group;
pub mod path;
pub mod registry;

pub use codec::{
    decode_enum, encode_enum, CodecError, ConfigEnum, ConfigValue, Vector2, Vector2Int, Vector3,
    Vector3Int, Vector4, Vector4Int,
};
pub use config::Config;
pub use entry::{ConfigEntry, Entry};
pub use error::ConfigError;
pub use group::{EntryBuilder, Group};
pub use path::sanitize_file_name;
pub use registry::Registry;

/// Re-exported so callers can declare `Decimal` settings without adding the
/// dependency themselves.
pub use rust_decimal::Decimal;
