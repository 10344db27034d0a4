//! The closed table of value types a setting may hold.
//!
//! Each supported type implements [`ConfigValue`]: `encode` produces the text
//! written after `Name = ` in the settings file and `decode` parses it back.
//! The table is fixed at build time.  Supporting a new value type means adding
//! an implementation here; there is no run-time registration.
//!
//! | category            | text form                                      |
//! |---------------------|------------------------------------------------|
//! | `bool`              | `true` / `false` (case-sensitive)              |
//! | `char`              | the character, escaped like `String`           |
//! | integers            | decimal digits                                 |
//! | `f32`, `f64`        | shortest round-trip decimal, `.` separator     |
//! | [`Decimal`]         | decimal text, scale preserved                  |
//! | `String`            | escaped text (see [`string`])                  |
//! | enums               | symbolic variant name (see [`enums`])          |
//! | vector types        | `(x, y)`, `(x, y, z)`, `(x, y, z, w)`          |
//!
//! [`Decimal`]: rust_decimal::Decimal

pub mod enums;
pub mod primitives;
pub mod string;
pub mod vector;

pub use enums::{decode_enum, encode_enum, ConfigEnum};
pub use vector::{Vector2, Vector2Int, Vector3, Vector3Int, Vector4, Vector4Int};

use thiserror::Error;

/// Errors produced while converting a value to or from its text form.
///
/// These never escape an [`Entry`](crate::Entry): a failed decode resets the
/// entry to its default and a failed encode writes an empty value.  Both are
/// logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The text is not a valid representation of the target type.
    #[error("cannot parse '{input}' as {type_name}: {reason}")]
    Parse {
        type_name: &'static str,
        input: String,
        reason: String,
    },

    /// A string value contains a backslash sequence that has no meaning.
    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),

    /// An enum name (on decode) or value (on encode) is missing from the
    /// type's variant table.
    #[error("unknown {type_name} variant '{name}'")]
    UnknownVariant {
        type_name: &'static str,
        name: String,
    },

    /// A vector value has the wrong number of components.
    #[error("expected {expected} components for {type_name}, got {actual}")]
    WrongArity {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl CodecError {
    /// Builds a [`CodecError::Parse`] for `T` from any displayable parse error.
    pub(crate) fn parse<T>(input: &str, reason: impl std::fmt::Display) -> Self {
        CodecError::Parse {
            type_name: std::any::type_name::<T>(),
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A type that can be stored in a settings entry.
///
/// `Clone` is required because [`Entry::get`](crate::Entry::get) hands out
/// copies, `PartialEq` because [`Entry::set`](crate::Entry::set) skips
/// no-op changes.
pub trait ConfigValue: Clone + PartialEq + 'static {
    /// Renders the value as the text stored in the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the value has no text form (for example an
    /// enum value missing from its variant table).
    fn encode(&self) -> Result<String, CodecError>;

    /// Parses a value from already-trimmed settings file text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when `text` is not a valid representation.
    fn decode(text: &str) -> Result<Self, CodecError>;
}
