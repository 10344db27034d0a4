//! Small vector/point value types used by game-facing settings.
//!
//! The canonical text form is a parenthesised, comma-separated component list,
//! e.g. `(1.5, -2, 0.25)`.  Decoding tolerates missing parentheses and extra
//! whitespace around components.

use std::fmt;
use std::str::FromStr;

use super::{CodecError, ConfigValue};

/// Splits `text` into exactly `expected` trimmed component strings.
fn split_components<'a>(
    text: &'a str,
    expected: usize,
    type_name: &'static str,
) -> Result<Vec<&'a str>, CodecError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(CodecError::WrongArity {
            type_name,
            expected,
            actual: parts.len(),
        });
    }
    Ok(parts)
}

macro_rules! vector_type {
    ($(#[$meta:meta])* $name:ident, $component:ty, $arity:expr, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(pub $field: $component,)+
        }

        impl $name {
            /// Creates a value from its components.
            pub const fn new($($field: $component),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$field.to_string()),+];
                write!(f, "({})", parts.join(", "))
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                let parts = split_components(text, $arity, stringify!($name))?;
                let mut iter = parts.into_iter();
                Ok(Self {
                    $($field: {
                        let part = iter.next().unwrap_or_default();
                        <$component>::from_str(part)
                            .map_err(|e| CodecError::parse::<$name>(text, e))?
                    },)+
                })
            }
        }

        impl ConfigValue for $name {
            fn encode(&self) -> Result<String, CodecError> {
                Ok(self.to_string())
            }

            fn decode(text: &str) -> Result<Self, CodecError> {
                text.parse()
            }
        }
    };
}

vector_type!(
    /// Two-component floating point vector.
    Vector2, f32, 2, [x, y]
);
vector_type!(
    /// Three-component floating point vector.
    Vector3, f32, 3, [x, y, z]
);
vector_type!(
    /// Four-component floating point vector.
    Vector4, f32, 4, [x, y, z, w]
);
vector_type!(
    /// Two-component integer vector, e.g. a grid coordinate.
    Vector2Int, i32, 2, [x, y]
);
vector_type!(
    /// Three-component integer vector.
    Vector3Int, i32, 3, [x, y, z]
);
vector_type!(
    /// Four-component integer vector.
    Vector4Int, i32, 4, [x, y, z, w]
);
