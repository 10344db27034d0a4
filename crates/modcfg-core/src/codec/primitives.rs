//! [`ConfigValue`] implementations for `bool`, `char`, the integer widths,
//! floating point and [`Decimal`].
//!
//! Rust's `Display`/`FromStr` for numbers are locale-independent: the decimal
//! separator is always `.` and no grouping characters are emitted, so the
//! files read the same on every machine.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::string::{escape, unescape};
use super::{CodecError, ConfigValue};

impl ConfigValue for bool {
    fn encode(&self) -> Result<String, CodecError> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CodecError::parse::<bool>(text, "expected 'true' or 'false'")),
        }
    }
}

/// Uses the `String` escapes, so whitespace and control characters survive
/// the trim applied when the file is read.
impl ConfigValue for char {
    fn encode(&self) -> Result<String, CodecError> {
        Ok(escape(self.encode_utf8(&mut [0; 4])))
    }

    /// Takes the first character after unescaping; empty text decodes to
    /// `'\0'`. Text that is not a valid escape is taken literally.
    fn decode(text: &str) -> Result<Self, CodecError> {
        let first = match unescape(text) {
            Ok(unescaped) => unescaped.chars().next(),
            Err(_) => text.chars().next(),
        };
        Ok(first.unwrap_or('\0'))
    }
}

/// Implements [`ConfigValue`] through the type's own `Display`/`FromStr`.
macro_rules! display_from_str_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn encode(&self) -> Result<String, CodecError> {
                    Ok(self.to_string())
                }

                fn decode(text: &str) -> Result<Self, CodecError> {
                    <$ty>::from_str(text).map_err(|e| CodecError::parse::<$ty>(text, e))
                }
            }
        )*
    };
}

display_from_str_value!(i8, i16, i32, i64, i128, isize);
display_from_str_value!(u8, u16, u32, u64, u128, usize);
// `Display` for floats prints the shortest text that parses back to the same
// bits, so no precision is lost.
display_from_str_value!(f32, f64);
display_from_str_value!(Decimal);
