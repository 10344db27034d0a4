//! The shared enum codec.
//!
//! Enumerations are stored by symbolic name.  A caller-defined enum opts in by
//! implementing [`ConfigEnum`] (its name ⇄ value table) and invoking
//! [`config_enum!`](crate::config_enum), which routes both directions through
//! [`encode_enum`] and [`decode_enum`].  Every enum type therefore shares one
//! codec instead of carrying its own.
//!
//! ```rust
//! use modcfg_core::{config_enum, ConfigEnum, ConfigValue};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Quality {
//!     Low,
//!     High,
//! }
//!
//! impl ConfigEnum for Quality {
//!     const VARIANTS: &'static [(&'static str, Self)] =
//!         &[("Low", Quality::Low), ("High", Quality::High)];
//! }
//! config_enum!(Quality);
//!
//! assert_eq!(Quality::High.encode().unwrap(), "High");
//! assert_eq!(Quality::decode("low").unwrap(), Quality::Low);
//! ```

use super::CodecError;

/// Name ⇄ value table for an enum stored in settings.
pub trait ConfigEnum: Copy + PartialEq + 'static {
    /// Every storable variant with its symbolic name.  Names are matched
    /// case-insensitively on decode, so they must differ by more than case.
    const VARIANTS: &'static [(&'static str, Self)];
}

/// Writes the symbolic name of `value`.
///
/// # Errors
///
/// Returns [`CodecError::UnknownVariant`] if `value` is missing from
/// [`ConfigEnum::VARIANTS`].
pub fn encode_enum<E: ConfigEnum>(value: &E) -> Result<String, CodecError> {
    E::VARIANTS
        .iter()
        .find(|(_, v)| v == value)
        .map(|(name, _)| (*name).to_string())
        .ok_or_else(|| CodecError::UnknownVariant {
            type_name: std::any::type_name::<E>(),
            name: "<unnamed value>".to_string(),
        })
}

/// Finds the variant whose name matches `text`, ignoring ASCII case.
///
/// # Errors
///
/// Returns [`CodecError::UnknownVariant`] when no name matches.
pub fn decode_enum<E: ConfigEnum>(text: &str) -> Result<E, CodecError> {
    E::VARIANTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|(_, v)| *v)
        .ok_or_else(|| CodecError::UnknownVariant {
            type_name: std::any::type_name::<E>(),
            name: text.to_string(),
        })
}

/// Implements [`ConfigValue`](crate::ConfigValue) for a type that implements
/// [`ConfigEnum`], using the shared enum codec.
#[macro_export]
macro_rules! config_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::ConfigValue for $ty {
                fn encode(&self) -> ::std::result::Result<::std::string::String, $crate::codec::CodecError> {
                    $crate::codec::encode_enum(self)
                }

                fn decode(text: &str) -> ::std::result::Result<Self, $crate::codec::CodecError> {
                    $crate::codec::decode_enum(text)
                }
            }
        )+
    };
}
