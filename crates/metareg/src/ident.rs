// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stable runtime type identifiers.
//!
//! A [`TypeIdent`] is the 32-bit FNV-1a hash of a type's declared name. It is
//! computed by a `const fn`, so the same name yields the same identifier on
//! every build and platform. `TypeIdent::NONE` (zero) means "no type" and is
//! never accepted by the registry.

use std::any::Any;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Stable identifier of a record or value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct TypeIdent(u32);

impl TypeIdent {
    /// The "no type" identifier carried by sentinels.
    pub const NONE: TypeIdent = TypeIdent(0);

    /// Derive the identifier of a declared type name (FNV-1a, 32-bit).
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        TypeIdent(hash)
    }

    /// Wrap a raw identifier (e.g. one persisted by the embedding application).
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        TypeIdent(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TypeIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Types that can appear as a record or as a field value.
///
/// `TYPE_NAME` is the declared name the identifier is derived from; two types
/// must never share a name.
pub trait TypeTag: Any {
    const TYPE_NAME: &'static str;
    const TYPE_IDENT: TypeIdent = TypeIdent::from_name(Self::TYPE_NAME);
}

/// Implement [`TypeTag`] for one or more types under explicit names.
///
/// ```
/// struct Celsius(f64);
/// metareg::type_tag!(Celsius => "Celsius");
///
/// use metareg::TypeTag;
/// assert_eq!(Celsius::TYPE_IDENT, metareg::TypeIdent::from_name("Celsius"));
/// ```
#[macro_export]
macro_rules! type_tag {
    ($($ty:ty => $name:expr),* $(,)?) => {
        $(
            impl $crate::TypeTag for $ty {
                const TYPE_NAME: &'static str = $name;
            }
        )*
    };
}

type_tag! {
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    Vec<bool> => "Vec<bool>",
    Vec<char> => "Vec<char>",
    Vec<i8> => "Vec<i8>",
    Vec<i16> => "Vec<i16>",
    Vec<i32> => "Vec<i32>",
    Vec<i64> => "Vec<i64>",
    Vec<u8> => "Vec<u8>",
    Vec<u16> => "Vec<u16>",
    Vec<u32> => "Vec<u32>",
    Vec<u64> => "Vec<u64>",
    Vec<f32> => "Vec<f32>",
    Vec<f64> => "Vec<f64>",
    Vec<String> => "Vec<String>",
}

/// Predefined identifiers for switching on a field's type before reading it.
pub mod tags {
    use super::{TypeIdent, TypeTag};

    pub const UNKNOWN: TypeIdent = TypeIdent::NONE;
    pub const BOOL: TypeIdent = <bool as TypeTag>::TYPE_IDENT;
    pub const CHAR: TypeIdent = <char as TypeTag>::TYPE_IDENT;
    pub const STRING: TypeIdent = <String as TypeTag>::TYPE_IDENT;
    pub const INT: TypeIdent = <i32 as TypeTag>::TYPE_IDENT;
    pub const UINT: TypeIdent = <u32 as TypeTag>::TYPE_IDENT;
    pub const LONG: TypeIdent = <i64 as TypeTag>::TYPE_IDENT;
    pub const ULONG: TypeIdent = <u64 as TypeTag>::TYPE_IDENT;
    pub const FLOAT: TypeIdent = <f32 as TypeTag>::TYPE_IDENT;
    pub const DOUBLE: TypeIdent = <f64 as TypeTag>::TYPE_IDENT;
    pub const VEC_BOOL: TypeIdent = <Vec<bool> as TypeTag>::TYPE_IDENT;
    pub const VEC_CHAR: TypeIdent = <Vec<char> as TypeTag>::TYPE_IDENT;
    pub const VEC_STRING: TypeIdent = <Vec<String> as TypeTag>::TYPE_IDENT;
    pub const VEC_INT: TypeIdent = <Vec<i32> as TypeTag>::TYPE_IDENT;
    pub const VEC_UINT: TypeIdent = <Vec<u32> as TypeTag>::TYPE_IDENT;
    pub const VEC_LONG: TypeIdent = <Vec<i64> as TypeTag>::TYPE_IDENT;
    pub const VEC_FLOAT: TypeIdent = <Vec<f32> as TypeTag>::TYPE_IDENT;
    pub const VEC_DOUBLE: TypeIdent = <Vec<f64> as TypeTag>::TYPE_IDENT;
}
