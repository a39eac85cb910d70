//! Closed enumerations carried by type descriptions.
//!
//! All of them travel as small integers on the wire. Unknown discriminants are
//! rejected rather than silently mapped, since a kind the runtime does not
//! understand cannot be reconstructed correctly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error produced when a wire integer does not name a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEnumError {
    pub enum_name: &'static str,
    pub value: u8,
}

impl fmt::Display for WireEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} discriminant: {}", self.enum_name, self.value)
    }
}

impl std::error::Error for WireEnumError {}

macro_rules! wire_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = WireEnumError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(WireEnumError {
                        enum_name: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

/// Kind of a described type.
///
/// | Kind | Payload | Example |
/// |------|---------|---------|
/// | Interface | members | `interface Point { x: number }` |
/// | Class | members + constructors | `class User {}` |
/// | Native | name only | `number`, `String`, `Date` |
/// | Container | member types | `A \| B`, `A & B` |
/// | LiteralValue | scalar | `"on"`, `42`, `true` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TypeKind {
    Interface = 0,
    Class = 1,
    /// Native JavaScript/TypeScript type
    Native = 2,
    /// Container for other types in case of union or intersection
    Container = 3,
    /// Literal type carrying a single value
    LiteralValue = 4,
}

wire_enum!(TypeKind {
    Interface = 0,
    Class = 1,
    Native = 2,
    Container = 3,
    LiteralValue = 4,
});

/// Access level of a class member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AccessModifier {
    Private = 0,
    Protected = 1,
    #[default]
    Public = 2,
}

wire_enum!(AccessModifier {
    Private = 0,
    Protected = 1,
    Public = 2,
});

impl AccessModifier {
    pub fn is_public(&self) -> bool {
        *self == AccessModifier::Public
    }
}

/// Whether a property is backed by a getter or setter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Accessor {
    #[default]
    None = 0,
    Getter = 1,
    Setter = 2,
}

wire_enum!(Accessor {
    None = 0,
    Getter = 1,
    Setter = 2,
});

impl Accessor {
    pub fn is_none(&self) -> bool {
        *self == Accessor::None
    }
}
