//! Wire format shared by the tsr description generator and runtime.
//!
//! This crate provides the serialized shape of a type as it is embedded in
//! compiled output:
//! - Type kinds and member enums (`TypeKind`, `AccessModifier`, `Accessor`)
//! - Type descriptions and type references (`TypeDescription`, `TypeRef`)
//! - Per-module metadata batches (`MetadataSource`, `ModuleMetadata`)
//! - The short-array codec used to shrink emitted payloads
//!
//! Field names are deliberately short: this is the payload spliced into every
//! compiled module, so it is optimized for size, not readability.

// Kinds and member enums serialized as integers
pub mod kind;
pub use kind::{AccessModifier, Accessor, TypeKind, WireEnumError};

// Type descriptions and references
pub mod description;
pub use description::{
    ConstructorDescription, ConstructorImport, DecoratorDescription, LiteralValue,
    ParameterDescription, PropertyDescription, TypeDescription, TypeId, TypeRef,
};

// Module batches
pub mod metadata;
pub use metadata::{MetadataSource, ModuleMetadata, TypeEntry};

// Dense encoding for arrays of homogeneous objects
pub mod short_array;
