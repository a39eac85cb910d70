//! Read-only view of the host compiler's static type graph.
//!
//! The generator never inspects syntax. Everything it learns about a type
//! comes through [`TypeOracle`], which keeps it testable against an
//! in-memory graph (see [`TypeGraph`](crate::graph::TypeGraph)).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use tsr_common::LiteralValue;

/// Opaque handle of a type in the host's graph. One handle per distinct
/// type, including each generic instantiation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(pub u32);

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural category of a type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum TypeShape {
    /// Built-in type: `number`, `string`, `Date`, `Array`, ...
    Native { name: String },
    Literal { value: LiteralValue },
    Union { members: Vec<TypeHandle> },
    Intersection { members: Vec<TypeHandle> },
    /// Unbound type parameter, e.g. `T` inside `class Box<T>`.
    TypeParameter { name: String },
    /// Named class, interface or object alias; has a declaration.
    Object,
    /// Object type literal without a name.
    Anonymous,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Class,
    Interface,
    TypeAlias,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationInfo {
    pub name: String,
    pub kind: DeclarationKind,
    /// Declaring source file, absolute or relative to the project root.
    pub file: String,
}

bitflags! {
    /// Modifiers of a property symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u8 {
        const OPTIONAL  = 1 << 0;
        const READONLY  = 1 << 1;
        const PRIVATE   = 1 << 2;
        const PROTECTED = 1 << 3;
        const GETTER    = 1 << 4;
        const SETTER    = 1 << 5;
    }
}

/// Attribute annotation as written on a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySymbol {
    pub name: String,
    pub ty: TypeHandle,
    pub modifiers: ModifierFlags,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
}

/// Where a class's runtime constructor is exported from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorExport {
    pub export_name: String,
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<String>,
}

/// Function declaration as seen by call-site rewriting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Reserved markers such as `reflect` and `trace`.
    #[serde(default)]
    pub markers: Vec<String>,
}

impl FunctionInfo {
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

/// Marker forwarding open generic arguments through the implicit parameter.
pub const REFLECT_MARKER: &str = "reflect";
/// Marker asking the host to wrap a function with tracing.
pub const TRACE_MARKER: &str = "trace";

/// Static type information provided by the host compiler.
pub trait TypeOracle {
    fn shape(&self, ty: TypeHandle) -> Option<TypeShape>;

    /// Declaration of an `Object` type.
    fn declaration(&self, ty: TypeHandle) -> Option<DeclarationInfo>;

    /// Type arguments of a generic instantiation, in parameter order.
    fn type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    fn properties(&self, ty: TypeHandle) -> Vec<PropertySymbol>;

    fn construct_signatures(&self, ty: TypeHandle) -> Vec<Vec<ParameterSymbol>>;

    fn attributes(&self, ty: TypeHandle) -> Vec<AttributeInfo>;

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle>;

    fn implemented_interface(&self, ty: TypeHandle) -> Option<TypeHandle>;

    fn constructor_export(&self, ty: TypeHandle) -> Option<ConstructorExport>;

    fn function(&self, name: &str) -> Option<FunctionInfo>;
}
