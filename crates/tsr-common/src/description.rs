//! Serialized type descriptions.
//!
//! A `TypeDescription` never embeds another described type by value when
//! that type may be shared or cyclic. Every nested type goes through a
//! [`TypeRef`], which is one of:
//!
//! | Variant | Wire form | Resolution |
//! |---------|-----------|------------|
//! | `Id` | `5` | store lookup on first access |
//! | `Lazy` | `{"lazy": 5}` | deferred store accessor, safe before registration |
//! | `Inline` | `{"k": 2, ...}` | built on the spot, never stored |
//!
//! Unknown fields are ignored on deserialization and missing optional fields
//! take their defaults, so mixed-version builds stay readable.

use crate::kind::{AccessModifier, Accessor, TypeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport handle of a description within one compilation.
///
/// Not an identity: two ids may name the same type when descriptions come
/// from different compilations. Identity is the description's full name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    /// First id handed out by the generator.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to another type from inside a description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    /// Registered type, looked up by id.
    Id(TypeId),
    /// Registered type that may not exist yet when the referencing type is
    /// built (back edge of a cycle).
    Lazy { lazy: TypeId },
    /// Unregistered type described in place.
    Inline(Box<TypeDescription>),
}

impl TypeRef {
    pub fn lazy(id: TypeId) -> Self {
        TypeRef::Lazy { lazy: id }
    }

    pub fn inline(description: TypeDescription) -> Self {
        TypeRef::Inline(Box::new(description))
    }

    /// Id of the referenced registered type, if any.
    pub fn id(&self) -> Option<TypeId> {
        match self {
            TypeRef::Id(id) | TypeRef::Lazy { lazy: id } => Some(*id),
            TypeRef::Inline(_) => None,
        }
    }

    /// Visit every registered id reachable from this reference without
    /// crossing into other registered descriptions.
    pub fn for_each_id(&self, f: &mut impl FnMut(TypeId)) {
        match self {
            TypeRef::Id(id) | TypeRef::Lazy { lazy: id } => f(*id),
            TypeRef::Inline(description) => description.for_each_referenced_id(f),
        }
    }
}

/// Value of a literal type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Attribute annotation (decorator) attached to a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorDescription {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "t")]
    pub ty: TypeRef,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDescription {
    #[serde(default)]
    pub params: Vec<ParameterDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "t")]
    pub ty: TypeRef,
    #[serde(rename = "o", default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(rename = "d", default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<DecoratorDescription>,
    #[serde(rename = "am", default, skip_serializing_if = "AccessModifier::is_public")]
    pub access_modifier: AccessModifier,
    #[serde(rename = "acs", default, skip_serializing_if = "Accessor::is_none")]
    pub accessor: Accessor,
    #[serde(rename = "ro", default, skip_serializing_if = "is_false")]
    pub readonly: bool,
}

impl PropertyDescription {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            decorators: Vec::new(),
            access_modifier: AccessModifier::Public,
            accessor: Accessor::None,
            readonly: false,
        }
    }
}

/// Locator of the exported runtime constructor of a class.
///
/// Executable references cannot be serialized; the host uses this to import
/// the constructor and register it with the runtime out of band.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorImport {
    /// Export name
    #[serde(rename = "en")]
    pub export_name: String,
    /// Class name
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "srcPath")]
    pub source_path: String,
    #[serde(rename = "outPath", default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<String>,
}

/// Serialized description of one type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDescription {
    #[serde(rename = "n", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Identity key: qualified, module-path-stable name used for equality.
    #[serde(rename = "fn", default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,

    #[serde(rename = "k")]
    pub kind: TypeKind,

    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralValue>,

    #[serde(rename = "ctors", default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorDescription>,

    #[serde(rename = "props", default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescription>,

    #[serde(rename = "decs", default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<DecoratorDescription>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub union: bool,

    #[serde(rename = "inter", default, skip_serializing_if = "is_false")]
    pub intersection: bool,

    /// Member types of a union/intersection container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeRef>,

    #[serde(rename = "ctor", default, skip_serializing_if = "Option::is_none")]
    pub constructor_import: Option<ConstructorImport>,

    #[serde(rename = "bt", default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<TypeRef>,

    #[serde(rename = "iface", default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<TypeRef>,

    /// Type arguments of a generic instantiation
    #[serde(rename = "args", default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeRef>,
}

impl TypeDescription {
    /// Create an empty description of the given kind.
    pub fn new(kind: TypeKind, name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            kind,
            value: None,
            constructors: Vec::new(),
            properties: Vec::new(),
            decorators: Vec::new(),
            union: false,
            intersection: false,
            types: Vec::new(),
            constructor_import: None,
            base_type: None,
            interface: None,
            type_arguments: Vec::new(),
        }
    }

    /// Native type: its name is also its identity key.
    pub fn native(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(TypeKind::Native, name.clone(), name)
    }

    pub fn literal(value: LiteralValue) -> Self {
        let mut description = Self::new(TypeKind::LiteralValue, String::new(), String::new());
        description.value = Some(value);
        description
    }

    pub fn union(types: Vec<TypeRef>) -> Self {
        let mut description = Self::new(TypeKind::Container, String::new(), String::new());
        description.union = true;
        description.types = types;
        description
    }

    pub fn intersection(types: Vec<TypeRef>) -> Self {
        let mut description = Self::new(TypeKind::Container, String::new(), String::new());
        description.intersection = true;
        description.types = types;
        description
    }

    pub fn with_property(mut self, property: PropertyDescription) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_constructor(mut self, params: Vec<ParameterDescription>) -> Self {
        self.constructors.push(ConstructorDescription { params });
        self
    }

    pub fn with_decorator(mut self, name: impl Into<String>, full_name: Option<String>) -> Self {
        self.decorators.push(DecoratorDescription {
            name: name.into(),
            full_name,
        });
        self
    }

    pub fn with_base_type(mut self, base: TypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interface = Some(interface);
        self
    }

    pub fn with_type_arguments(mut self, args: Vec<TypeRef>) -> Self {
        self.type_arguments = args;
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == TypeKind::Container
    }

    /// Visit every registered id referenced by this description, including
    /// ids referenced from inline sub-descriptions.
    pub fn for_each_referenced_id(&self, f: &mut impl FnMut(TypeId)) {
        for ctor in &self.constructors {
            for param in &ctor.params {
                param.ty.for_each_id(f);
            }
        }
        for prop in &self.properties {
            prop.ty.for_each_id(f);
        }
        for ty in &self.types {
            ty.for_each_id(f);
        }
        if let Some(base) = &self.base_type {
            base.for_each_id(f);
        }
        if let Some(iface) = &self.interface {
            iface.for_each_id(f);
        }
        for arg in &self.type_arguments {
            arg.for_each_id(f);
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
#[path = "../tests/description_tests.rs"]
mod tests;
