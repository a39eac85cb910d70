//! Live reflected types.
//!
//! A `Type` is built from exactly one description by a store (`set` for
//! registered types, `wrap` for inline ones). Construction only records
//! [`LazyType`] handles for nested types; nothing is dereferenced until a
//! consumer asks.

use crate::constructors::{self, Constructor};
use crate::lazy::LazyType;
use crate::store::MetadataStore;
use std::fmt;
use std::sync::Arc;
use tsr_common::{
    AccessModifier, Accessor, ConstructorImport, DecoratorDescription, LiteralValue, TypeDescription,
    TypeKind, TypeRef,
};

/// Attribute annotation attached to a type or property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decorator {
    pub name: String,
    pub full_name: Option<String>,
}

impl From<&DecoratorDescription> for Decorator {
    fn from(description: &DecoratorDescription) -> Self {
        Self {
            name: description.name.clone(),
            full_name: description.full_name.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MethodParameter {
    pub name: String,
    ty: LazyType,
}

impl MethodParameter {
    pub fn ty(&self) -> Option<Arc<Type>> {
        self.ty.get()
    }
}

#[derive(Debug)]
pub struct ConstructorInfo {
    pub parameters: Vec<MethodParameter>,
}

#[derive(Debug)]
pub struct PropertyInfo {
    pub name: String,
    ty: LazyType,
    pub optional: bool,
    pub decorators: Vec<Decorator>,
    pub access_modifier: AccessModifier,
    pub accessor: Accessor,
    pub readonly: bool,
}

impl PropertyInfo {
    /// Declared type of the property; `None` while it is still unregistered.
    pub fn ty(&self) -> Option<Arc<Type>> {
        self.ty.get()
    }
}

pub struct Type {
    name: String,
    full_name: String,
    kind: TypeKind,
    literal_value: Option<LiteralValue>,
    constructors: Vec<ConstructorInfo>,
    properties: Vec<PropertyInfo>,
    decorators: Vec<Decorator>,
    union: bool,
    intersection: bool,
    types: Vec<LazyType>,
    base_type: Option<LazyType>,
    interface: Option<LazyType>,
    type_arguments: Vec<LazyType>,
    constructor_import: Option<ConstructorImport>,
}

impl Type {
    /// Build a live type. Only stores may call this.
    pub(crate) fn from_description(description: &TypeDescription, store: &dyn MetadataStore) -> Self {
        let lazy = |ty: &TypeRef| lazy_ref(ty, store);

        let constructors = description
            .constructors
            .iter()
            .map(|ctor| ConstructorInfo {
                parameters: ctor
                    .params
                    .iter()
                    .map(|param| MethodParameter {
                        name: param.name.clone(),
                        ty: lazy(&param.ty),
                    })
                    .collect(),
            })
            .collect();

        let properties = description
            .properties
            .iter()
            .map(|prop| PropertyInfo {
                name: prop.name.clone(),
                ty: lazy(&prop.ty),
                optional: prop.optional,
                decorators: prop.decorators.iter().map(Decorator::from).collect(),
                access_modifier: prop.access_modifier,
                accessor: prop.accessor,
                readonly: prop.readonly,
            })
            .collect();

        Self {
            name: description.name.clone(),
            full_name: description.full_name.clone(),
            kind: description.kind,
            literal_value: description.value.clone(),
            constructors,
            properties,
            decorators: description.decorators.iter().map(Decorator::from).collect(),
            union: description.union,
            intersection: description.intersection,
            types: description.types.iter().map(lazy).collect(),
            base_type: description.base_type.as_ref().map(lazy),
            interface: description.interface.as_ref().map(lazy),
            type_arguments: description.type_arguments.iter().map(lazy).collect(),
            constructor_import: description.constructor_import.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity key; contains the module path relative to the project root.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_native(&self) -> bool {
        self.kind == TypeKind::Native
    }

    pub fn is_literal(&self) -> bool {
        self.kind == TypeKind::LiteralValue
    }

    pub fn is_union(&self) -> bool {
        self.union
    }

    pub fn is_intersection(&self) -> bool {
        self.intersection
    }

    pub fn literal_value(&self) -> Option<&LiteralValue> {
        self.literal_value.as_ref()
    }

    /// Member types of a union or intersection. Members that are not
    /// registered yet are skipped.
    pub fn types(&self) -> Vec<Arc<Type>> {
        self.types.iter().filter_map(LazyType::get).collect()
    }

    /// Constructor signatures; `None` unless this type is a class.
    pub fn constructors(&self) -> Option<&[ConstructorInfo]> {
        self.is_class().then_some(self.constructors.as_slice())
    }

    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    pub fn base_type(&self) -> Option<Arc<Type>> {
        self.base_type.as_ref().and_then(LazyType::get)
    }

    /// Interface this type implements.
    pub fn interface(&self) -> Option<Arc<Type>> {
        self.interface.as_ref().and_then(LazyType::get)
    }

    pub fn type_arguments(&self) -> Vec<Arc<Type>> {
        self.type_arguments.iter().filter_map(LazyType::get).collect()
    }

    pub fn constructor_import(&self) -> Option<&ConstructorImport> {
        self.constructor_import.as_ref()
    }

    /// Runtime constructor of a class, when the host registered one.
    pub fn ctor(&self) -> Option<Constructor> {
        if !self.is_class() {
            return None;
        }
        constructors::lookup(&self.full_name)
    }

    /// Identity comparison by full name.
    pub fn is(&self, other: &Type) -> bool {
        self == other
    }

    /// Walks the base type chain looking for `ancestor`.
    pub fn is_derived_from(&self, ancestor: &Type) -> bool {
        let mut current = self.base_type();
        // Base chains are acyclic in well-formed input; the bound keeps a
        // malformed batch from looping forever.
        for _ in 0..MAX_BASE_CHAIN {
            match current {
                Some(base) if base.is(ancestor) => return true,
                Some(base) => current = base.base_type(),
                None => return false,
            }
        }
        false
    }
}

const MAX_BASE_CHAIN: usize = 256;

fn lazy_ref(ty: &TypeRef, store: &dyn MetadataStore) -> LazyType {
    match ty {
        TypeRef::Id(id) | TypeRef::Lazy { lazy: id } => LazyType::from_store(*id, store.get_lazy(*id)),
        TypeRef::Inline(description) => LazyType::resolved(store.wrap(description)),
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if self.full_name.is_empty() || other.full_name.is_empty() {
            return std::ptr::eq(self, other);
        }
        self.full_name == other.full_name
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Type");
        s.field("name", &self.name)
            .field("full_name", &self.full_name)
            .field("kind", &self.kind);
        if let Some(value) = &self.literal_value {
            s.field("value", value);
        }
        if !self.properties.is_empty() {
            let names: Vec<&str> = self.properties.iter().map(|p| p.name.as_str()).collect();
            s.field("properties", &names);
        }
        s.finish_non_exhaustive()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.literal_value, self.name.is_empty()) {
            (Some(value), _) => write!(f, "{value}"),
            (None, false) => write!(f, "{}", self.name),
            (None, true) if self.union => write!(f, "<union>"),
            (None, true) if self.intersection => write!(f, "<intersection>"),
            (None, true) => write!(f, "<anonymous>"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
