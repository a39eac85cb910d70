//! In-memory static type graph.
//!
//! `TypeGraph` is the serialized form of what a host compiler knows about a
//! program: its types, the functions that matter for call-site rewriting,
//! and every module's reflective call sites. It implements [`TypeOracle`],
//! which is all the generator needs.
//!
//! ```json
//! {
//!   "types": [
//!     { "id": 1, "shape": "native", "name": "number" },
//!     { "id": 2, "shape": "object",
//!       "declaration": { "name": "Point", "kind": "interface", "file": "src/point.ts" },
//!       "properties": [{ "name": "x", "type": 1 }] }
//!   ],
//!   "modules": [
//!     { "path": "src/main.ts", "importsReflection": true,
//!       "callSites": [{ "kind": "getType", "site": "src/main.ts:3:1", "typeArgument": 2 }] }
//!   ]
//! }
//! ```

use crate::oracle::{
    AttributeInfo, ConstructorExport, DeclarationInfo, DeclarationKind, FunctionInfo, ModifierFlags,
    ParameterSymbol, PropertySymbol, TypeHandle, TypeOracle, TypeShape,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tsr_common::LiteralValue;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyAccess {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyAccessor {
    #[default]
    None,
    Getter,
    Setter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub access: PropertyAccess,
    #[serde(default)]
    pub accessor: PropertyAccessor,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
            access: PropertyAccess::Public,
            accessor: PropertyAccessor::None,
            attributes: Vec::new(),
        }
    }

    fn modifiers(&self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        flags.set(ModifierFlags::OPTIONAL, self.optional);
        flags.set(ModifierFlags::READONLY, self.readonly);
        flags.set(ModifierFlags::PRIVATE, self.access == PropertyAccess::Private);
        flags.set(ModifierFlags::PROTECTED, self.access == PropertyAccess::Protected);
        flags.set(ModifierFlags::GETTER, self.accessor == PropertyAccessor::Getter);
        flags.set(ModifierFlags::SETTER, self.accessor == PropertyAccessor::Setter);
        flags
    }
}

/// One type of the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub id: TypeHandle,
    #[serde(flatten)]
    pub shape: TypeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<DeclarationInfo>,
    /// Parameters of a generic declaration, bound by position on
    /// [`TypeGraph::instantiate`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Vec<ParameterSymbol>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<TypeHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<TypeHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor_export: Option<ConstructorExport>,
}

impl TypeNode {
    fn new(id: TypeHandle, shape: TypeShape) -> Self {
        Self {
            id,
            shape,
            declaration: None,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            attributes: Vec::new(),
            base_type: None,
            interface: None,
            constructor_export: None,
        }
    }
}

/// Reflective call site found in a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallSite {
    /// `getType<T>()`
    GetType {
        site: String,
        #[serde(rename = "typeArgument", default)]
        type_argument: Option<TypeHandle>,
    },
    /// Call of a function whose type parameters may be reflected.
    GenericCall {
        site: String,
        callee: String,
        #[serde(rename = "typeArguments", default)]
        type_arguments: Vec<TypeHandle>,
    },
}

impl CallSite {
    pub fn site(&self) -> &str {
        match self {
            CallSite::GetType { site, .. } | CallSite::GenericCall { site, .. } => site,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceModule {
    /// Path relative to the project root
    pub path: String,
    /// Whether the module imports the reflection API.
    #[serde(default)]
    pub imports_reflection: bool,
    #[serde(default)]
    pub call_sites: Vec<CallSite>,
    /// Names of functions declared in this module.
    #[serde(default)]
    pub functions: Vec<String>,
}

impl SourceModule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imports_reflection: true,
            ..Self::default()
        }
    }

    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_sites.push(call_site);
        self
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphFile {
    #[serde(default)]
    types: Vec<TypeNode>,
    #[serde(default)]
    functions: Vec<FunctionInfo>,
    #[serde(default)]
    modules: Vec<SourceModule>,
}

#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: IndexMap<TypeHandle, TypeNode>,
    functions: IndexMap<String, FunctionInfo>,
    modules: Vec<SourceModule>,
    /// Highest handle in use.
    last_handle: u32,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        let file: GraphFile = serde_json::from_str(source)?;
        let last_handle = file.types.iter().map(|node| node.id.0).max().unwrap_or(0);
        Ok(Self {
            last_handle,
            types: file.types.into_iter().map(|node| (node.id, node)).collect(),
            functions: file
                .functions
                .into_iter()
                .map(|function| (function.name.clone(), function))
                .collect(),
            modules: file.modules,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&GraphFile {
            types: self.types.values().cloned().collect(),
            functions: self.functions.values().cloned().collect(),
            modules: self.modules.clone(),
        })
    }

    pub fn modules(&self) -> &[SourceModule] {
        &self.modules
    }

    pub fn node(&self, ty: TypeHandle) -> Option<&TypeNode> {
        self.types.get(&ty)
    }

    pub fn node_mut(&mut self, ty: TypeHandle) -> Option<&mut TypeNode> {
        self.types.get_mut(&ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    // Building

    pub fn add(&mut self, shape: TypeShape) -> TypeHandle {
        self.last_handle += 1;
        let handle = TypeHandle(self.last_handle);
        self.types.insert(handle, TypeNode::new(handle, shape));
        handle
    }

    pub fn native(&mut self, name: &str) -> TypeHandle {
        self.add(TypeShape::Native { name: name.into() })
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeHandle {
        self.add(TypeShape::Literal { value })
    }

    pub fn union(&mut self, members: Vec<TypeHandle>) -> TypeHandle {
        self.add(TypeShape::Union { members })
    }

    pub fn intersection(&mut self, members: Vec<TypeHandle>) -> TypeHandle {
        self.add(TypeShape::Intersection { members })
    }

    pub fn type_parameter(&mut self, name: &str) -> TypeHandle {
        self.add(TypeShape::TypeParameter { name: name.into() })
    }

    pub fn anonymous(&mut self) -> TypeHandle {
        self.add(TypeShape::Anonymous)
    }

    pub fn declared(&mut self, kind: DeclarationKind, name: &str, file: &str) -> TypeHandle {
        let handle = self.add(TypeShape::Object);
        if let Some(node) = self.types.get_mut(&handle) {
            node.declaration = Some(DeclarationInfo {
                name: name.into(),
                kind,
                file: file.into(),
            });
        }
        handle
    }

    pub fn class(&mut self, name: &str, file: &str) -> TypeHandle {
        self.declared(DeclarationKind::Class, name, file)
    }

    pub fn interface(&mut self, name: &str, file: &str) -> TypeHandle {
        self.declared(DeclarationKind::Interface, name, file)
    }

    /// New type parameter of the generic `owner`.
    pub fn add_type_parameter(&mut self, owner: TypeHandle, name: &str) -> TypeHandle {
        let param = self.type_parameter(name);
        if let Some(node) = self.types.get_mut(&owner) {
            node.type_parameters.push(param);
        }
        param
    }

    /// New instantiation of a generic declaration or native.
    ///
    /// The template's type parameters are bound to `args` by position and
    /// replaced in member, constructor, base and interface types, including
    /// inside unions, intersections and type arguments.
    pub fn instantiate(&mut self, generic: TypeHandle, args: Vec<TypeHandle>) -> TypeHandle {
        let Some(template) = self.types.get(&generic).cloned() else {
            return generic;
        };
        let bindings: FxHashMap<TypeHandle, TypeHandle> = template
            .type_parameters
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();

        let handle = self.add(template.shape);
        let mut subst = Substitution::new(&bindings);
        let properties: Vec<PropertyNode> = template
            .properties
            .into_iter()
            .map(|mut prop| {
                prop.ty = subst.apply(self, prop.ty);
                prop
            })
            .collect();
        let constructors: Vec<Vec<ParameterSymbol>> = template
            .constructors
            .into_iter()
            .map(|params| {
                params
                    .into_iter()
                    .map(|mut param| {
                        param.ty = subst.apply(self, param.ty);
                        param
                    })
                    .collect()
            })
            .collect();
        let base_type = template.base_type.map(|base| subst.apply(self, base));
        let interface = template.interface.map(|iface| subst.apply(self, iface));

        if let Some(node) = self.types.get_mut(&handle) {
            node.declaration = template.declaration;
            node.properties = properties;
            node.constructors = constructors;
            node.attributes = template.attributes;
            node.base_type = base_type;
            node.interface = interface;
            node.constructor_export = template.constructor_export;
            node.type_arguments = args;
        }
        handle
    }

    pub fn add_property(&mut self, owner: TypeHandle, property: PropertyNode) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.properties.push(property);
        }
    }

    pub fn add_constructor(&mut self, owner: TypeHandle, params: Vec<ParameterSymbol>) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.constructors.push(params);
        }
    }

    pub fn add_attribute(&mut self, owner: TypeHandle, attribute: AttributeInfo) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.attributes.push(attribute);
        }
    }

    pub fn set_base_type(&mut self, owner: TypeHandle, base: TypeHandle) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.base_type = Some(base);
        }
    }

    pub fn set_interface(&mut self, owner: TypeHandle, interface: TypeHandle) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.interface = Some(interface);
        }
    }

    pub fn set_constructor_export(&mut self, owner: TypeHandle, export: ConstructorExport) {
        if let Some(node) = self.types.get_mut(&owner) {
            node.constructor_export = Some(export);
        }
    }

    pub fn add_function(&mut self, function: FunctionInfo) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn add_module(&mut self, module: SourceModule) {
        self.modules.push(module);
    }
}

/// Replaces bound type parameters, copying every compound type that
/// mentions one. Unchanged types keep their handle.
struct Substitution<'b> {
    bindings: &'b FxHashMap<TypeHandle, TypeHandle>,
    visiting: FxHashSet<TypeHandle>,
}

impl<'b> Substitution<'b> {
    fn new(bindings: &'b FxHashMap<TypeHandle, TypeHandle>) -> Self {
        Self {
            bindings,
            visiting: FxHashSet::default(),
        }
    }

    fn apply(&mut self, graph: &mut TypeGraph, ty: TypeHandle) -> TypeHandle {
        if let Some(&bound) = self.bindings.get(&ty) {
            return bound;
        }
        if self.bindings.is_empty() || !self.visiting.insert(ty) {
            return ty;
        }
        let result = self.rewrite(graph, ty);
        self.visiting.remove(&ty);
        result
    }

    fn rewrite(&mut self, graph: &mut TypeGraph, ty: TypeHandle) -> TypeHandle {
        let Some(node) = graph.types.get(&ty).cloned() else {
            return ty;
        };
        let shape = match &node.shape {
            TypeShape::Union { members } => TypeShape::Union {
                members: self.apply_all(graph, members),
            },
            TypeShape::Intersection { members } => TypeShape::Intersection {
                members: self.apply_all(graph, members),
            },
            other => other.clone(),
        };
        let type_arguments = self.apply_all(graph, &node.type_arguments);
        if shape == node.shape && type_arguments == node.type_arguments {
            return ty;
        }

        let handle = graph.add(shape.clone());
        if let Some(copy) = graph.types.get_mut(&handle) {
            *copy = TypeNode {
                id: handle,
                shape,
                type_arguments,
                ..node
            };
        }
        handle
    }

    fn apply_all(&mut self, graph: &mut TypeGraph, types: &[TypeHandle]) -> Vec<TypeHandle> {
        types.iter().map(|&ty| self.apply(graph, ty)).collect()
    }
}

impl TypeOracle for TypeGraph {
    fn shape(&self, ty: TypeHandle) -> Option<TypeShape> {
        self.node(ty).map(|node| node.shape.clone())
    }

    fn declaration(&self, ty: TypeHandle) -> Option<DeclarationInfo> {
        self.node(ty)?.declaration.clone()
    }

    fn type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.node(ty)
            .map(|node| node.type_arguments.clone())
            .unwrap_or_default()
    }

    fn properties(&self, ty: TypeHandle) -> Vec<PropertySymbol> {
        let Some(node) = self.node(ty) else {
            return Vec::new();
        };
        node.properties
            .iter()
            .map(|prop| PropertySymbol {
                name: prop.name.clone(),
                ty: prop.ty,
                modifiers: prop.modifiers(),
                attributes: prop.attributes.clone(),
            })
            .collect()
    }

    fn construct_signatures(&self, ty: TypeHandle) -> Vec<Vec<ParameterSymbol>> {
        self.node(ty)
            .map(|node| node.constructors.clone())
            .unwrap_or_default()
    }

    fn attributes(&self, ty: TypeHandle) -> Vec<AttributeInfo> {
        self.node(ty)
            .map(|node| node.attributes.clone())
            .unwrap_or_default()
    }

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.node(ty)?.base_type
    }

    fn implemented_interface(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.node(ty)?.interface
    }

    fn constructor_export(&self, ty: TypeHandle) -> Option<ConstructorExport> {
        self.node(ty)?.constructor_export.clone()
    }

    fn function(&self, name: &str) -> Option<FunctionInfo> {
        self.functions.get(name).cloned()
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
