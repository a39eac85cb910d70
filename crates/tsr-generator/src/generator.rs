//! Type description generator.
//!
//! Walks the static type graph from a reflected type and produces a
//! [`TypeRef`] for it:
//!
//! - Declared classes/interfaces (and natives, when `inlineLeafTypes` is
//!   off) get an id. The id is reserved before members are walked; a second
//!   visit yields a reference instead of a re-walk: `{"lazy": id}` while the
//!   type is still being described, a plain id once it is complete.
//! - Everything else (natives, literals, unions, intersections, anonymous
//!   object types, type parameters) is described in place.
//!
//! Only in-place descriptions recurse without an id to stop them, so only
//! they are depth limited.

use crate::config::ResolvedConfig;
use crate::context::{GenerationContext, IdState};
use crate::error::GenerationError;
use crate::identity::KeyBuilder;
use crate::oracle::{
    AttributeInfo, DeclarationInfo, DeclarationKind, ModifierFlags, PropertySymbol, TypeHandle,
    TypeOracle, TypeShape,
};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use tracing::{debug, trace};
use tsr_common::{
    AccessModifier, Accessor, ConstructorDescription, ConstructorImport, DecoratorDescription,
    ParameterDescription, PropertyDescription, TypeDescription, TypeKind, TypeRef,
};

pub struct DescriptionGenerator<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    config: &'a ResolvedConfig,
    ctx: &'a mut GenerationContext,
    guard: RecursionGuard<TypeHandle>,
}

impl<'a, O: TypeOracle + ?Sized> DescriptionGenerator<'a, O> {
    pub fn new(oracle: &'a O, config: &'a ResolvedConfig, ctx: &'a mut GenerationContext) -> Self {
        Self {
            oracle,
            config,
            ctx,
            guard: description_guard(config),
        }
    }

    pub fn oracle(&self) -> &'a O {
        self.oracle
    }

    /// Describe `ty`, registering it (and every keyed type it reaches) in
    /// the context.
    pub fn describe(&mut self, ty: TypeHandle) -> Result<TypeRef, GenerationError> {
        let shape = self
            .oracle
            .shape(ty)
            .ok_or(GenerationError::UnknownType { handle: ty })?;
        trace!(handle = %ty, shape = ?shape, "DescriptionGenerator::describe");

        match shape {
            TypeShape::Object => {
                let declaration = self
                    .oracle
                    .declaration(ty)
                    .ok_or(GenerationError::MissingDeclaration { handle: ty })?;
                let key = KeyBuilder::new(self.oracle, self.config).declared_key(ty, &declaration);
                self.describe_keyed(ty, key, |this, key| this.describe_declared(ty, &declaration, key))
            }
            TypeShape::Native { name } => {
                let key = KeyBuilder::new(self.oracle, self.config).native_key(ty, &name);
                if self.config.inline_leaf_types {
                    self.describe_inline(ty, |this| this.describe_native(ty, &name, key))
                } else {
                    self.describe_keyed(ty, key, |this, key| this.describe_native(ty, &name, key))
                }
            }
            TypeShape::Literal { value } => Ok(TypeRef::inline(TypeDescription::literal(value))),
            // Unbound parameter reached from a member: named placeholder.
            TypeShape::TypeParameter { name } => Ok(TypeRef::inline(TypeDescription::native(name))),
            TypeShape::Union { members } => self.describe_inline(ty, |this| {
                Ok(TypeDescription::union(this.describe_all(&members)?))
            }),
            TypeShape::Intersection { members } => self.describe_inline(ty, |this| {
                Ok(TypeDescription::intersection(this.describe_all(&members)?))
            }),
            TypeShape::Anonymous => self.describe_inline(ty, |this| {
                let mut description = TypeDescription::new(TypeKind::Interface, "", "");
                description.properties = this.describe_properties(ty)?;
                Ok(description)
            }),
        }
    }

    fn describe_keyed(
        &mut self,
        ty: TypeHandle,
        key: String,
        build: impl FnOnce(&mut Self, String) -> Result<TypeDescription, GenerationError>,
    ) -> Result<TypeRef, GenerationError> {
        match self.ctx.lookup(&key) {
            Some(IdState::InProgress(id)) => return Ok(TypeRef::lazy(id)),
            Some(IdState::Complete(id)) => return Ok(TypeRef::Id(id)),
            None => {}
        }

        let reservation = self.ctx.reserve(&key);
        let id = reservation.id;
        // Any walk that comes back here ends at `id`, so inline nesting
        // (cycles and depth) is counted per keyed type.
        let outer = std::mem::replace(&mut self.guard, description_guard(self.config));
        let built = build(self, key);
        self.guard = outer;
        match built {
            Ok(description) => {
                if self.config.debug_mode {
                    debug!(type_id = %id, handle = %ty, description = ?description, "described");
                } else {
                    debug!(type_id = %id, handle = %ty, key = %description.full_name, "described");
                }
                self.ctx.complete(reservation, description);
                Ok(TypeRef::Id(id))
            }
            Err(err) => {
                self.ctx.abandon(reservation);
                Err(err)
            }
        }
    }

    fn describe_inline(
        &mut self,
        ty: TypeHandle,
        build: impl FnOnce(&mut Self) -> Result<TypeDescription, GenerationError>,
    ) -> Result<TypeRef, GenerationError> {
        match self.guard.enter(ty) {
            RecursionResult::Entered => {}
            denied => {
                debug!(handle = %ty, reason = ?denied, "DescriptionGenerator - recursion denied");
                return Err(GenerationError::RecursionLimit {
                    handle: ty,
                    depth: self.guard.max_depth(),
                });
            }
        }
        let result = build(self);
        self.guard.leave(ty);
        result.map(TypeRef::inline)
    }

    fn describe_all(&mut self, types: &[TypeHandle]) -> Result<Vec<TypeRef>, GenerationError> {
        types.iter().map(|&ty| self.describe(ty)).collect()
    }

    fn describe_native(
        &mut self,
        ty: TypeHandle,
        name: &str,
        key: String,
    ) -> Result<TypeDescription, GenerationError> {
        let args = self.oracle.type_arguments(ty);
        let mut description = TypeDescription::new(TypeKind::Native, name, key);
        description.type_arguments = self.describe_all(&args)?;
        Ok(description)
    }

    fn describe_declared(
        &mut self,
        ty: TypeHandle,
        declaration: &DeclarationInfo,
        key: String,
    ) -> Result<TypeDescription, GenerationError> {
        let kind = match declaration.kind {
            DeclarationKind::Class => TypeKind::Class,
            DeclarationKind::Interface | DeclarationKind::TypeAlias => TypeKind::Interface,
        };
        let mut description = TypeDescription::new(kind, declaration.name.clone(), key);

        if kind == TypeKind::Class {
            for signature in self.oracle.construct_signatures(ty) {
                let params = signature
                    .into_iter()
                    .map(|param| -> Result<ParameterDescription, GenerationError> {
                        Ok(ParameterDescription {
                            ty: self.describe(param.ty)?,
                            name: param.name,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                description.constructors.push(ConstructorDescription { params });
            }
            description.constructor_import =
                self.oracle
                    .constructor_export(ty)
                    .map(|export| ConstructorImport {
                        export_name: export.export_name,
                        name: declaration.name.clone(),
                        source_path: export.source_path,
                        out_path: export.out_path,
                    });
        }

        description.properties = self.describe_properties(ty)?;
        description.decorators = decorators(self.oracle.attributes(ty));

        if let Some(base) = self.oracle.base_type(ty) {
            description.base_type = Some(self.describe(base)?);
        }
        if let Some(interface) = self.oracle.implemented_interface(ty) {
            description.interface = Some(self.describe(interface)?);
        }
        let args = self.oracle.type_arguments(ty);
        description.type_arguments = self.describe_all(&args)?;

        Ok(description)
    }

    fn describe_properties(
        &mut self,
        ty: TypeHandle,
    ) -> Result<Vec<PropertyDescription>, GenerationError> {
        self.oracle
            .properties(ty)
            .into_iter()
            .map(|prop| self.describe_property(prop))
            .collect()
    }

    fn describe_property(
        &mut self,
        prop: PropertySymbol,
    ) -> Result<PropertyDescription, GenerationError> {
        let flags = prop.modifiers;
        let access_modifier = if flags.contains(ModifierFlags::PRIVATE) {
            AccessModifier::Private
        } else if flags.contains(ModifierFlags::PROTECTED) {
            AccessModifier::Protected
        } else {
            AccessModifier::Public
        };
        let accessor = if flags.contains(ModifierFlags::GETTER) {
            Accessor::Getter
        } else if flags.contains(ModifierFlags::SETTER) {
            Accessor::Setter
        } else {
            Accessor::None
        };

        Ok(PropertyDescription {
            ty: self.describe(prop.ty)?,
            name: prop.name,
            optional: flags.contains(ModifierFlags::OPTIONAL),
            decorators: decorators(prop.attributes),
            access_modifier,
            accessor,
            readonly: flags.contains(ModifierFlags::READONLY),
        })
    }
}

fn description_guard(config: &ResolvedConfig) -> RecursionGuard<TypeHandle> {
    RecursionGuard::with_profile(RecursionProfile::Description {
        max_depth: config.max_depth,
    })
}

fn decorators(attributes: Vec<AttributeInfo>) -> Vec<DecoratorDescription> {
    attributes
        .into_iter()
        .map(|attribute| DecoratorDescription {
            name: attribute.name,
            full_name: attribute.full_name,
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/generator_tests.rs"]
mod tests;
