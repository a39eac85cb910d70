//! What each reflective call site becomes.
//!
//! | Call site | Replacement |
//! |-----------|-------------|
//! | `getType<Keyed>()` | store lookup by id |
//! | `getType<number>()`, unions, literals, ... | inline construction |
//! | `getType<T>()` with `T` open | read of `__genericParams__.T` |
//! | `f<A, B>()` where `f` is marked `reflect` | implicit `{ A: .., B: .. }` argument |

use crate::error::GenerationError;
use crate::generator::DescriptionGenerator;
use crate::graph::CallSite;
use crate::oracle::{REFLECT_MARKER, TypeHandle, TypeOracle, TypeShape};
use serde::{Deserialize, Serialize};
use tracing::trace;
use tsr_common::{TypeDescription, TypeId, TypeRef};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Replacement {
    StoreLookup { id: TypeId },
    Inline { description: TypeDescription },
    GenericParameter { name: String },
    GenericArguments { args: Vec<GenericArgument> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericArgument {
    pub name: String,
    pub value: Replacement,
}

impl Replacement {
    /// Registered ids the replacement needs at run time.
    pub fn for_each_id(&self, f: &mut impl FnMut(TypeId)) {
        match self {
            Replacement::StoreLookup { id } => f(*id),
            Replacement::Inline { description } => description.for_each_referenced_id(f),
            Replacement::GenericParameter { .. } => {}
            Replacement::GenericArguments { args } => {
                for arg in args {
                    arg.value.for_each_id(f);
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteReplacement {
    pub site: String,
    pub replacement: Replacement,
}

/// Replacement for a reflective query on `ty`.
pub fn replace_type<O: TypeOracle + ?Sized>(
    generator: &mut DescriptionGenerator<'_, O>,
    ty: TypeHandle,
) -> Result<Replacement, GenerationError> {
    if let Some(TypeShape::TypeParameter { name }) = generator.oracle().shape(ty) {
        return Ok(Replacement::GenericParameter { name });
    }
    Ok(match generator.describe(ty)? {
        TypeRef::Id(id) | TypeRef::Lazy { lazy: id } => Replacement::StoreLookup { id },
        TypeRef::Inline(description) => Replacement::Inline {
            description: *description,
        },
    })
}

/// Replacement for one call site; `None` when the call needs no rewrite.
pub fn replace_call_site<O: TypeOracle + ?Sized>(
    generator: &mut DescriptionGenerator<'_, O>,
    call_site: &CallSite,
) -> Result<Option<Replacement>, GenerationError> {
    match call_site {
        CallSite::GetType {
            site,
            type_argument,
        } => {
            let ty = type_argument.ok_or_else(|| GenerationError::MissingTypeArgument {
                site: site.clone(),
                parameter: None,
            })?;
            replace_type(generator, ty).map(Some)
        }
        CallSite::GenericCall {
            site,
            callee,
            type_arguments,
        } => {
            let Some(function) = generator.oracle().function(callee) else {
                trace!(site = %site, callee = %callee, "callee unknown, left as is");
                return Ok(None);
            };
            if !function.has_marker(REFLECT_MARKER) {
                return Ok(None);
            }

            let mut args = Vec::with_capacity(function.type_parameters.len());
            for (index, name) in function.type_parameters.iter().enumerate() {
                let ty = type_arguments.get(index).copied().ok_or_else(|| {
                    GenerationError::MissingTypeArgument {
                        site: site.clone(),
                        parameter: Some(name.clone()),
                    }
                })?;
                args.push(GenericArgument {
                    name: name.clone(),
                    value: replace_type(generator, ty)?,
                });
            }
            Ok(Some(Replacement::GenericArguments { args }))
        }
    }
}
