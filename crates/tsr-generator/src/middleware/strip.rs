use super::{MetadataMiddleware, MiddlewareContext, Next};
use crate::error::GenerationError;
use tsr_common::{MetadataSource, TypeDescription, TypeRef, short_array};

/// Drops attribute annotations from every description.
pub struct StripAnnotations;

impl StripAnnotations {
    pub const NAME: &'static str = "strip-annotations";
}

impl MetadataMiddleware for StripAnnotations {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &mut MiddlewareContext<'_>, next: Next<'_>) -> Result<(), GenerationError> {
        let mut source: MetadataSource = match ctx.result.take() {
            Some(value) => serde_json::from_value(short_array::expand(value)).map_err(|e| {
                GenerationError::Middleware {
                    name: Self::NAME.to_string(),
                    message: e.to_string(),
                }
            })?,
            None => ctx.source.clone(),
        };
        for module in &mut source.modules {
            for entry in &mut module.types {
                strip(&mut entry.description);
            }
        }
        ctx.result = Some(serde_json::to_value(&source)?);
        next.run(ctx)
    }
}

fn strip(description: &mut TypeDescription) {
    description.decorators.clear();
    for prop in &mut description.properties {
        prop.decorators.clear();
        strip_ref(&mut prop.ty);
    }
    for ctor in &mut description.constructors {
        for param in &mut ctor.params {
            strip_ref(&mut param.ty);
        }
    }
    for ty in description
        .types
        .iter_mut()
        .chain(description.type_arguments.iter_mut())
        .chain(description.base_type.iter_mut())
        .chain(description.interface.iter_mut())
    {
        strip_ref(ty);
    }
}

fn strip_ref(ty: &mut TypeRef) {
    if let TypeRef::Inline(description) = ty {
        strip(description);
    }
}
