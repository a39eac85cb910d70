use super::{MetadataMiddleware, MiddlewareContext, Next};
use crate::error::GenerationError;
use tsr_common::short_array;

/// Compacts homogeneous object arrays of the result.
pub struct ShortArraySerializer;

impl ShortArraySerializer {
    pub const NAME: &'static str = "short-array";
}

impl MetadataMiddleware for ShortArraySerializer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, ctx: &mut MiddlewareContext<'_>, next: Next<'_>) -> Result<(), GenerationError> {
        let value = ctx.take_or_serialize()?;
        ctx.result = Some(short_array::compact(value));
        next.run(ctx)
    }
}
