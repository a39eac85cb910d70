//! Metadata middleware pipeline.
//!
//! Runs once per module between generation and emission. Steps are called in
//! declaration order, each receiving the current result (initially `None`)
//! and a [`Next`] continuation:
//!
//! ```text
//! user step 1 -> user step 2 -> ... -> short-array serializer
//! ```
//!
//! A step may rewrite `ctx.result` before or after calling `next.run(ctx)`,
//! or end the chain early by not calling it. When the chain leaves no
//! result, the plain serialized batch is emitted.

mod short_array;
mod strip;

pub use short_array::ShortArraySerializer;
pub use strip::StripAnnotations;

use crate::config::{ConfigError, ResolvedConfig};
use crate::error::GenerationError;
use serde_json::Value;
use tracing::trace;
use tsr_common::MetadataSource;

/// State handed along the chain.
pub struct MiddlewareContext<'a> {
    /// Module path relative to the project root
    pub module: &'a str,
    /// Collected registrations, untouched by earlier steps.
    pub source: &'a MetadataSource,
    /// Best-known result so far.
    pub result: Option<Value>,
}

impl MiddlewareContext<'_> {
    /// Current result, or the plain serialization of `source` when no step
    /// produced one yet.
    pub fn take_or_serialize(&mut self) -> Result<Value, GenerationError> {
        match self.result.take() {
            Some(value) => Ok(value),
            None => Ok(serde_json::to_value(self.source)?),
        }
    }
}

pub trait MetadataMiddleware: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, ctx: &mut MiddlewareContext<'_>, next: Next<'_>) -> Result<(), GenerationError>;
}

/// Continuation: the steps after the current one.
pub struct Next<'a> {
    rest: &'a [Box<dyn MetadataMiddleware>],
}

impl Next<'_> {
    pub fn run(self, ctx: &mut MiddlewareContext<'_>) -> Result<(), GenerationError> {
        match self.rest.split_first() {
            Some((step, rest)) => {
                trace!(module = ctx.module, step = step.name(), "middleware");
                step.process(ctx, Next { rest })
            }
            None => Ok(()),
        }
    }
}

/// Middleware from a closure.
pub struct FnMiddleware<F> {
    name: String,
    f: F,
}

pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnMiddleware<F>
where
    F: Fn(&mut MiddlewareContext<'_>, Next<'_>) -> Result<(), GenerationError> + Send + Sync,
{
    FnMiddleware {
        name: name.into(),
        f,
    }
}

impl<F> MetadataMiddleware for FnMiddleware<F>
where
    F: Fn(&mut MiddlewareContext<'_>, Next<'_>) -> Result<(), GenerationError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, ctx: &mut MiddlewareContext<'_>, next: Next<'_>) -> Result<(), GenerationError> {
        (self.f)(ctx, next)
    }
}

/// Ordered steps; the short-array serializer is always last.
pub struct MetadataPipeline {
    steps: Vec<Box<dyn MetadataMiddleware>>,
}

impl Default for MetadataPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataPipeline {
    pub fn new() -> Self {
        Self {
            steps: vec![Box::new(ShortArraySerializer)],
        }
    }

    /// Built-in middlewares named in the configuration, in order.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let mut pipeline = Self::new();
        for name in &config.middlewares {
            match name.as_str() {
                StripAnnotations::NAME => pipeline.push(StripAnnotations),
                other => {
                    return Err(ConfigError::UnknownMiddleware {
                        name: other.to_string(),
                    });
                }
            }
        }
        Ok(pipeline)
    }

    pub fn with(mut self, middleware: impl MetadataMiddleware + 'static) -> Self {
        self.push(middleware);
        self
    }

    /// Append a step, ahead of the serializer.
    pub fn push(&mut self, middleware: impl MetadataMiddleware + 'static) {
        let at = self.steps.len().saturating_sub(1);
        self.steps.insert(at, Box::new(middleware));
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn run(&self, module: &str, source: &MetadataSource) -> Result<Value, GenerationError> {
        let mut ctx = MiddlewareContext {
            module,
            source,
            result: None,
        };
        Next { rest: &self.steps }.run(&mut ctx)?;
        ctx.take_or_serialize()
    }
}

#[cfg(test)]
#[path = "../../tests/middleware_tests.rs"]
mod tests;
