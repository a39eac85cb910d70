//! Compile-time half of tsr.
//!
//! Reads a static type graph through [`TypeOracle`], describes every type
//! reached from a reflective call site, and emits per-module registration
//! batches plus call-site replacements:
//!
//! ```text
//! TypeOracle -> DescriptionGenerator -> GenerationContext (ids, order)
//!            -> MetadataPipeline (middlewares, short-array) -> EmittedModule
//! ```

pub mod call_site;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod graph;
pub mod identity;
pub mod middleware;
pub mod oracle;
pub mod printer;
pub mod recursion;
pub mod transformer;

pub use call_site::{GenericArgument, Replacement, SiteReplacement};
pub use config::{ConfigError, ReflectConfig, ResolvedConfig, discover_project_root};
pub use context::GenerationContext;
pub use error::GenerationError;
pub use generator::DescriptionGenerator;
pub use graph::{CallSite, PropertyNode, SourceModule, TypeGraph};
pub use middleware::{MetadataMiddleware, MetadataPipeline, MiddlewareContext, Next};
pub use oracle::{TypeHandle, TypeOracle, TypeShape};
pub use transformer::{EmittedModule, GenerationArtifact, ModuleTransformer, TransformOutcome};

/// Transform every module of `graph` with the middlewares named in `config`.
pub fn generate(graph: &TypeGraph, config: &ResolvedConfig) -> Result<TransformOutcome, ConfigError> {
    let pipeline = MetadataPipeline::from_config(config)?;
    let mut transformer = ModuleTransformer::new(graph, config, &pipeline);
    Ok(transformer.transform_all(graph.modules()))
}
