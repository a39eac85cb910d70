//! Per-module transformation: call sites -> descriptions -> pipeline.
//!
//! One `ModuleTransformer` spans a whole compilation so ids stay unique and
//! shared types are described once. Each module still emits every
//! registration its call sites need, so modules load independently; the
//! runtime store makes repeated registrations of an id a no-op.

use crate::call_site::{SiteReplacement, replace_call_site};
use crate::config::ResolvedConfig;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::generator::DescriptionGenerator;
use crate::graph::SourceModule;
use crate::middleware::MetadataPipeline;
use crate::oracle::{TRACE_MARKER, TypeOracle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use tsr_common::{MetadataSource, ModuleMetadata};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedModule {
    pub path: String,
    /// Pipeline output: the module's batch, ready for `load_metadata`.
    pub metadata: Value,
    /// Registrations before the pipeline ran, in emission order.
    #[serde(skip)]
    pub registrations: ModuleMetadata,
    pub call_sites: Vec<SiteReplacement>,
    /// Functions marked `trace`; the host wraps them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traced_functions: Vec<String>,
}

/// Everything one compilation produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationArtifact {
    pub package: String,
    pub modules: Vec<EmittedModule>,
}

#[derive(Debug)]
pub struct ModuleFailure {
    pub path: String,
    pub error: GenerationError,
}

#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub artifact: GenerationArtifact,
    pub failures: Vec<ModuleFailure>,
}

pub struct ModuleTransformer<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    config: &'a ResolvedConfig,
    pipeline: &'a MetadataPipeline,
    ctx: GenerationContext,
}

impl<'a, O: TypeOracle + ?Sized> ModuleTransformer<'a, O> {
    pub fn new(oracle: &'a O, config: &'a ResolvedConfig, pipeline: &'a MetadataPipeline) -> Self {
        Self {
            oracle,
            config,
            pipeline,
            ctx: GenerationContext::new(),
        }
    }

    pub fn context(&self) -> &GenerationContext {
        &self.ctx
    }

    pub fn transform(&mut self, module: &SourceModule) -> Result<EmittedModule, GenerationError> {
        if !module.call_sites.is_empty() && !module.imports_reflection {
            warn!(
                module = %module.path,
                "module contains reflective queries but does not import the reflection API"
            );
        }

        let mut call_sites = Vec::with_capacity(module.call_sites.len());
        let mut roots = Vec::new();
        {
            let mut generator = DescriptionGenerator::new(self.oracle, self.config, &mut self.ctx);
            for call_site in &module.call_sites {
                let Some(replacement) = replace_call_site(&mut generator, call_site)? else {
                    continue;
                };
                replacement.for_each_id(&mut |id| roots.push(id));
                call_sites.push(SiteReplacement {
                    site: call_site.site().to_string(),
                    replacement,
                });
            }
        }

        let registrations = self.ctx.module_metadata(&module.path, &roots);
        let source = MetadataSource {
            modules: vec![registrations.clone()],
        };
        let metadata = self.pipeline.run(&module.path, &source)?;

        let traced_functions = module
            .functions
            .iter()
            .filter(|name| {
                self.oracle
                    .function(name)
                    .is_some_and(|function| function.has_marker(TRACE_MARKER))
            })
            .cloned()
            .collect();

        debug!(
            module = %module.path,
            call_sites = call_sites.len(),
            types = registrations.types.len(),
            "ModuleTransformer::transform"
        );

        Ok(EmittedModule {
            path: module.path.clone(),
            metadata,
            registrations,
            call_sites,
            traced_functions,
        })
    }

    /// Transform every module. A failing module is reported and skipped.
    pub fn transform_all<'m>(
        &mut self,
        modules: impl IntoIterator<Item = &'m SourceModule>,
    ) -> TransformOutcome {
        let mut outcome = TransformOutcome {
            artifact: GenerationArtifact {
                package: self.config.package_name.clone(),
                modules: Vec::new(),
            },
            failures: Vec::new(),
        };
        for module in modules {
            match self.transform(module) {
                Ok(emitted) => outcome.artifact.modules.push(emitted),
                Err(error) => outcome.failures.push(ModuleFailure {
                    path: module.path.clone(),
                    error,
                }),
            }
        }
        outcome
    }
}

#[cfg(test)]
#[path = "../tests/transformer_tests.rs"]
mod tests;
