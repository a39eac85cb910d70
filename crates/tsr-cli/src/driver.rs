//! Subcommand implementations, kept free of terminal I/O so they can be
//! driven from tests.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tsr_common::{MetadataSource, TypeId, short_array};
use tsr_generator::config::STANDALONE_CONFIG;
use tsr_generator::{
    GenerationArtifact, ReflectConfig, ResolvedConfig, TransformOutcome, TypeGraph, generate,
    printer,
};
use tsr_runtime::{LocalMetadataStore, MetadataStore, Type, load_metadata};

use crate::args::{Emit, GenerateArgs, InspectArgs};

/// Project files searched, in order, when `--project` names a directory.
const PROJECT_FILES: &[&str] = &[STANDALONE_CONFIG, "tsconfig.json"];

pub struct GenerateReport {
    pub outcome: TransformOutcome,
    /// Rendered artifact in the requested form.
    pub output: String,
}

/// Load the reflection options. Without `--project`, defaults apply and the
/// project root is discovered from `cwd`.
pub fn resolve_config(project: Option<&Path>, cwd: &Path) -> Result<ResolvedConfig> {
    let Some(project) = project else {
        return Ok(ReflectConfig::default().resolve(cwd)?);
    };
    let path = cwd.join(project);
    let file = if path.is_dir() {
        match find_project_file(&path) {
            Some(file) => file,
            None => return Ok(ReflectConfig::default().resolve(&path)?),
        }
    } else if path.is_file() {
        path
    } else {
        bail!("project config not found at {}", path.display());
    };

    let base_dir = file.parent().unwrap_or(cwd);
    let config = ReflectConfig::load(&file)
        .with_context(|| format!("failed to load {}", file.display()))?
        .resolve(base_dir)?;
    Ok(config)
}

fn find_project_file(dir: &Path) -> Option<PathBuf> {
    PROJECT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

pub fn run_generate(args: &GenerateArgs, cwd: &Path) -> Result<GenerateReport> {
    let graph_path = cwd.join(&args.graph);
    let source = std::fs::read_to_string(&graph_path)
        .with_context(|| format!("failed to read type graph {}", graph_path.display()))?;
    let graph = TypeGraph::from_json(&source)
        .with_context(|| format!("invalid type graph {}", graph_path.display()))?;
    let config = resolve_config(args.project.as_deref(), cwd)?;
    debug!(types = graph.len(), modules = graph.modules().len(), "loaded type graph");

    let outcome = generate(&graph, &config)?;
    let output = match args.emit {
        Emit::Json => serde_json::to_string_pretty(&outcome.artifact)?,
        Emit::Js => {
            let mut out = String::new();
            for module in &outcome.artifact.modules {
                out.push_str(&printer::render_module(module)?);
            }
            out
        }
    };

    if let Some(out) = &args.out {
        let out = cwd.join(out);
        std::fs::write(&out, &output)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "artifact written");
    }
    Ok(GenerateReport { outcome, output })
}

/// A type reconstructed from an artifact.
pub struct InspectedType {
    pub id: TypeId,
    pub ty: Arc<Type>,
}

pub struct InspectReport {
    /// Keeps lazy references of `types` resolvable.
    pub store: LocalMetadataStore,
    pub types: Vec<InspectedType>,
}

pub fn run_inspect(args: &InspectArgs, cwd: &Path) -> Result<InspectReport> {
    let path = cwd.join(&args.metadata);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    let artifact: GenerationArtifact = serde_json::from_str(&source)
        .with_context(|| format!("invalid artifact {}", path.display()))?;

    let store = LocalMetadataStore::new();
    let mut ids = Vec::new();
    for module in &artifact.modules {
        load_metadata(&store, module.metadata.clone())
            .with_context(|| format!("invalid metadata for module {}", module.path))?;
        let batch: MetadataSource =
            serde_json::from_value(short_array::expand(module.metadata.clone()))?;
        for entry in batch.entries() {
            if !ids.contains(&entry.id) {
                ids.push(entry.id);
            }
        }
    }

    if let Some(id) = args.id {
        ids = vec![TypeId(id)];
    }
    ids.sort();
    let mut types = Vec::with_capacity(ids.len());
    for id in ids {
        types.push(InspectedType {
            id,
            ty: store.resolve(id)?,
        });
    }
    Ok(InspectReport { store, types })
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
