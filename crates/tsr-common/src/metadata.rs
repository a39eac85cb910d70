//! Per-module metadata batches.
//!
//! One `ModuleMetadata` is produced for every compiled module that contains
//! reflective queries. Entries are ordered so that a type is registered
//! before any non-cyclic user of it.

use crate::description::{TypeDescription, TypeId};
use serde::{Deserialize, Serialize};

/// One registration: `set(id, description)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(rename = "i")]
    pub id: TypeId,
    #[serde(rename = "d")]
    pub description: TypeDescription,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module path relative to the project root
    #[serde(rename = "m")]
    pub module: String,
    #[serde(rename = "t", default)]
    pub types: Vec<TypeEntry>,
}

impl ModuleMetadata {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            types: Vec::new(),
        }
    }

    pub fn push(&mut self, id: TypeId, description: TypeDescription) {
        self.types.push(TypeEntry { id, description });
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeDescription> {
        self.types
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.description)
    }
}

/// Input handed to the metadata middleware pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSource {
    pub modules: Vec<ModuleMetadata>,
}

impl MetadataSource {
    pub fn type_count(&self) -> usize {
        self.modules.iter().map(|m| m.types.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.modules.iter().flat_map(|m| m.types.iter())
    }
}
