//! Registration of emitted metadata batches.

use crate::error::RuntimeError;
use crate::store::MetadataStore;
use tracing::debug;
use tsr_common::{MetadataSource, short_array};

/// Register every entry of every module, in emission order. Returns the
/// number of entries registered.
///
/// Accepts both plain and short-array compacted payloads.
pub fn load_metadata(
    store: &dyn MetadataStore,
    payload: serde_json::Value,
) -> Result<usize, RuntimeError> {
    let source: MetadataSource = serde_json::from_value(short_array::expand(payload))
        .map_err(|e| RuntimeError::InvalidMetadata(e.to_string()))?;

    for module in &source.modules {
        debug!(module = %module.module, types = module.types.len(), "load_metadata");
        for entry in &module.types {
            store.set(entry.id, &entry.description);
        }
    }
    Ok(source.type_count())
}

pub fn load_metadata_str(store: &dyn MetadataStore, payload: &str) -> Result<usize, RuntimeError> {
    let value = serde_json::from_str(payload)
        .map_err(|e| RuntimeError::InvalidMetadata(e.to_string()))?;
    load_metadata(store, value)
}

#[cfg(test)]
#[path = "../tests/loader_tests.rs"]
mod tests;
