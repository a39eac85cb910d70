//! Metadata stores: `TypeId -> Type` caches.
//!
//! A store never builds a type on `get`; only `set` (registered) and `wrap`
//! (inline, unregistered) construct one. Which store a process uses is
//! decided once by running the detectors in order.

mod local;
mod process;
mod table;

pub use local::LocalMetadataStore;
pub use process::ProcessMetadataStore;

use crate::error::RuntimeError;
use crate::lazy::TypeThunk;
use crate::types::Type;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};
use tsr_common::{TypeDescription, TypeId};

/// Environment variable forcing a store implementation (`local`/`process`).
pub const STORE_ENV: &str = "TSR_METADATA_STORE";

pub trait MetadataStore: Send + Sync {
    /// Short implementation name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Previously registered type; never constructs.
    fn get(&self, id: TypeId) -> Option<Arc<Type>>;

    /// Deferred accessor for `id`. Safe to call before `set(id, ..)`; the
    /// lookup happens when the thunk runs.
    fn get_lazy(&self, id: TypeId) -> TypeThunk;

    /// Build (or return the existing) type for `id` and register it.
    /// Idempotent per id. An identity key already registered under another
    /// id yields the existing type.
    fn set(&self, id: TypeId, description: &TypeDescription) -> Arc<Type>;

    /// Build a type from an inline description without registering it.
    fn wrap(&self, description: &TypeDescription) -> Arc<Type>;

    /// Number of registered ids.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, id: TypeId) -> Result<Arc<Type>, RuntimeError> {
        self.get(id).ok_or(RuntimeError::UnknownTypeId(id))
    }
}

/// Environment probe: yields a store when its environment applies.
pub type StoreDetector = fn() -> Option<Arc<dyn MetadataStore>>;

/// Detectors consulted by [`global_store`], in order.
pub const DEFAULT_DETECTORS: &[StoreDetector] = &[detect_env_override, detect_process];

static GLOBAL_STORE: OnceCell<Arc<dyn MetadataStore>> = OnceCell::new();

/// First store yielded by `detectors`.
pub fn select_store(detectors: &[StoreDetector]) -> Option<Arc<dyn MetadataStore>> {
    detectors.iter().find_map(|detect| detect())
}

/// The store used by reflective queries, selected once per process.
pub fn global_store() -> Arc<dyn MetadataStore> {
    let store = GLOBAL_STORE.get_or_init(|| {
        let store = select_store(DEFAULT_DETECTORS)
            .unwrap_or_else(|| Arc::new(ProcessMetadataStore::initiate()));
        debug!(store = store.name(), "global_store - selected");
        store
    });
    Arc::clone(store)
}

fn detect_env_override() -> Option<Arc<dyn MetadataStore>> {
    let requested = std::env::var(STORE_ENV).ok()?;
    match requested.trim().to_ascii_lowercase().as_str() {
        "local" => Some(Arc::new(LocalMetadataStore::new())),
        "process" => Some(Arc::new(ProcessMetadataStore::initiate())),
        "" => None,
        other => {
            warn!(value = other, env = STORE_ENV, "unknown metadata store, falling back");
            None
        }
    }
}

fn detect_process() -> Option<Arc<dyn MetadataStore>> {
    Some(Arc::new(ProcessMetadataStore::initiate()))
}

#[cfg(test)]
#[path = "../../tests/store_tests.rs"]
mod tests;
