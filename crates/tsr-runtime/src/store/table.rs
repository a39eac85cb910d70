//! Shared id/identity-key table behind every store implementation.

use crate::store::MetadataStore;
use crate::types::Type;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{trace, warn};
use tsr_common::{TypeDescription, TypeId};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Thread-safe `TypeId -> Type` table plus an identity-key side table.
///
/// Each registered identity key maps to exactly one live `Type`, no matter
/// how many ids (from different compilations) point at it.
pub(crate) struct TypeTable {
    /// Unique instance ID for debugging
    instance_id: u64,
    types: DashMap<TypeId, Arc<Type>>,
    by_key: DashMap<String, Arc<Type>>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub(crate) fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeTable::new - creating new instance");
        Self {
            instance_id,
            types: DashMap::new(),
            by_key: DashMap::new(),
        }
    }

    pub(crate) fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.types.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Register `description` under `id`, returning the live type now bound
    /// to it. `store` is what the new type's lazy references resolve through.
    ///
    /// No map guard is held while the type is built.
    pub(crate) fn insert(
        &self,
        id: TypeId,
        description: &TypeDescription,
        store: &dyn MetadataStore,
    ) -> Arc<Type> {
        if let Some(existing) = self.get(id) {
            if existing.full_name() != description.full_name {
                warn!(
                    instance_id = self.instance_id,
                    type_id = %id,
                    registered = existing.full_name(),
                    incoming = %description.full_name,
                    "TypeTable::insert - id already bound to another type, keeping the first"
                );
            }
            return existing;
        }

        let key = &description.full_name;
        if !key.is_empty() {
            let shared = self.by_key.get(key).map(|r| Arc::clone(r.value()));
            if let Some(shared) = shared {
                trace!(
                    instance_id = self.instance_id,
                    type_id = %id,
                    key = %key,
                    "TypeTable::insert - aliasing existing identity"
                );
                return self.bind(id, shared);
            }
        }

        let ty = Arc::new(Type::from_description(description, store));
        let ty = if key.is_empty() {
            ty
        } else {
            Arc::clone(self.by_key.entry(key.clone()).or_insert(ty).value())
        };

        trace!(
            instance_id = self.instance_id,
            type_id = %id,
            kind = ?description.kind,
            key = %key,
            "TypeTable::insert"
        );
        self.bind(id, ty)
    }

    fn bind(&self, id: TypeId, ty: Arc<Type>) -> Arc<Type> {
        Arc::clone(self.types.entry(id).or_insert(ty).value())
    }

    pub(crate) fn len(&self) -> usize {
        self.types.len()
    }
}
