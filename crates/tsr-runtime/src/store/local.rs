use super::MetadataStore;
use super::table::TypeTable;
use crate::lazy::TypeThunk;
use crate::types::Type;
use std::sync::Arc;
use tsr_common::{TypeDescription, TypeId};

/// Isolated store. Clones share one table.
#[derive(Clone, Default)]
pub struct LocalMetadataStore {
    table: Arc<TypeTable>,
}

impl LocalMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for LocalMetadataStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.table.get(id)
    }

    fn get_lazy(&self, id: TypeId) -> TypeThunk {
        let table = Arc::downgrade(&self.table);
        Box::new(move || table.upgrade()?.get(id))
    }

    fn set(&self, id: TypeId, description: &TypeDescription) -> Arc<Type> {
        self.table.insert(id, description, self)
    }

    fn wrap(&self, description: &TypeDescription) -> Arc<Type> {
        Arc::new(Type::from_description(description, self))
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}
