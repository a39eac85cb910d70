use super::MetadataStore;
use super::table::TypeTable;
use crate::lazy::TypeThunk;
use crate::types::Type;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;
use tsr_common::{TypeDescription, TypeId};

/// Well-known process slot. The first store to initiate it owns the table;
/// every later handle attaches to the same one.
static PROCESS_SLOT: OnceCell<Arc<TypeTable>> = OnceCell::new();

/// Handle onto the process-wide table.
#[derive(Clone)]
pub struct ProcessMetadataStore {
    table: Arc<TypeTable>,
}

impl ProcessMetadataStore {
    /// Attach to the process slot, creating its table on first use.
    pub fn initiate() -> Self {
        let table = PROCESS_SLOT.get_or_init(|| {
            debug!("ProcessMetadataStore::initiate - creating process table");
            Arc::new(TypeTable::new())
        });
        Self {
            table: Arc::clone(table),
        }
    }

    /// Whether some handle already initiated the process table.
    pub fn is_initiated() -> bool {
        PROCESS_SLOT.get().is_some()
    }
}

impl Default for ProcessMetadataStore {
    fn default() -> Self {
        Self::initiate()
    }
}

impl MetadataStore for ProcessMetadataStore {
    fn name(&self) -> &'static str {
        "process"
    }

    fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.table.get(id)
    }

    fn get_lazy(&self, id: TypeId) -> TypeThunk {
        Box::new(move || PROCESS_SLOT.get()?.get(id))
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
