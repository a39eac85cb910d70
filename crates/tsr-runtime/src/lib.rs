//! Runtime half of tsr: lazy reconstruction of reflected types.
//!
//! Descriptions emitted at compile time are turned into live [`Type`] objects
//! on demand. The pieces, leaves first:
//!
//! - **Lazy references** (`LazyType`): deferred handles that resolve a nested
//!   type on first read, which is what keeps cyclic graphs finite.
//! - **Metadata stores** (`MetadataStore`): keyed caches mapping numeric ids to
//!   live types. `ProcessMetadataStore` collapses every handle in the process
//!   onto one table; `LocalMetadataStore` is an isolated table.
//! - **Live types** (`Type`): read accessors over a description, identity
//!   comparison by full name.
//! - **Entry points**: `get_type` for rewritten reflective queries,
//!   `load_metadata` for emitted module batches.

pub mod constructors;
pub mod entry;
pub mod error;
pub mod generic;
pub mod lazy;
pub mod loader;
pub mod store;
pub mod types;

pub use constructors::{Constructor, register_constructor};
pub use entry::{TypeRequest, get_type, get_type_in};
pub use error::RuntimeError;
pub use generic::{GENERIC_PARAMS, GenericParams};
pub use lazy::{LazyType, TypeThunk};
pub use loader::{load_metadata, load_metadata_str};
pub use store::{
    LocalMetadataStore, MetadataStore, ProcessMetadataStore, STORE_ENV, StoreDetector,
    global_store, select_store,
};
pub use types::{ConstructorInfo, Decorator, MethodParameter, PropertyInfo, Type};

pub use tsr_common::{AccessModifier, Accessor, LiteralValue, TypeDescription, TypeId, TypeKind};
