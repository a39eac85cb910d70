//! `getType` entry point.
//!
//! Reflective queries are rewritten at compile time into one of the
//! [`TypeRequest`] forms. A query that reaches the runtime unprocessed is an
//! error, never a guess.

use crate::error::RuntimeError;
use crate::store::{MetadataStore, global_store};
use crate::types::Type;
use std::sync::Arc;
use tsr_common::{TypeDescription, TypeId};

#[derive(Clone, Debug, PartialEq)]
pub enum TypeRequest {
    /// Look up a registered type.
    Id(TypeId),
    /// Build from a description; register it when an id is given.
    Description {
        description: TypeDescription,
        id: Option<TypeId>,
    },
    /// The call site was never rewritten.
    Unprocessed,
}

impl From<TypeId> for TypeRequest {
    fn from(id: TypeId) -> Self {
        TypeRequest::Id(id)
    }
}

impl From<TypeDescription> for TypeRequest {
    fn from(description: TypeDescription) -> Self {
        TypeRequest::Description {
            description,
            id: None,
        }
    }
}

/// Answer a request against the process store.
pub fn get_type(request: impl Into<TypeRequest>) -> Result<Arc<Type>, RuntimeError> {
    get_type_in(global_store().as_ref(), request)
}

pub fn get_type_in(
    store: &dyn MetadataStore,
    request: impl Into<TypeRequest>,
) -> Result<Arc<Type>, RuntimeError> {
    match request.into() {
        TypeRequest::Id(id) => store.resolve(id),
        TypeRequest::Description {
            description,
            id: Some(id),
        } => Ok(store.set(id, &description)),
        TypeRequest::Description {
            description,
            id: None,
        } => Ok(store.wrap(&description)),
        TypeRequest::Unprocessed => Err(RuntimeError::NotTransformed),
    }
}
