//! Carrier for generic arguments forwarded through reflective calls.
//!
//! A call to a function whose type parameters are reflected receives an
//! extra argument named [`GENERIC_PARAMS`] mapping each parameter name to
//! its type. Inside the callee, a reflective query on `T` reads it back.

use crate::types::Type;
use indexmap::IndexMap;
use std::sync::Arc;

/// Name of the implicit argument in rewritten code.
pub const GENERIC_PARAMS: &str = "__genericParams__";

#[derive(Clone, Debug, Default)]
pub struct GenericParams {
    params: IndexMap<String, Arc<Type>>,
}

impl GenericParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, ty: Arc<Type>) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: Arc<Type>) {
        self.params.insert(name.into(), ty);
    }

    /// Type bound to the parameter `name`, if the caller forwarded it.
    pub fn get(&self, name: &str) -> Option<Arc<Type>> {
        self.params.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<(String, Arc<Type>)> for GenericParams {
    fn from_iter<I: IntoIterator<Item = (String, Arc<Type>)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}
