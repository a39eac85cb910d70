//! Process-wide registry of class constructors.
//!
//! Executable code cannot travel in a description. A class description only
//! carries a [`ConstructorImport`](tsr_common::ConstructorImport) locator;
//! the host resolves it and registers a factory here under the class's
//! identity key, after which `Type::ctor()` returns it.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// Factory producing a fresh instance of a reflected class.
pub type Constructor = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

static CONSTRUCTORS: Lazy<DashMap<String, Constructor>> = Lazy::new(DashMap::new);

/// Register `factory` as the constructor of the class with `full_name`.
/// A later registration for the same key replaces the earlier one.
pub fn register_constructor<T, F>(full_name: impl Into<String>, factory: F)
where
    T: Any + Send,
    F: Fn() -> T + Send + Sync + 'static,
{
    let full_name = full_name.into();
    trace!(key = %full_name, "register_constructor");
    let ctor: Constructor = Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>);
    CONSTRUCTORS.insert(full_name, ctor);
}

pub(crate) fn lookup(full_name: &str) -> Option<Constructor> {
    CONSTRUCTORS.get(full_name).map(|r| Arc::clone(r.value()))
}
