//! Deferred type handles.
//!
//! A `LazyType` is what a live [`Type`] stores wherever its description
//! points at another type. Building a type therefore never touches the types
//! it refers to; they are resolved on first read by a consumer, after the
//! whole graph has been registered.
//!
//! States:
//!
//! ```text
//! unresolved(id)     --get()--> resolved (non-owning, store keeps the Type)
//! unresolved(thunk)  --get()--> resolved (owning)
//! resolved                       never reverts
//! ```
//!
//! A read that finds nothing (the referenced type is still being registered)
//! returns `None` and is not memoized, so a later read can still succeed.

use crate::types::Type;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, Weak};
use tsr_common::TypeId;

/// Zero-argument accessor producing a type, evaluated at resolution time.
pub type TypeThunk = Box<dyn Fn() -> Option<Arc<Type>> + Send + Sync>;

enum Source {
    /// Registered type; `lookup` consults the store at call time.
    Store { id: TypeId, lookup: TypeThunk },
    /// Arbitrary deferred producer.
    Thunk(TypeThunk),
}

enum Resolved {
    Owned(Arc<Type>),
    Shared(Weak<Type>),
}

impl Resolved {
    fn upgrade(&self) -> Option<Arc<Type>> {
        match self {
            Resolved::Owned(ty) => Some(Arc::clone(ty)),
            Resolved::Shared(weak) => weak.upgrade(),
        }
    }
}

pub struct LazyType {
    source: Option<Source>,
    resolved: OnceCell<Resolved>,
}

impl LazyType {
    /// Already-resolved handle that owns its type (inline descriptions).
    pub fn resolved(ty: Arc<Type>) -> Self {
        Self {
            source: None,
            resolved: OnceCell::with_value(Resolved::Owned(ty)),
        }
    }

    /// Handle to a registered type, resolved through `lookup` on first read.
    pub fn from_store(id: TypeId, lookup: TypeThunk) -> Self {
        Self {
            source: Some(Source::Store { id, lookup }),
            resolved: OnceCell::new(),
        }
    }

    pub fn from_thunk(thunk: impl Fn() -> Option<Arc<Type>> + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Source::Thunk(Box::new(thunk))),
            resolved: OnceCell::new(),
        }
    }

    /// Resolve now if unresolved, return the cached result otherwise.
    pub fn get(&self) -> Option<Arc<Type>> {
        if let Some(resolved) = self.resolved.get() {
            return resolved.upgrade();
        }

        let (ty, resolved) = match self.source.as_ref()? {
            Source::Store { lookup, .. } => {
                let ty = lookup()?;
                let weak = Arc::downgrade(&ty);
                (ty, Resolved::Shared(weak))
            }
            Source::Thunk(thunk) => {
                let ty = thunk()?;
                (Arc::clone(&ty), Resolved::Owned(ty))
            }
        };

        // A concurrent reader may have won; both resolved the same instance.
        let _ = self.resolved.set(resolved);
        Some(ty)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Store id this handle points at, if it was built from one.
    pub fn id(&self) -> Option<TypeId> {
        match &self.source {
            Some(Source::Store { id, .. }) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Debug for LazyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the resolved type itself: the graph may be cyclic.
        let state = if self.is_resolved() {
            "resolved"
        } else {
            "unresolved"
        };
        f.debug_struct("LazyType")
            .field("id", &self.id())
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/lazy_tests.rs"]
mod tests;
