//! Per-compilation id table.
//!
//! Ids are assigned in visit order and registered *before* a type's members
//! are walked, which is what turns a cyclic graph into a finite description
//! set. Descriptions are recorded in completion order so that a module's
//! registrations list non-cyclic dependencies before their users.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsr_common::{ModuleMetadata, TypeDescription, TypeId};

/// Where an identity key stands in the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdState {
    /// Reserved; its description is still being produced.
    InProgress(TypeId),
    Complete(TypeId),
}

impl IdState {
    pub fn id(self) -> TypeId {
        match self {
            IdState::InProgress(id) | IdState::Complete(id) => id,
        }
    }
}

/// Undo point taken when an id is reserved.
#[derive(Debug)]
pub struct Reservation {
    pub id: TypeId,
    key: String,
    completed_before: usize,
}

#[derive(Debug)]
pub struct GenerationContext {
    ids: FxHashMap<String, TypeId>,
    in_progress: FxHashSet<TypeId>,
    descriptions: FxHashMap<TypeId, TypeDescription>,
    /// Completed ids with their keys, in completion order.
    completed: Vec<(TypeId, String)>,
    next_id: u32,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationContext {
    pub fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            descriptions: FxHashMap::default(),
            completed: Vec::new(),
            next_id: TypeId::FIRST_VALID,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<IdState> {
        let id = *self.ids.get(key)?;
        Some(if self.in_progress.contains(&id) {
            IdState::InProgress(id)
        } else {
            IdState::Complete(id)
        })
    }

    /// Allocate an id for `key` and mark it in progress.
    pub fn reserve(&mut self, key: &str) -> Reservation {
        let id = TypeId(self.next_id);
        self.next_id += 1;
        self.ids.insert(key.to_string(), id);
        self.in_progress.insert(id);
        trace!(type_id = %id, key, "GenerationContext::reserve");
        Reservation {
            id,
            key: key.to_string(),
            completed_before: self.completed.len(),
        }
    }

    pub fn complete(&mut self, reservation: Reservation, description: TypeDescription) {
        let Reservation { id, key, .. } = reservation;
        self.in_progress.remove(&id);
        self.descriptions.insert(id, description);
        self.completed.push((id, key));
    }

    /// Forget the reserved id and everything completed while it was in
    /// progress; those descriptions may reference it.
    pub fn abandon(&mut self, reservation: Reservation) {
        let Reservation {
            id,
            key,
            completed_before,
        } = reservation;
        self.in_progress.remove(&id);
        self.ids.remove(&key);
        for (dropped, dropped_key) in self.completed.drain(completed_before..) {
            self.descriptions.remove(&dropped);
            self.ids.remove(&dropped_key);
        }
        trace!(type_id = %id, key = %key, "GenerationContext::abandon");
    }

    pub fn description(&self, id: TypeId) -> Option<&TypeDescription> {
        self.descriptions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Completed ids in completion order.
    pub fn order(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.completed.iter().map(|(id, _)| *id)
    }

    /// Registrations for `roots` and everything they reference, in
    /// completion order.
    pub fn module_metadata(&self, module: &str, roots: &[TypeId]) -> ModuleMetadata {
        let mut needed: FxHashSet<TypeId> = FxHashSet::default();
        let mut stack: Vec<TypeId> = roots.to_vec();
        while let Some(id) = stack.pop() {
            if !needed.insert(id) {
                continue;
            }
            if let Some(description) = self.descriptions.get(&id) {
                description.for_each_referenced_id(&mut |dep| {
                    if !needed.contains(&dep) {
                        stack.push(dep);
                    }
                });
            }
        }

        let mut metadata = ModuleMetadata::new(module);
        for id in self.order().filter(|id| needed.contains(id)) {
            if let Some(description) = self.descriptions.get(&id) {
                metadata.push(id, description.clone());
            }
        }
        metadata
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
