//! Pool of deferred triggers awaiting a configuration that accepts them.

use std::any::{Any, TypeId};
use std::fmt;

/// An owned trigger that was deferred by an active state.
pub struct DeferredEvent {
    pub(crate) event: Box<dyn Any + Send>,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) fired: bool,
}

impl DeferredEvent {
    pub(crate) fn new<E: Any + Send>(event: E) -> Self {
        Self {
            event: Box::new(event),
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            fired: false,
        }
    }

    pub(crate) fn from_boxed(event: Box<dyn Any + Send>) -> Self {
        let any: &dyn Any = event.as_ref();
        let type_id = any.type_id();
        Self {
            event,
            type_id,
            type_name: "<restored>",
            fired: false,
        }
    }

    pub fn event(&self) -> &dyn Any {
        self.event.as_ref()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for DeferredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEvent")
            .field("type", &self.type_name)
            .field("fired", &self.fired)
            .finish()
    }
}

/// Ordered multiset of deferred triggers.
///
/// Entries are tombstoned while the pool is scanned and only dropped by
/// [`compact`](DeferredPool::compact), so indices stay stable during replay.
/// Changes made inside a transaction are undone by
/// [`rollback`](DeferredPool::rollback).
#[derive(Debug, Default)]
pub struct DeferredPool {
    entries: Vec<DeferredEvent>,
    committed_len: usize,
}

impl DeferredPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: DeferredEvent) {
        self.entries.push(event);
    }

    /// Live (non-tombstoned) entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DeferredEvent> {
        self.entries.iter().filter(|e| !e.fired)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, index: usize) -> &DeferredEvent {
        &self.entries[index]
    }

    pub(crate) fn set_fired(&mut self, index: usize, fired: bool) {
        self.entries[index].fired = fired;
    }

    /// Drop tombstoned entries.
    pub(crate) fn compact(&mut self) {
        self.entries.retain(|e| !e.fired);
    }

    /// Make the current contents durable.
    pub(crate) fn commit(&mut self) {
        self.compact();
        self.committed_len = self.entries.len();
    }

    /// Forget entries added since the last commit and revive tombstones.
    pub(crate) fn rollback(&mut self) {
        self.entries.truncate(self.committed_len);
        for entry in &mut self.entries {
            entry.fired = false;
        }
    }
}
