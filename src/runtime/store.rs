//! Transaction-scoped active state configuration.
//!
//! Reads fall back from the dirty maps to the clean map; writes only ever
//! touch the dirty maps. The clean map is updated by [`commit`], which the
//! instance calls only when an operation completes without error, so a
//! failed evaluation never leaves partial writes visible.
//!
//! [`commit`]: ActiveConfiguration::commit

use crate::core::{RegionId, VertexId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct ActiveConfiguration {
    clean: HashMap<RegionId, VertexId>,
    dirty_state: HashMap<RegionId, VertexId>,
    dirty_vertex: HashMap<RegionId, VertexId>,
}

impl ActiveConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state entered in `region`, including uncommitted writes.
    pub fn get_state(&self, region: RegionId) -> Option<VertexId> {
        self.dirty_state
            .get(&region)
            .or_else(|| self.clean.get(&region))
            .copied()
    }

    /// Last vertex entered in `region`, which may be a pseudo-state while a
    /// transition is in flight.
    pub fn get_vertex(&self, region: RegionId) -> Option<VertexId> {
        self.dirty_vertex
            .get(&region)
            .or_else(|| self.clean.get(&region))
            .copied()
    }

    /// Record `state` as active in `region`.
    pub fn set_state(&mut self, region: RegionId, state: VertexId) {
        self.dirty_state.insert(region, state);
        self.dirty_vertex.insert(region, state);
    }

    /// Record a pseudo-state as the current vertex of `region`.
    pub fn set_vertex(&mut self, region: RegionId, vertex: VertexId) {
        self.dirty_vertex.insert(region, vertex);
    }

    /// Durable read that ignores uncommitted writes.
    pub fn last_known_state(&self, region: RegionId) -> Option<VertexId> {
        self.clean.get(&region).copied()
    }

    pub fn begin(&mut self) {
        self.dirty_state.clear();
        self.dirty_vertex.clear();
    }

    /// Copy dirty states into the clean map and clear the scratch maps.
    pub fn commit(&mut self) {
        self.clean.extend(self.dirty_state.drain());
        self.dirty_vertex.clear();
    }

    /// Discard uncommitted writes.
    pub fn rollback(&mut self) {
        self.begin();
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_state.is_empty() || !self.dirty_vertex.is_empty()
    }

    /// Committed entries, for snapshots.
    pub fn clean_entries(&self) -> impl Iterator<Item = (RegionId, VertexId)> + '_ {
        self.clean.iter().map(|(region, state)| (*region, *state))
    }
}
