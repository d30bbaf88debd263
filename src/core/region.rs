//! Regions: ordered containers of vertices.

use super::element::VertexId;

/// One orthogonal "thread" of state within a composite state.
#[derive(Clone, Debug)]
pub struct Region {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: VertexId,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) starting: Option<VertexId>,
}

impl Region {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The state that owns this region.
    pub fn parent(&self) -> VertexId {
        self.parent
    }

    /// Child vertices in the order they were added.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// The initial or history pseudo-state of the region, if any.
    pub fn starting(&self) -> Option<VertexId> {
        self.starting
    }
}
