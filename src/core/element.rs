//! Arena identifiers and the synthetic triggers raised by the engine itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a [`Region`](super::Region) within its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub(crate) usize);

/// Index of a [`Vertex`](super::Vertex) within its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub(crate) usize);

/// Index of a [`Transition`](super::Transition) within its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub(crate) usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl TransitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertex#{}", self.0)
    }
}

/// A node on an ancestry chain: either a region or a vertex.
///
/// Ancestry alternates between the two kinds, starting at the root state:
/// `root -> region -> vertex -> region -> vertex ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Region(RegionId),
    Vertex(VertexId),
}

/// Trigger used when a state becomes complete.
///
/// Completion transitions are transitions without an event filter, or with
/// an explicit `on::<Completion>()` filter. The `state` field names the
/// state that completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub state: VertexId,
}

/// Trigger passed to entry actions and initial transitions when an
/// instance is first created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Initialize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_expose_their_index() {
        assert_eq!(RegionId(3).index(), 3);
        assert_eq!(VertexId(7).index(), 7);
        assert_eq!(TransitionId(0).index(), 0);
    }

    #[test]
    fn ids_display_with_kind_prefix() {
        assert_eq!(RegionId(2).to_string(), "region#2");
        assert_eq!(VertexId(5).to_string(), "vertex#5");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&VertexId(4)).unwrap();
        assert_eq!(json, "4");
        let back: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VertexId(4));
    }
}
