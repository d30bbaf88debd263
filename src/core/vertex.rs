//! States and pseudo-states.

use super::element::{RegionId, TransitionId};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Boxed action run on entry, exit, or as a transition effect.
pub type Action<C> = Box<dyn Fn(&mut C, &dyn Any) + Send + Sync>;

/// The kinds of transient vertex a region may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PseudoStateKind {
    /// Default entry point of a region.
    Initial,
    /// Resume the last known state of the region only.
    ShallowHistory,
    /// Resume the last known state of the region and of every nested region.
    DeepHistory,
    /// Static conditional branch, resolved before the compound transition runs.
    Junction,
    /// Dynamic conditional branch, resolved after the pseudo-state is entered.
    Choice,
}

impl PseudoStateKind {
    pub fn is_history(self) -> bool {
        matches!(self, Self::ShallowHistory | Self::DeepHistory)
    }

    /// Initial and history kinds mark where a region starts.
    pub fn is_starting(self) -> bool {
        matches!(self, Self::Initial | Self::ShallowHistory | Self::DeepHistory)
    }

    /// Junction and choice kinds may carry an else transition.
    pub fn is_branch(self) -> bool {
        matches!(self, Self::Junction | Self::Choice)
    }
}

/// Behaviour owned by a state.
pub struct StateData<C> {
    pub(crate) regions: Vec<RegionId>,
    pub(crate) entry: Vec<Action<C>>,
    pub(crate) exit: Vec<Action<C>>,
    pub(crate) deferrable: Vec<TypeId>,
}

impl<C> StateData<C> {
    pub(crate) fn new() -> Self {
        Self {
            regions: Vec::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            deferrable: Vec::new(),
        }
    }

    /// Child regions in model order.
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    /// Whether triggers of this runtime type are deferred while the state is active.
    pub fn defers(&self, event: TypeId) -> bool {
        self.deferrable.contains(&event)
    }

    pub fn deferrable(&self) -> &[TypeId] {
        &self.deferrable
    }
}

/// Discriminates states from pseudo-states.
pub enum VertexKind<C> {
    State(StateData<C>),
    Pseudo(PseudoStateKind),
}

/// A transition endpoint: a state or a pseudo-state.
pub struct Vertex<C> {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: Option<RegionId>,
    pub(crate) outgoing: Vec<TransitionId>,
    pub(crate) kind: VertexKind<C>,
}

impl<C> Vertex<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dot-joined names from the root state down to this vertex.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The owning region; `None` only for the root state.
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }

    pub fn kind(&self) -> &VertexKind<C> {
        &self.kind
    }

    pub fn is_state(&self) -> bool {
        matches!(self.kind, VertexKind::State(_))
    }

    pub fn state_data(&self) -> Option<&StateData<C>> {
        match &self.kind {
            VertexKind::State(data) => Some(data),
            VertexKind::Pseudo(_) => None,
        }
    }

    pub fn pseudo_kind(&self) -> Option<PseudoStateKind> {
        match self.kind {
            VertexKind::Pseudo(kind) => Some(kind),
            VertexKind::State(_) => None,
        }
    }

    /// Child regions; empty for pseudo-states and simple states.
    pub fn regions(&self) -> &[RegionId] {
        self.state_data().map(StateData::regions).unwrap_or(&[])
    }

    /// A state with no child regions.
    pub fn is_simple(&self) -> bool {
        self.regions().is_empty()
    }

    /// A state with no outgoing transitions.
    pub fn is_final(&self) -> bool {
        self.is_state() && self.outgoing.is_empty()
    }

    pub fn is_history(&self) -> bool {
        self.pseudo_kind().is_some_and(PseudoStateKind::is_history)
    }
}

impl<C> fmt::Debug for Vertex<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            VertexKind::State(_) => "State".to_string(),
            VertexKind::Pseudo(kind) => format!("{:?}", kind),
        };
        f.debug_struct("Vertex")
            .field("name", &self.qualified_name)
            .field("kind", &kind)
            .field("outgoing", &self.outgoing.len())
            .finish()
    }
}
