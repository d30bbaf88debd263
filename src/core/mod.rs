//! Core model types for hierarchical state machines.
//!
//! This module contains the static graph of a state machine:
//! - Regions that hold vertices and record their starting pseudo-state
//! - Vertices, which are either states or pseudo-states
//! - Transitions with event filters, guards and effect actions
//!
//! A [`Model`] is immutable once built. Every element lives in an arena
//! owned by the model and is referenced by a small copyable id, so parent
//! lookups are O(1) without back-pointers.

mod element;
mod guard;
mod model;
mod region;
mod transition;
mod vertex;

pub use element::{Completion, Element, Initialize, RegionId, TransitionId, VertexId};
pub use guard::{Guard, Predicate};
pub use model::Model;
pub use region::Region;
pub use transition::{Transition, TransitionKind};
pub use vertex::{Action, PseudoStateKind, StateData, Vertex, VertexKind};
