//! Builder for constructing models.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{
    Model, PseudoStateKind, Region, RegionId, StateData, TransitionId, Vertex, VertexId,
    VertexKind,
};
use crate::runtime::{Categories, Logger};
use crate::validation::validate_model;
use std::any::{Any, TypeId};

/// Name of the region created when a vertex is added directly under a state.
pub const DEFAULT_REGION: &str = "default";

/// Where a new vertex is placed.
///
/// A state parent places the vertex in that state's `default` region,
/// creating the region the first time it is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    State(VertexId),
    Region(RegionId),
}

impl From<VertexId> for Parent {
    fn from(id: VertexId) -> Self {
        Parent::State(id)
    }
}

impl From<RegionId> for Parent {
    fn from(id: RegionId) -> Self {
        Parent::Region(id)
    }
}

/// Builder for constructing models with a fluent API.
///
/// Structural mistakes that can be detected locally (a second initial
/// pseudo-state, a second else branch) fail the call that introduces them.
/// Whole-model rules are checked by [`build`](Self::build).
pub struct ModelBuilder<C> {
    model: Model<C>,
    logger: Logger,
}

impl<C: 'static> ModelBuilder<C> {
    /// Create a builder with a root state named after the model.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Vertex {
            name: name.clone(),
            qualified_name: name.clone(),
            parent: None,
            outgoing: Vec::new(),
            kind: VertexKind::State(StateData::new()),
        };

        Self {
            model: Model {
                name,
                root: VertexId(0),
                regions: Vec::new(),
                vertices: vec![root],
                transitions: Vec::new(),
            },
            logger: Logger::new(),
        }
    }

    /// Route the model creation message to `logger`.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    pub fn root(&self) -> VertexId {
        self.model.root
    }

    /// Add a named region to a state.
    pub fn region(
        &mut self,
        name: impl Into<String>,
        state: VertexId,
    ) -> Result<RegionId, BuildError> {
        let name = name.into();
        let parent = self.vertex(state)?;
        let qualified_name = format!("{}.{}", parent.qualified_name, name);
        self.state_data_mut(state)?;

        let id = RegionId(self.model.regions.len());
        self.model.regions.push(Region {
            name,
            qualified_name,
            parent: state,
            vertices: Vec::new(),
            starting: None,
        });
        self.state_data_mut(state)?.regions.push(id);

        Ok(id)
    }

    /// Add a state.
    pub fn state(
        &mut self,
        name: impl Into<String>,
        parent: impl Into<Parent>,
    ) -> Result<VertexId, BuildError> {
        let region = self.resolve_parent(parent.into())?;
        Ok(self.push_vertex(name.into(), region, VertexKind::State(StateData::new())))
    }

    /// Add a pseudo-state. A region holds at most one initial or history
    /// pseudo-state.
    pub fn pseudo_state(
        &mut self,
        name: impl Into<String>,
        parent: impl Into<Parent>,
        kind: PseudoStateKind,
    ) -> Result<VertexId, BuildError> {
        let region = self.resolve_parent(parent.into())?;

        if kind.is_starting() && self.model.regions[region.0].starting.is_some() {
            return Err(BuildError::DoubleInitial {
                region: self.model.regions[region.0].qualified_name.clone(),
            });
        }

        let id = self.push_vertex(name.into(), region, VertexKind::Pseudo(kind));
        if kind.is_starting() {
            self.model.regions[region.0].starting = Some(id);
        }

        Ok(id)
    }

    /// Append an entry action to a state.
    pub fn entry<F>(&mut self, state: VertexId, action: F) -> Result<(), BuildError>
    where
        F: Fn(&mut C, &dyn Any) + Send + Sync + 'static,
    {
        self.state_data_mut(state)?.entry.push(Box::new(action));
        Ok(())
    }

    /// Append an exit action to a state.
    pub fn exit<F>(&mut self, state: VertexId, action: F) -> Result<(), BuildError>
    where
        F: Fn(&mut C, &dyn Any) + Send + Sync + 'static,
    {
        self.state_data_mut(state)?.exit.push(Box::new(action));
        Ok(())
    }

    /// Defer triggers of type `E` while `state` is active.
    pub fn defer<E: Any>(&mut self, state: VertexId) -> Result<(), BuildError> {
        let data = self.state_data_mut(state)?;
        let event = TypeId::of::<E>();
        if !data.deferrable.contains(&event) {
            data.deferrable.push(event);
        }
        Ok(())
    }

    /// Add a transition built from `builder`.
    pub fn add_transition(
        &mut self,
        builder: TransitionBuilder<C>,
    ) -> Result<TransitionId, BuildError> {
        let source = self.vertex(builder.source())?;
        let source_name = source.qualified_name.clone();

        if builder.is_else() {
            if !source.pseudo_kind().is_some_and(PseudoStateKind::is_branch) {
                return Err(BuildError::ElseOnNonBranch { vertex: source_name });
            }
            let has_else = source
                .outgoing
                .iter()
                .any(|t| self.model.transitions[t.0].is_else());
            if has_else {
                return Err(BuildError::DoubleElse { vertex: source_name });
            }
        }

        if let Some(target) = builder.resolved_target() {
            self.vertex(target)?;
        }

        let transition = builder.build(&source_name)?;
        let source = transition.source;
        let id = TransitionId(self.model.transitions.len());
        self.model.transitions.push(transition);
        self.model.vertices[source.0].outgoing.push(id);

        Ok(id)
    }

    /// Validate and return the finished model.
    pub fn build(self) -> Result<Model<C>, BuildError> {
        validate_model(&self.model)
            .into_result()
            .map_err(|violations| BuildError::Invalid(violations.into_vec()))?;

        let model = self.model;
        self.logger.write(Categories::CREATE, || {
            format!(
                "Create model {} ({} vertices, {} regions, {} transitions)",
                model.name,
                model.vertices.len(),
                model.regions.len(),
                model.transitions.len()
            )
        });

        Ok(model)
    }

    fn vertex(&self, id: VertexId) -> Result<&Vertex<C>, BuildError> {
        self.model
            .vertices
            .get(id.0)
            .ok_or(BuildError::UnknownVertex(id))
    }

    fn state_data_mut(&mut self, id: VertexId) -> Result<&mut StateData<C>, BuildError> {
        let vertex = self
            .model
            .vertices
            .get_mut(id.0)
            .ok_or(BuildError::UnknownVertex(id))?;

        match &mut vertex.kind {
            VertexKind::State(data) => Ok(data),
            VertexKind::Pseudo(_) => Err(BuildError::NotAState {
                vertex: vertex.qualified_name.clone(),
            }),
        }
    }

    fn resolve_parent(&mut self, parent: Parent) -> Result<RegionId, BuildError> {
        match parent {
            Parent::Region(id) => {
                if id.0 < self.model.regions.len() {
                    Ok(id)
                } else {
                    Err(BuildError::UnknownRegion(id))
                }
            }
            Parent::State(state) => {
                let regions = self.state_data_mut(state)?.regions.clone();
                let existing = regions
                    .into_iter()
                    .find(|r| self.model.regions[r.0].name == DEFAULT_REGION);

                match existing {
                    Some(region) => Ok(region),
                    None => self.region(DEFAULT_REGION, state),
                }
            }
        }
    }

    fn push_vertex(&mut self, name: String, region: RegionId, kind: VertexKind<C>) -> VertexId {
        let id = VertexId(self.model.vertices.len());
        let qualified_name = format!("{}.{}", self.model.regions[region.0].qualified_name, name);

        self.model.vertices.push(Vertex {
            name,
            qualified_name,
            parent: Some(region),
            outgoing: Vec::new(),
            kind,
        });
        self.model.regions[region.0].vertices.push(id);

        id
    }
}
