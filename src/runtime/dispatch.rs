//! Trigger dispatch, transition traversal, entry and exit cascades.
//!
//! A [`Dispatcher`] lives for the duration of one transaction. It reads the
//! immutable model, writes only to the dirty side of the active state
//! configuration, and hands the context to user actions.

use super::environment::Environment;
use super::error::EngineError;
use super::log::Categories;
use super::path::{descend, resolve_external};
use super::store::ActiveConfiguration;
use crate::core::{
    Completion, Element, Model, PseudoStateKind, RegionId, TransitionId, TransitionKind, VertexId,
    VertexKind,
};
use std::any::{Any, TypeId};

pub(crate) struct Dispatcher<'a, C> {
    pub(crate) model: &'a Model<C>,
    store: &'a mut ActiveConfiguration,
    context: &'a mut C,
    environment: &'a mut Environment,
    /// Set when an active state deferred the trigger under evaluation.
    pub(crate) deferred: bool,
    /// Number of transitions traversed since the last reset.
    pub(crate) transitions: usize,
}

impl<'a, C> Dispatcher<'a, C> {
    pub(crate) fn new(
        model: &'a Model<C>,
        store: &'a mut ActiveConfiguration,
        context: &'a mut C,
        environment: &'a mut Environment,
    ) -> Self {
        Self {
            model,
            store,
            context,
            environment,
            deferred: false,
            transitions: 0,
        }
    }

    pub(crate) fn reset_counters(&mut self) {
        self.deferred = false;
        self.transitions = 0;
    }

    fn log<F>(&self, category: Categories, message: F)
    where
        F: FnOnce() -> String,
    {
        self.environment.logger.write(category, message);
    }

    pub(crate) fn set_state(&mut self, region: RegionId, state: VertexId) {
        self.store.set_state(region, state);
    }

    /// Whether `vertex` and all its ancestors are the current vertices of their regions.
    pub(crate) fn is_active(&self, vertex: VertexId) -> bool {
        match self.model.vertex(vertex).parent() {
            None => true,
            Some(region) => {
                self.store.get_vertex(region) == Some(vertex)
                    && self.is_active(self.model.region(region).parent())
            }
        }
    }

    /// A state is complete when every child region rests in a final state.
    fn is_complete(&self, state: VertexId) -> bool {
        self.model.vertex(state).regions().iter().all(|region| {
            self.store
                .get_state(*region)
                .is_some_and(|s| self.model.vertex(s).is_final())
        })
    }

    /// Deferrable trigger types of every state in the active configuration.
    pub(crate) fn active_deferrable(&self) -> Vec<TypeId> {
        let mut types = Vec::new();
        let mut pending = vec![self.model.root()];

        while let Some(state) = pending.pop() {
            if let Some(data) = self.model.vertex(state).state_data() {
                types.extend_from_slice(data.deferrable());
                pending.extend(
                    data.regions()
                        .iter()
                        .filter_map(|region| self.store.get_state(*region)),
                );
            }
        }

        types
    }

    /// Evaluate a trigger against an active state and its active descendants.
    ///
    /// Returns true if the trigger caused a transition or was deferred.
    pub(crate) fn evaluate_state(
        &mut self,
        state: VertexId,
        trigger: &dyn Any,
    ) -> Result<bool, EngineError> {
        let model = self.model;
        let vertex = model.vertex(state);

        let mut result = self.delegate(state, trigger)?;

        if !result {
            if let Some(transition) = self.select_transition(state, trigger)? {
                self.traverse(transition, trigger)?;
                result = true;
            } else if vertex
                .state_data()
                .is_some_and(|data| data.defers(Any::type_id(trigger)))
            {
                self.log(Categories::EVALUATE, || {
                    format!("{} deferred trigger", vertex.qualified_name())
                });
                self.deferred = true;
                result = true;
            }
        }

        if result
            && vertex
                .parent()
                .is_some_and(|region| self.store.get_state(region) == Some(state))
        {
            self.completion(state)?;
        }

        Ok(result)
    }

    /// Pass the trigger to the active state of each child region in model order.
    fn delegate(&mut self, state: VertexId, trigger: &dyn Any) -> Result<bool, EngineError> {
        let model = self.model;
        let vertex = model.vertex(state);
        let mut result = false;

        for region in vertex.regions() {
            let Some(active) = self.store.get_state(*region) else {
                continue;
            };

            self.log(Categories::EVALUATE, || {
                format!(
                    "{} delegating to {}",
                    vertex.qualified_name(),
                    model.vertex(active).qualified_name()
                )
            });

            if self.evaluate_state(active, trigger)? {
                result = true;

                // A transition below may have exited this state; siblings are then stale.
                if let Some(parent) = vertex.parent() {
                    if self.store.get_state(parent) != Some(state) {
                        break;
                    }
                }
            }
        }

        Ok(result)
    }

    /// Test the outgoing transitions of a complete state against its
    /// completion trigger. Child regions never see `Completion { state }`.
    fn completion(&mut self, state: VertexId) -> Result<(), EngineError> {
        if !self.is_complete(state) {
            return Ok(());
        }

        let model = self.model;
        self.log(Categories::EVALUATE, || {
            format!("{} is complete", model.vertex(state).qualified_name())
        });

        let trigger = Completion { state };
        if let Some(transition) = self.select_transition(state, &trigger)? {
            self.traverse(transition, &trigger)?;
        }
        Ok(())
    }

    /// Find the outgoing transition of `vertex` that the trigger selects.
    fn select_transition(
        &mut self,
        vertex: VertexId,
        trigger: &dyn Any,
    ) -> Result<Option<TransitionId>, EngineError> {
        let model = self.model;
        let source = model.vertex(vertex);
        let context: &C = &*self.context;

        let matching: Vec<TransitionId> = source
            .outgoing()
            .iter()
            .copied()
            .filter(|t| model.transition(*t).matches(context, trigger))
            .collect();

        let selected = match (source.pseudo_kind(), matching.len()) {
            (_, 0) => None,
            (_, 1) => Some(matching[0]),
            (Some(PseudoStateKind::Choice), ceiling) => {
                let value = self.environment.random.next(ceiling);
                let picked = matching
                    .get(value)
                    .copied()
                    .ok_or(EngineError::RandomOutOfRange { value, ceiling })?;
                Some(picked)
            }
            (_, matched) => {
                return Err(EngineError::AmbiguousTransition {
                    vertex: source.qualified_name().to_string(),
                    matched,
                })
            }
        };

        match (selected, source.pseudo_kind()) {
            (Some(transition), _) => Ok(Some(transition)),
            (None, Some(_)) => {
                let fallback = source
                    .outgoing()
                    .iter()
                    .copied()
                    .find(|t| model.transition(*t).is_else());
                fallback.map(Some).ok_or_else(|| EngineError::NoTransitionFound {
                    vertex: source.qualified_name().to_string(),
                })
            }
            (None, None) => Ok(None),
        }
    }

    /// Traverse a transition, following any chain of junctions it lands on.
    ///
    /// Junction guards are tested while the chain is gathered, before the
    /// source is exited. The gathered chain is then executed as one compound
    /// transition: a single exit, every effect in order, a single entry.
    /// Gathering before running is the chosen order, so a junction guard
    /// never sees the effects of the transitions leading into it.
    ///
    /// Every traversal enters its target afresh; deep history only applies
    /// inside the region that resumes it.
    fn traverse(&mut self, transition: TransitionId, trigger: &dyn Any) -> Result<(), EngineError> {
        let model = self.model;
        let first = model.transition(transition);
        let limit = model.transition_count();

        let mut chain = vec![transition];
        let mut target = first.target();
        while model.vertex(target).pseudo_kind() == Some(PseudoStateKind::Junction) {
            if chain.len() > limit {
                return Err(EngineError::JunctionCycle {
                    vertex: model.vertex(first.source()).qualified_name().to_string(),
                    limit,
                });
            }
            let next = self.select_transition(target, trigger)?.ok_or_else(|| {
                EngineError::NoTransitionFound {
                    vertex: model.vertex(target).qualified_name().to_string(),
                }
            })?;
            chain.push(next);
            target = model.transition(next).target();
        }

        self.transitions += 1;
        self.log(Categories::TRANSITION, || {
            format!(
                "{:?} transition {} -> {}",
                first.kind(),
                model.vertex(first.source()).qualified_name(),
                model.vertex(target).qualified_name()
            )
        });

        match first.kind() {
            TransitionKind::Internal => {
                self.run_effects(&chain, trigger);
                self.completion(first.source())
            }
            TransitionKind::Local if model.is_descendant(target, first.source()) => {
                self.traverse_local(first.source(), target, &chain, trigger)
            }
            _ => {
                let path = resolve_external(model, first.source(), target);
                self.exit(path.exit, trigger);
                self.run_effects(&chain, trigger);
                self.enter_path(&path.enter, trigger)
            }
        }
    }

    /// Exit only the active vertex on the way from `source` to `target`.
    fn traverse_local(
        &mut self,
        source: VertexId,
        target: VertexId,
        chain: &[TransitionId],
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        let model = self.model;

        let mut vertex = target;
        while let Some(parent) = model.parent_state(vertex) {
            if parent == source || self.is_active(parent) {
                break;
            }
            vertex = parent;
        }

        if let Some(region) = model.vertex(vertex).parent() {
            if let Some(current) = self.store.get_vertex(region) {
                self.exit(Element::Vertex(current), trigger);
            }
        }

        self.run_effects(chain, trigger);
        let enter = descend(model, vertex, target);
        self.enter_path(&enter, trigger)
    }

    fn run_effects(&mut self, chain: &[TransitionId], trigger: &dyn Any) {
        for transition in chain {
            self.model
                .transition(*transition)
                .run_effects(&mut *self.context, trigger);
        }
    }

    /// Exit an element after exiting its active descendants.
    fn exit(&mut self, element: Element, trigger: &dyn Any) {
        let model = self.model;

        match element {
            Element::Region(region) => {
                if let Some(current) = self.store.get_vertex(region) {
                    self.exit(Element::Vertex(current), trigger);
                }
            }
            Element::Vertex(vertex) => {
                if let VertexKind::State(data) = model.vertex(vertex).kind() {
                    for region in data.regions.iter().rev() {
                        self.exit(Element::Region(*region), trigger);
                    }
                    for action in &data.exit {
                        action(&mut *self.context, trigger);
                    }
                }
            }
        }

        self.log(Categories::ENTRY_EXIT, || {
            format!("Leave {}", model.element_name(element))
        });
    }

    /// Enter each element of a path; only the last one cascades downwards.
    pub(crate) fn enter_path(
        &mut self,
        elements: &[Element],
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        for (index, element) in elements.iter().enumerate() {
            self.enter_head(*element, trigger, elements.get(index + 1).copied())?;
        }
        if let Some(last) = elements.last() {
            self.enter_tail(*last, false, trigger)?;
        }
        Ok(())
    }

    /// Mark an element active and run its entry actions.
    ///
    /// When a composite state is entered on the way to a deeper target,
    /// `next` is the region on that path and every other child region is
    /// entered in full here.
    fn enter_head(
        &mut self,
        element: Element,
        trigger: &dyn Any,
        next: Option<Element>,
    ) -> Result<(), EngineError> {
        let model = self.model;
        self.log(Categories::ENTRY_EXIT, || {
            format!("Enter {}", model.element_name(element))
        });

        let Element::Vertex(id) = element else {
            return Ok(());
        };
        let vertex = model.vertex(id);

        if let Some(region) = vertex.parent() {
            if vertex.is_state() {
                self.store.set_state(region, id);
            } else {
                self.store.set_vertex(region, id);
            }
        }

        if let VertexKind::State(data) = vertex.kind() {
            for action in &data.entry {
                action(&mut *self.context, trigger);
            }
            if let Some(Element::Region(on_path)) = next {
                for region in data.regions.iter().filter(|r| **r != on_path) {
                    self.enter_region(*region, false, trigger)?;
                }
            }
        }

        Ok(())
    }

    /// Cascade entry below an element that has had its head step.
    fn enter_tail(
        &mut self,
        element: Element,
        deep: bool,
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        let model = self.model;

        match element {
            Element::Region(region) => self.enter_region_tail(region, deep, trigger),
            Element::Vertex(id) => match model.vertex(id).kind() {
                VertexKind::State(data) => {
                    for region in &data.regions {
                        self.enter_region(*region, deep, trigger)?;
                    }
                    self.completion(id)
                }
                VertexKind::Pseudo(_) => self.leave_pseudo_state(id, trigger),
            },
        }
    }

    fn enter_region(
        &mut self,
        region: RegionId,
        deep: bool,
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        self.enter_head(Element::Region(region), trigger, None)?;
        self.enter_region_tail(region, deep, trigger)
    }

    /// Enter the starting vertex of a region, or its last known state when
    /// history applies.
    fn enter_region_tail(
        &mut self,
        region: RegionId,
        deep: bool,
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        let model = self.model;
        let starting = model.region(region).starting();
        let starting_kind = starting.and_then(|s| model.vertex(s).pseudo_kind());

        let use_history = deep || starting_kind.is_some_and(PseudoStateKind::is_history);
        let resume = if use_history {
            self.store.get_state(region)
        } else {
            None
        };
        let deep = deep || starting_kind == Some(PseudoStateKind::DeepHistory);

        let vertex = resume
            .or(starting)
            .ok_or_else(|| EngineError::MissingStartingVertex {
                region: model.region(region).qualified_name().to_string(),
            })?;

        self.enter_head(Element::Vertex(vertex), trigger, None)?;
        self.enter_tail(Element::Vertex(vertex), deep, trigger)
    }

    /// Pseudo-states are transient: select an outgoing transition and take it.
    fn leave_pseudo_state(
        &mut self,
        vertex: VertexId,
        trigger: &dyn Any,
    ) -> Result<(), EngineError> {
        let transition = self.select_transition(vertex, trigger)?.ok_or_else(|| {
            EngineError::NoTransitionFound {
                vertex: self.model.vertex(vertex).qualified_name().to_string(),
            }
        })?;
        self.traverse(transition, trigger)
    }
}
