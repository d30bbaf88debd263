//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, Transition, TransitionKind, VertexId};
use std::any::{type_name, Any, TypeId};

/// Builder for constructing transitions with a fluent API.
///
/// Only the source is required up front. The target defaults to the source
/// for internal transitions and must be set with [`to`](Self::to) otherwise.
pub struct TransitionBuilder<C> {
    source: VertexId,
    target: Option<VertexId>,
    event: Option<(TypeId, &'static str)>,
    guard: Guard<C>,
    effects: Vec<Action<C>>,
    kind: TransitionKind,
}

impl<C: 'static> TransitionBuilder<C> {
    pub fn new(source: VertexId) -> Self {
        Self {
            source,
            target: None,
            event: None,
            guard: Guard::Always,
            effects: Vec::new(),
            kind: TransitionKind::External,
        }
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Set the target vertex.
    pub fn to(mut self, target: VertexId) -> Self {
        self.target = Some(target);
        self
    }

    /// Only match triggers whose runtime type is `E`.
    pub fn on<E: Any>(mut self) -> Self {
        self.event = Some((TypeId::of::<E>(), type_name::<E>()));
        self
    }

    /// Add a guard over the context and the untyped trigger.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &dyn Any) -> bool + Send + Sync + 'static,
    {
        self.guard = Guard::new(predicate);
        self
    }

    /// Match triggers of type `E` that also pass `predicate`.
    pub fn when_event<E, F>(self, predicate: F) -> Self
    where
        E: Any,
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        self.on::<E>().when(move |context, trigger| {
            trigger
                .downcast_ref::<E>()
                .is_some_and(|event| predicate(context, event))
        })
    }

    /// Mark this as the else branch of a junction or choice.
    pub fn otherwise(mut self) -> Self {
        self.guard = Guard::Else;
        self
    }

    /// Append an effect; effects run in the order they were added.
    pub fn effect<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, &dyn Any) + Send + Sync + 'static,
    {
        self.effects.push(Box::new(action));
        self
    }

    pub fn kind(mut self, kind: TransitionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn local(self) -> Self {
        self.kind(TransitionKind::Local)
    }

    pub fn internal(self) -> Self {
        self.kind(TransitionKind::Internal)
    }

    pub(crate) fn is_else(&self) -> bool {
        self.guard.is_else()
    }

    /// The target, defaulting to the source for internal transitions.
    pub(crate) fn resolved_target(&self) -> Option<VertexId> {
        match (self.target, self.kind) {
            (Some(target), _) => Some(target),
            (None, TransitionKind::Internal) => Some(self.source),
            (None, _) => None,
        }
    }

    /// Build the transition. `source_name` is used in error messages.
    pub(crate) fn build(self, source_name: &str) -> Result<Transition<C>, BuildError> {
        let target = self
            .resolved_target()
            .ok_or_else(|| BuildError::MissingTarget {
                vertex: source_name.to_string(),
            })?;

        Ok(Transition {
            source: self.source,
            target,
            event: self.event,
            guard: self.guard,
            effects: self.effects,
            kind: self.kind,
        })
    }
}
