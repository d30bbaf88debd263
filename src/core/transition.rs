//! Transitions between vertices.

use super::element::VertexId;
use super::guard::Guard;
use super::vertex::Action;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Selects how a transition computes the elements it exits and enters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Exit up to the lowest common ancestor of source and target, then enter down to the target.
    #[default]
    External,
    /// Stay inside the source state; only the active descendant on the way to the target is exited.
    Local,
    /// No exit or entry; only the effects run.
    Internal,
}

/// An edge of the model graph.
pub struct Transition<C> {
    pub(crate) source: VertexId,
    pub(crate) target: VertexId,
    pub(crate) event: Option<(TypeId, &'static str)>,
    pub(crate) guard: Guard<C>,
    pub(crate) effects: Vec<Action<C>>,
    pub(crate) kind: TransitionKind,
}

impl<C> Transition<C> {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn guard(&self) -> &Guard<C> {
        &self.guard
    }

    pub fn is_else(&self) -> bool {
        self.guard.is_else()
    }

    /// Type name of the event filter, if the transition has one.
    pub fn event_name(&self) -> Option<&'static str> {
        self.event.map(|(_, name)| name)
    }

    /// Check the event filter and the guard against a trigger.
    pub fn matches(&self, context: &C, trigger: &dyn Any) -> bool {
        let type_matches = self
            .event
            .is_none_or(|(event, _)| Any::type_id(trigger) == event);
        type_matches && self.guard.check(context, trigger)
    }

    pub(crate) fn run_effects(&self, context: &mut C, trigger: &dyn Any) {
        for effect in &self.effects {
            effect(&mut *context, trigger);
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("event", &self.event_name())
            .field("guard", &self.guard)
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Pong;

    fn transition(event: Option<(TypeId, &'static str)>, guard: Guard<u32>) -> Transition<u32> {
        Transition {
            source: VertexId(1),
            target: VertexId(2),
            event,
            guard,
            effects: Vec::new(),
            kind: TransitionKind::External,
        }
    }

    #[test]
    fn unfiltered_transition_matches_any_trigger() {
        let t = transition(None, Guard::Always);
        assert!(t.matches(&0, &Ping));
        assert!(t.matches(&0, &Pong));
    }

    #[test]
    fn filter_compares_runtime_type() {
        let t = transition(Some((TypeId::of::<Ping>(), "Ping")), Guard::Always);
        assert!(t.matches(&0, &Ping));
        assert!(!t.matches(&0, &Pong));
        assert_eq!(t.event_name(), Some("Ping"));
    }

    #[test]
    fn guard_is_applied_after_filter() {
        let t = transition(
            Some((TypeId::of::<Ping>(), "Ping")),
            Guard::new(|ctx: &u32, _| *ctx > 5),
        );
        assert!(!t.matches(&1, &Ping));
        assert!(t.matches(&6, &Ping));
        assert!(!t.matches(&6, &Pong));
    }

    #[test]
    fn else_transition_never_matches() {
        let t = transition(None, Guard::Else);
        assert!(t.is_else());
        assert!(!t.matches(&0, &Ping));
    }

    #[test]
    fn effects_run_in_order() {
        let mut t = transition(None, Guard::Always);
        t.effects.push(Box::new(|ctx: &mut u32, _| *ctx += 1));
        t.effects.push(Box::new(|ctx: &mut u32, _| *ctx *= 10));

        let mut ctx = 1;
        t.run_effects(&mut ctx, &Ping);
        assert_eq!(ctx, 20);
    }

    #[test]
    fn default_kind_is_external() {
        assert_eq!(TransitionKind::default(), TransitionKind::External);
    }
}
