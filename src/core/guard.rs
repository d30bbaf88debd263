//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions of the instance context and the trigger
//! being evaluated. They must not mutate anything; effects belong in
//! transition actions.

use std::any::Any;
use std::fmt;

/// Boxed guard predicate over the context `C` and the current trigger.
pub type Predicate<C> = Box<dyn Fn(&C, &dyn Any) -> bool + Send + Sync>;

/// Condition attached to a transition.
///
/// `Else` marks the fallback branch of a junction or choice pseudo-state.
/// It never matches during ordinary selection and is only taken when no
/// other outgoing transition of the pseudo-state matches.
///
/// # Example
///
/// ```rust
/// use statechart::core::Guard;
///
/// struct Counter {
///     value: u32,
/// }
///
/// let positive = Guard::new(|ctx: &Counter, _trigger| ctx.value > 0);
///
/// assert!(positive.check(&Counter { value: 1 }, &()));
/// assert!(!positive.check(&Counter { value: 0 }, &()));
/// ```
pub enum Guard<C> {
    /// Always passes.
    Always,
    /// Passes when the predicate returns true.
    When(Predicate<C>),
    /// Fallback branch of a junction or choice.
    Else,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &dyn Any) -> bool + Send + Sync + 'static,
    {
        Guard::When(Box::new(predicate))
    }

    /// Evaluate the guard. `Else` guards never pass here.
    pub fn check(&self, context: &C, trigger: &dyn Any) -> bool {
        match self {
            Guard::Always => true,
            Guard::When(predicate) => predicate(context, trigger),
            Guard::Else => false,
        }
    }

    pub fn is_else(&self) -> bool {
        matches!(self, Guard::Else)
    }
}

impl<C> Default for Guard<C> {
    fn default() -> Self {
        Guard::Always
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => f.write_str("Always"),
            Guard::When(_) => f.write_str("When(..)"),
            Guard::Else => f.write_str("Else"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Data {
        hello: Option<String>,
    }

    #[test]
    fn always_passes() {
        let guard: Guard<Data> = Guard::Always;
        assert!(guard.check(&Data { hello: None }, &()));
    }

    #[test]
    fn predicate_reads_context() {
        let guard = Guard::new(|data: &Data, _| data.hello.is_none());

        assert!(guard.check(&Data { hello: None }, &()));
        assert!(!guard.check(
            &Data {
                hello: Some("hello".to_string())
            },
            &()
        ));
    }

    #[test]
    fn predicate_can_inspect_trigger() {
        let guard = Guard::new(|_: &Data, trigger: &dyn Any| {
            trigger.downcast_ref::<u32>().is_some_and(|n| *n > 10)
        });

        let data = Data { hello: None };
        assert!(guard.check(&data, &11u32));
        assert!(!guard.check(&data, &3u32));
        assert!(!guard.check(&data, &"eleven"));
    }

    #[test]
    fn else_never_passes_selection() {
        let guard: Guard<Data> = Guard::Else;
        assert!(guard.is_else());
        assert!(!guard.check(&Data { hello: None }, &()));
    }

    #[test]
    fn default_is_always() {
        let guard: Guard<Data> = Guard::default();
        assert!(matches!(guard, Guard::Always));
        assert_eq!(format!("{:?}", guard), "Always");
    }
}
