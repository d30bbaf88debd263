//! Statechart: a hierarchical state machine execution engine
//!
//! Models are graphs of regions, states and pseudo-states connected by
//! transitions. An [`Instance`] holds the active state configuration of one
//! running machine and evaluates triggers against a shared [`Model`].
//!
//! # Core Concepts
//!
//! - **Model**: immutable region/vertex/transition graph built with [`ModelBuilder`]
//! - **Instance**: transactional active state configuration; a failed evaluation
//!   leaves the committed configuration untouched
//! - **Pseudo-states**: initial, shallow and deep history, junction (static
//!   branch) and choice (dynamic branch)
//! - **Deferral**: states can defer triggers, which are replayed once a
//!   configuration that does not defer them becomes active
//! - **Snapshots**: serializable last-known-state tree for checkpoint and restore
//!
//! # Example
//!
//! ```rust
//! use statechart::{Instance, ModelBuilder, PseudoStateKind, TransitionBuilder};
//! use std::sync::Arc;
//!
//! struct Coin;
//! struct Push;
//!
//! let mut builder = ModelBuilder::<u32>::new("turnstile");
//! let root = builder.root();
//! let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial).unwrap();
//! let locked = builder.state("locked", root).unwrap();
//! let unlocked = builder.state("unlocked", root).unwrap();
//!
//! builder.add_transition(TransitionBuilder::new(initial).to(locked)).unwrap();
//! builder
//!     .add_transition(
//!         TransitionBuilder::new(locked)
//!             .to(unlocked)
//!             .on::<Coin>()
//!             .effect(|coins: &mut u32, _| *coins += 1),
//!     )
//!     .unwrap();
//! builder.add_transition(TransitionBuilder::new(unlocked).to(locked).on::<Push>()).unwrap();
//!
//! let model = Arc::new(builder.build().unwrap());
//! let mut turnstile = Instance::new(Arc::clone(&model), 0).unwrap();
//!
//! assert!(turnstile.evaluate(Coin).unwrap());
//! assert!(turnstile.is_in(unlocked));
//! assert!(turnstile.evaluate(Push).unwrap());
//! assert!(turnstile.is_in(locked));
//! assert_eq!(*turnstile.context(), 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod runtime;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, ModelBuilder, TransitionBuilder};
pub use checkpoint::{CheckpointError, Snapshot};
pub use core::{Guard, Model, PseudoStateKind, RegionId, TransitionKind, VertexId};
pub use runtime::{Categories, EngineError, Environment, Instance, Logger, RandomSource};
pub use validation::ModelViolation;
