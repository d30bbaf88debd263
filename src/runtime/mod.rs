//! Runtime evaluation of models.
//!
//! This module is the transition execution engine:
//! - [`Instance`]: transactional active state configuration and the public
//!   `evaluate` entry point
//! - Path resolution for external, local and internal transitions
//! - Dispatch: delegation to child regions, transition selection,
//!   completion, deferral, and junction/choice/history resolution
//! - Collaborators injected per instance: [`Logger`] and [`RandomSource`]

mod deferred;
mod dispatch;
mod environment;
mod error;
mod instance;
mod log;
pub mod path;
mod random;
mod store;

pub use deferred::{DeferredEvent, DeferredPool};
pub use environment::Environment;
pub use error::EngineError;
pub use instance::Instance;
pub use log::{Categories, LogCallback, LogId, Logger};
pub use random::{RandomSource, RoundRobin, ThreadRandom};
pub use store::ActiveConfiguration;
