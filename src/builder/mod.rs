//! Builder API for constructing models.
//!
//! [`ModelBuilder`] grows the region/vertex tree and collects transitions made
//! with [`TransitionBuilder`]. The finished [`Model`](crate::core::Model) is
//! immutable and can be shared between any number of instances.

pub mod error;
pub mod model;
pub mod transition;

pub use error::BuildError;
pub use model::{ModelBuilder, Parent, DEFAULT_REGION};
pub use transition::TransitionBuilder;
