//! Structural validation of models.
//!
//! Built on stillwater's `Validation` type so that every problem in a model
//! is reported at once instead of stopping at the first one.

pub mod rules;
pub mod violations;

pub use rules::{check_transition, validate_model, Checked};
pub use violations::ModelViolation;
