//! Build errors for models and transitions.

use crate::validation::ModelViolation;
use thiserror::Error;

/// Errors that can occur while constructing a model.
///
/// Everything except [`BuildError::Invalid`] is raised eagerly by the builder
/// call that introduces the problem. `Invalid` is returned from
/// [`ModelBuilder::build`](crate::builder::ModelBuilder::build) and carries
/// every structural violation found in the finished graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Region '{region}' already has an initial or history pseudo-state")]
    DoubleInitial { region: String },

    #[error("Pseudo-state '{vertex}' already has an else transition")]
    DoubleElse { vertex: String },

    #[error("Else transitions may only leave junction or choice pseudo-states, not '{vertex}'")]
    ElseOnNonBranch { vertex: String },

    #[error("Unknown vertex {0}")]
    UnknownVertex(crate::core::VertexId),

    #[error("Unknown region {0}")]
    UnknownRegion(crate::core::RegionId),

    #[error("'{vertex}' is a pseudo-state; regions, actions and deferral require a state")]
    NotAState { vertex: String },

    #[error("Transition from '{vertex}' has no target. Call .to(target) or .internal()")]
    MissingTarget { vertex: String },

    #[error("Model failed validation with {} violation(s): {}", .0.len(), join(.0))]
    Invalid(Vec<ModelViolation>),
}

fn join(violations: &[ModelViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_violation() {
        let err = BuildError::Invalid(vec![
            ModelViolation::TargetIsRoot {
                from: "m.default.a".to_string(),
            },
            ModelViolation::InternalFromPseudoState {
                from: "m.default.j".to_string(),
            },
        ]);

        let message = err.to_string();
        assert!(message.starts_with("Model failed validation with 2 violation(s)"));
        assert!(message.contains("m.default.a"));
        assert!(message.contains("m.default.j"));
    }
}
