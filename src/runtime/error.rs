//! Errors raised while evaluating a model.

use thiserror::Error;

/// Structural problems discovered during evaluation.
///
/// All of these indicate a malformed model rather than bad input. The
/// transaction in which they occur is discarded, so the committed active
/// state configuration is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("{matched} outgoing transitions from '{vertex}' matched the same trigger")]
    AmbiguousTransition { vertex: String, matched: usize },

    #[error("No outgoing transition from pseudo-state '{vertex}' matched and it has no else transition")]
    NoTransitionFound { vertex: String },

    #[error("Region '{region}' was entered but has no initial or history pseudo-state")]
    MissingStartingVertex { region: String },

    #[error("Junction chain leaving '{vertex}' exceeded {limit} transitions")]
    JunctionCycle { vertex: String, limit: usize },

    #[error("Random source returned {value} for ceiling {ceiling}")]
    RandomOutOfRange { value: usize, ceiling: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_element() {
        let err = EngineError::MissingStartingVertex {
            region: "m.default.a.default".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Region 'm.default.a.default' was entered but has no initial or history pseudo-state"
        );

        let err = EngineError::AmbiguousTransition {
            vertex: "m.default.a".to_string(),
            matched: 2,
        };
        assert!(err.to_string().starts_with("2 outgoing transitions"));
    }
}
