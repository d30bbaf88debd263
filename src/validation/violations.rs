//! Structural violations found when a model is built.

use thiserror::Error;

/// A transition that cannot be executed as declared.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelViolation {
    #[error("Internal transition from '{from}' must originate at a state")]
    InternalFromPseudoState { from: String },

    #[error("Internal transition from '{from}' must target its source, not '{to}'")]
    InternalTargetMismatch { from: String, to: String },

    #[error("Local transition from '{from}' must originate at a state")]
    LocalFromPseudoState { from: String },

    #[error("Local transition target '{to}' is not a descendant of '{from}'")]
    LocalTargetNotDescendant { from: String, to: String },

    #[error("Transition from '{from}' targets the root state")]
    TargetIsRoot { from: String },

    #[error("External transition leaves the root state '{from}'")]
    ExternalFromRoot { from: String },
}
