//! Validation rules applied to every transition of a model.

use crate::core::{Model, TransitionId, TransitionKind};
use crate::validation::violations::ModelViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of checking one rule or a whole model.
pub type Checked = Validation<(), NonEmptyVec<ModelViolation>>;

/// Check every transition, accumulating ALL violations.
pub fn validate_model<C>(model: &Model<C>) -> Checked {
    let checks: Vec<Checked> = (0..model.transition_count())
        .map(|index| check_transition(model, TransitionId(index)))
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

/// Check a single transition against its kind's structural requirements.
pub fn check_transition<C>(model: &Model<C>, id: TransitionId) -> Checked {
    let transition = model.transition(id);
    let source = model.vertex(transition.source());
    let target = model.vertex(transition.target());
    let from = source.qualified_name().to_string();
    let to = target.qualified_name().to_string();

    let mut checks: Vec<Checked> = Vec::new();

    if transition.target() == model.root() {
        checks.push(Validation::fail(ModelViolation::TargetIsRoot { from: from.clone() }));
    }

    match transition.kind() {
        TransitionKind::Internal => {
            if !source.is_state() {
                checks.push(Validation::fail(ModelViolation::InternalFromPseudoState {
                    from: from.clone(),
                }));
            }
            if transition.target() != transition.source() {
                checks.push(Validation::fail(ModelViolation::InternalTargetMismatch {
                    from: from.clone(),
                    to: to.clone(),
                }));
            }
        }
        TransitionKind::Local => {
            if !source.is_state() {
                checks.push(Validation::fail(ModelViolation::LocalFromPseudoState {
                    from: from.clone(),
                }));
            }
            if !model.is_descendant(transition.target(), transition.source()) {
                checks.push(Validation::fail(ModelViolation::LocalTargetNotDescendant {
                    from,
                    to,
                }));
            }
        }
        TransitionKind::External => {
            if transition.source() == model.root() {
                checks.push(Validation::fail(ModelViolation::ExternalFromRoot { from }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
