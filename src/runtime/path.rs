//! Static entry/exit path computation for external transitions.
//!
//! Local transitions depend on the live configuration and are resolved by
//! the dispatcher at traversal time; internal transitions have no path.

use crate::core::{Element, Model, VertexId};

/// Elements an external transition exits and enters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    /// Top-most element to exit; its active descendants are exited first.
    pub exit: Element,
    /// Elements to enter, outermost first.
    pub enter: Vec<Element>,
}

/// Index of the lowest common ancestor of two ancestry chains.
///
/// `m` is the first index at which the chains differ. When neither chain is
/// a prefix of the other, `m - 1` is the deepest shared element. When one is
/// a prefix of the other (self transitions, or source and target in direct
/// lineage) the last element of the shorter chain must itself be exited and
/// re-entered, so the LCA moves up one more level to `m - 2`, which is the
/// region containing that element.
///
/// Both chains start at the root and contain at least one element below it,
/// so `m >= 1` and the prefix case has `m >= 2`.
pub fn lca(source: &[Element], target: &[Element]) -> usize {
    let max = source.len().min(target.len());
    let mut m = 0;
    while m < max && source[m] == target[m] {
        m += 1;
    }
    if m == max {
        m - 2
    } else {
        m - 1
    }
}

/// Resolve the exit and entry elements of an external transition.
pub fn resolve_external<C>(model: &Model<C>, source: VertexId, target: VertexId) -> Path {
    let source_chain = model.ancestry(Element::Vertex(source));
    let target_chain = model.ancestry(Element::Vertex(target));
    let common = lca(&source_chain, &target_chain);
    let enter = replace_history(model, target, target_chain[common + 1..].to_vec());

    Path {
        exit: source_chain[common + 1],
        enter,
    }
}

/// Elements from `from` down to `target`, both inclusive, outermost first.
pub fn descend<C>(model: &Model<C>, from: VertexId, target: VertexId) -> Vec<Element> {
    let chain = model.ancestry(Element::Vertex(target));
    let start = chain
        .iter()
        .position(|e| *e == Element::Vertex(from))
        .unwrap_or(chain.len() - 1);

    replace_history(model, target, chain[start..].to_vec())
}

/// A history target is never entered directly: its region is entered
/// instead and resolves the real destination from the recorded state.
fn replace_history<C>(model: &Model<C>, target: VertexId, mut enter: Vec<Element>) -> Vec<Element> {
    let vertex = model.vertex(target);
    if let (true, Some(region)) = (vertex.is_history(), vertex.parent()) {
        enter.pop();
        if enter.is_empty() {
            enter.push(Element::Region(region));
        }
    }
    enter
}
