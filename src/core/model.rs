//! The immutable model graph.

use super::element::{Element, RegionId, TransitionId, VertexId};
use super::region::Region;
use super::transition::Transition;
use super::vertex::Vertex;
use std::fmt;

/// A complete state machine definition.
///
/// Models are produced by [`ModelBuilder`](crate::builder::ModelBuilder) and are
/// never mutated afterwards. Any number of
/// [`Instance`](crate::runtime::Instance)s may share one model, typically
/// through an `Arc`.
pub struct Model<C> {
    pub(crate) name: String,
    pub(crate) root: VertexId,
    pub(crate) regions: Vec<Region>,
    pub(crate) vertices: Vec<Vertex<C>>,
    pub(crate) transitions: Vec<Transition<C>>,
}

impl<C> Model<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root state; the only vertex without a parent region.
    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex<C> {
        &self.vertices[id.0]
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    pub fn transition(&self, id: TransitionId) -> &Transition<C> {
        &self.transitions[id.0]
    }

    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex<C>> {
        self.vertices.get(id.0)
    }

    pub fn get_region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        (0..self.regions.len()).map(RegionId)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Look up a vertex by its dot-joined qualified name.
    pub fn find_vertex(&self, qualified_name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.qualified_name == qualified_name)
            .map(VertexId)
    }

    /// Look up a region by its dot-joined qualified name.
    pub fn find_region(&self, qualified_name: &str) -> Option<RegionId> {
        self.regions
            .iter()
            .position(|r| r.qualified_name == qualified_name)
            .map(RegionId)
    }

    /// The state owning the region that contains `vertex`.
    pub fn parent_state(&self, vertex: VertexId) -> Option<VertexId> {
        self.vertex(vertex).parent.map(|r| self.region(r).parent)
    }

    /// Ancestry chain from the root state down to `element`, inclusive.
    pub fn ancestry(&self, element: Element) -> Vec<Element> {
        let mut chain = Vec::new();
        let mut current = Some(element);

        while let Some(element) = current {
            chain.push(element);
            current = match element {
                Element::Region(r) => Some(Element::Vertex(self.region(r).parent)),
                Element::Vertex(v) => self.vertex(v).parent.map(Element::Region),
            };
        }

        chain.reverse();
        chain
    }

    /// True when `vertex` lies strictly below `ancestor` in the hierarchy.
    pub fn is_descendant(&self, vertex: VertexId, ancestor: VertexId) -> bool {
        let mut current = self.parent_state(vertex);
        while let Some(state) = current {
            if state == ancestor {
                return true;
            }
            current = self.parent_state(state);
        }
        false
    }

    pub(crate) fn element_name(&self, element: Element) -> &str {
        match element {
            Element::Region(r) => &self.region(r).qualified_name,
            Element::Vertex(v) => &self.vertex(v).qualified_name,
        }
    }
}

impl<C> fmt::Debug for Model<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("regions", &self.regions.len())
            .field("vertices", &self.vertices.len())
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ModelBuilder;
    use crate::core::{Element, PseudoStateKind};

    #[test]
    fn ancestry_alternates_regions_and_vertices() {
        let mut builder = ModelBuilder::<()>::new("m");
        let root = builder.root();
        let a = builder.state("a", root).unwrap();
        let b = builder.state("b", a).unwrap();
        let model = builder.build().unwrap();

        let chain = model.ancestry(Element::Vertex(b));
        assert_eq!(chain.len(), 5);
        assert_eq!(chain[0], Element::Vertex(model.root()));
        assert_eq!(chain[2], Element::Vertex(a));
        assert_eq!(chain[4], Element::Vertex(b));
        assert!(matches!(chain[1], Element::Region(_)));
        assert!(matches!(chain[3], Element::Region(_)));
    }

    #[test]
    fn qualified_names_join_ancestry() {
        let mut builder = ModelBuilder::<()>::new("m");
        let root = builder.root();
        let a = builder.state("a", root).unwrap();
        let region = builder.region("inner", a).unwrap();
        let b = builder.state("b", region).unwrap();
        let model = builder.build().unwrap();

        assert_eq!(model.vertex(a).qualified_name(), "m.default.a");
        assert_eq!(model.vertex(b).qualified_name(), "m.default.a.inner.b");
        assert_eq!(model.find_vertex("m.default.a.inner.b"), Some(b));
        assert_eq!(model.find_region("m.default.a.inner"), Some(region));
        assert!(model.find_vertex("m.default.zzz").is_none());
    }

    #[test]
    fn descendant_checks_follow_parents() {
        let mut builder = ModelBuilder::<()>::new("m");
        let root = builder.root();
        let a = builder.state("a", root).unwrap();
        let b = builder.state("b", a).unwrap();
        let c = builder.state("c", root).unwrap();
        let model = builder.build().unwrap();

        assert!(model.is_descendant(b, a));
        assert!(model.is_descendant(b, root));
        assert!(!model.is_descendant(a, b));
        assert!(!model.is_descendant(b, c));
        assert!(!model.is_descendant(a, a));
    }

    #[test]
    fn region_starting_vertex_is_recorded() {
        let mut builder = ModelBuilder::<()>::new("m");
        let root = builder.root();
        let initial = builder
            .pseudo_state("initial", root, PseudoStateKind::Initial)
            .unwrap();
        let model = builder.build().unwrap();

        let region = model.vertex(model.root()).regions()[0];
        assert_eq!(model.region(region).starting(), Some(initial));
        assert_eq!(model.parent_state(initial), Some(model.root()));
    }
}
