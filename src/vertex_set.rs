//! Vertex sets tied to a graph, optionally validated by a per-vertex constraint.

use crate::graph::{Graph, NodeSet};
use std::fmt;
use thiserror::Error;

/// A member failed the constraint checked at construction.
///
/// `vertex` is the first violating member encountered; which one that is
/// depends on set iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("constraint violated at vertex {vertex:?}")]
pub struct ConstraintViolation<N: fmt::Debug> {
    /// A member that does not satisfy the constraint.
    pub vertex: N,
}

/// A set of vertices of a shared, read-only graph. Immutable once built.
pub struct VertexSet<'g, G: Graph + ?Sized> {
    graph: &'g G,
    vertices: NodeSet<G::Node>,
}

impl<'g, G: Graph + ?Sized> VertexSet<'g, G> {
    /// Wraps `vertices` without any validation.
    pub fn new(graph: &'g G, vertices: NodeSet<G::Node>) -> Self {
        Self { graph, vertices }
    }

    /// Builds a set whose members all satisfy `constraint(graph, vertex, members)`.
    ///
    /// This is the only place the constraint is evaluated; the returned set is
    /// never re-checked.
    ///
    /// # Errors
    /// Returns [`ConstraintViolation`] naming a member that fails.
    pub fn constrained<C>(
        graph: &'g G,
        vertices: NodeSet<G::Node>,
        constraint: C,
    ) -> Result<Self, ConstraintViolation<G::Node>>
    where
        C: Fn(&G, G::Node, &NodeSet<G::Node>) -> bool,
    {
        if let Some(&vertex) = vertices.iter().find(|&&v| !constraint(graph, v, &vertices)) {
            return Err(ConstraintViolation { vertex });
        }
        Ok(Self { graph, vertices })
    }

    /// The graph this set belongs to.
    #[inline]
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// The member vertices.
    #[inline]
    pub fn vertices(&self) -> &NodeSet<G::Node> {
        &self.vertices
    }

    /// Consumes the set and returns its members.
    pub fn into_vertices(self) -> NodeSet<G::Node> {
        self.vertices
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns whether `v` is a member.
    #[inline]
    pub fn contains(&self, v: G::Node) -> bool {
        self.vertices.contains(&v)
    }
}

impl<G: Graph + ?Sized> Clone for VertexSet<'_, G> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            vertices: self.vertices.clone(),
        }
    }
}

impl<G: Graph + ?Sized> fmt::Debug for VertexSet<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexSet")
            .field("vertices", &self.vertices)
            .finish_non_exhaustive()
    }
}

impl<G: Graph + ?Sized> fmt::Display for VertexSet<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.vertices.iter()).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;

    fn set(items: &[usize]) -> NodeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn unconstrained_set_exposes_graph_and_members() {
        let g = AdjacencyGraph::path(4);
        let vs = VertexSet::new(&g, set(&[0, 2]));
        assert!(std::ptr::eq(vs.graph(), &g));
        assert_eq!(vs.len(), 2);
        assert!(vs.contains(2));
        assert!(!vs.contains(1));
        assert_eq!(VertexSet::new(&g, set(&[3])).to_string(), "{3}");
    }

    fn has_member_neighbor(g: &AdjacencyGraph, v: usize, s: &NodeSet<usize>) -> bool {
        g.neighbors(v).any(|w| s.contains(&w))
    }

    #[test]
    fn constrained_accepts_when_every_member_passes() {
        let g = AdjacencyGraph::cycle(5);
        let vs = VertexSet::constrained(&g, set(&[0, 1, 2]), has_member_neighbor).unwrap();
        assert_eq!(vs.into_vertices(), set(&[0, 1, 2]));
    }

    #[test]
    fn constrained_reports_violating_vertex() {
        let g = AdjacencyGraph::cycle(5);
        let err = VertexSet::constrained(&g, set(&[0, 1, 3]), has_member_neighbor).unwrap_err();
        assert_eq!(err, ConstraintViolation { vertex: 3 });
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn empty_set_satisfies_any_constraint() {
        let g = AdjacencyGraph::new(3);
        let vs = VertexSet::constrained(&g, NodeSet::default(), |_, _, _| false);
        assert!(vs.unwrap().is_empty());
    }
}
