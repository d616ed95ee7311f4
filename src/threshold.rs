//! Neighbor counting and per-vertex thresholds.
//!
//! Thresholds depend only on the static graph, so searches build a
//! [`Thresholds`] table once per invocation and share it read-only.

use crate::graph::{Graph, NodeSet};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Returns the members of `set` adjacent to `v` (never `v` itself).
pub fn neighbours_in_set<G: Graph + ?Sized>(
    graph: &G,
    v: G::Node,
    set: &NodeSet<G::Node>,
) -> NodeSet<G::Node> {
    set.iter()
        .copied()
        .filter(|&w| w != v && graph.has_edge(v, w))
        .collect()
}

/// Returns `|N(v) ∩ set|`, not counting `v` itself.
pub fn neighbours_in_set_count<G: Graph + ?Sized>(
    graph: &G,
    v: G::Node,
    set: &NodeSet<G::Node>,
) -> usize {
    // Iterate whichever side is smaller.
    if graph.degree(v) <= set.len() {
        graph
            .neighbors(v)
            .filter(|w| *w != v && set.contains(w))
            .count()
    } else {
        set.iter()
            .filter(|&&w| w != v && graph.has_edge(v, w))
            .count()
    }
}

/// `ceil(x / 2)` for any sign of `x`.
#[inline]
const fn ceil_half(x: i64) -> i64 {
    x.div_euclid(2) + x.rem_euclid(2)
}

/// Threshold of `v` in an `r`-defensive alliance: `ceil((deg(v) + r) / 2)`.
///
/// `r = -1` is the standard defensive alliance. The result may be zero or
/// negative, in which case `v` is protected by any set containing it.
#[inline]
pub fn defensive_alliance_threshold<G: Graph + ?Sized>(graph: &G, v: G::Node, r: i64) -> i64 {
    ceil_half(graph.degree(v) as i64 + r)
}

/// Returns whether `v` has at least its `r`-defensive threshold of neighbors in `set`.
///
/// Recomputes the degree on every call; prefer [`Thresholds::protects`] in loops.
pub fn da_is_protected<G: Graph + ?Sized>(
    graph: &G,
    v: G::Node,
    set: &NodeSet<G::Node>,
    r: i64,
) -> bool {
    neighbours_in_set_count(graph, v, set) as i64 >= defensive_alliance_threshold(graph, v, r)
}

/// Per-vertex threshold table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Thresholds<N: Eq + Hash> {
    values: FxHashMap<N, i64>,
}

impl<N: Copy + Eq + Hash> Thresholds<N> {
    /// Uses an externally supplied mapping.
    pub fn from_map(values: FxHashMap<N, i64>) -> Self {
        Self { values }
    }

    /// Computes `r`-defensive thresholds for every vertex of `graph`.
    pub fn defensive<G>(graph: &G, r: i64) -> Self
    where
        G: Graph<Node = N> + ?Sized,
    {
        let values = graph
            .nodes()
            .map(|v| (v, defensive_alliance_threshold(graph, v, r)))
            .collect();
        Self { values }
    }

    /// Threshold of `v`, if the table knows it.
    #[inline]
    pub fn get(&self, v: N) -> Option<i64> {
        self.values.get(&v).copied()
    }

    /// Returns whether `v` meets its threshold with respect to `set`.
    ///
    /// Vertices missing from the table are never protected.
    #[inline]
    pub fn protects<G>(&self, graph: &G, v: N, set: &NodeSet<N>) -> bool
    where
        G: Graph<Node = N> + ?Sized,
    {
        self.get(v)
            .is_some_and(|t| neighbours_in_set_count(graph, v, set) as i64 >= t)
    }

    /// Number of vertices in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;

    /// Smallest `i` in `0..=deg` with `i >= (deg - i) + r`.
    fn iterative_threshold(deg: i64, r: i64) -> Option<i64> {
        (0..=deg).find(|&i| i >= (deg - i) + r)
    }

    fn set(items: &[usize]) -> NodeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn ceil_half_rounds_up_for_both_signs() {
        assert_eq!(ceil_half(0), 0);
        assert_eq!(ceil_half(1), 1);
        assert_eq!(ceil_half(4), 2);
        assert_eq!(ceil_half(5), 3);
        assert_eq!(ceil_half(-1), 0);
        assert_eq!(ceil_half(-2), -1);
        assert_eq!(ceil_half(-3), -1);
    }

    #[test]
    fn threshold_matches_closed_form_on_complete_graphs() {
        for n in 5..50usize {
            let g = AdjacencyGraph::complete(n);
            for r in -3..3i64 {
                let expected = ceil_half(n as i64 - 1 + r);
                for v in g.nodes() {
                    assert_eq!(defensive_alliance_threshold(&g, v, r), expected);
                }
            }
        }
    }

    #[test]
    fn threshold_agrees_with_direct_search() {
        for deg in 0..20i64 {
            for r in -3..3i64 {
                let closed = ceil_half(deg + r);
                let direct = iterative_threshold(deg, r);
                if closed > deg {
                    assert_eq!(direct, None, "deg={deg} r={r}");
                } else {
                    assert_eq!(direct, Some(closed.max(0)), "deg={deg} r={r}");
                }
            }
        }
    }

    #[test]
    fn neighbour_counts_ignore_self_and_non_members() {
        let g = AdjacencyGraph::cycle(5);
        let s = set(&[0, 1, 2, 4]);
        assert_eq!(neighbours_in_set_count(&g, 0, &s), 2);
        assert_eq!(neighbours_in_set_count(&g, 2, &s), 1);
        assert_eq!(neighbours_in_set(&g, 1, &s), set(&[0, 2]));
        assert_eq!(neighbours_in_set_count(&g, 3, &set(&[3])), 0);
    }

    #[test]
    fn neighbour_count_is_symmetric_in_strategy() {
        // Large set forces the neighbor-list walk, small set the membership walk.
        let g = AdjacencyGraph::complete(10);
        let big: NodeSet<usize> = (0..10).collect();
        let small = set(&[3, 4]);
        assert_eq!(neighbours_in_set_count(&g, 0, &big), 9);
        assert_eq!(neighbours_in_set_count(&g, 0, &small), 2);
    }

    #[test]
    fn table_protection_matches_direct_check() {
        let g = AdjacencyGraph::cycle(6);
        let table = Thresholds::defensive(&g, -1);
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(0), Some(1));
        let s = set(&[0, 1]);
        for v in g.nodes() {
            assert_eq!(table.protects(&g, v, &s), da_is_protected(&g, v, &s, -1));
        }
    }

    #[test]
    fn unknown_vertices_are_never_protected() {
        let g = AdjacencyGraph::path(3);
        let mut partial = FxHashMap::default();
        partial.insert(0usize, 0i64);
        let table = Thresholds::from_map(partial);
        assert!(table.protects(&g, 0, &set(&[0])));
        assert!(!table.protects(&g, 1, &set(&[0, 1, 2])));
    }
}
