//! Fixed-parameter search for connected alliances of at most `k` vertices.
//!
//! The search grows a candidate set one vertex at a time. The first vertex
//! comes from the root seeds; every later vertex is a neighbor of the current
//! set, so whatever is found is connected. A vertex predicate
//! `vertex_pred(graph, v, d)` prunes vertices that cannot be satisfied with
//! `d` additions left. For defensive alliances that is `threshold(v) <= d`,
//! which bounds the branching factor and keeps the search polynomial for
//! fixed `k`.
//!
//! Traversal is depth-first on an explicit stack, so depth never touches the
//! native call stack. All candidates of a node are tried, in order, before the
//! search gives up on it.

use crate::alliance::{is_threshold_alliance, Alliance};
use crate::graph::{open_neighborhood, Graph, NodeSet};
use crate::threshold::Thresholds;
use crate::vertex_set::VertexSet;
use log::{debug, trace};
use rustc_hash::FxHashSet;

/// A partial candidate on the search stack.
struct Frame<N> {
    set: NodeSet<N>,
    /// Additions still allowed below this frame.
    depth: usize,
}

/// Searches every vertex of `graph` as a possible root.
///
/// See [`bounded_search_from`].
pub fn bounded_search<'g, G, V, S>(
    graph: &'g G,
    vertex_pred: V,
    solution_pred: S,
    k: usize,
) -> Option<VertexSet<'g, G>>
where
    G: Graph + ?Sized,
    V: Fn(&G, G::Node, usize) -> bool,
    S: Fn(&G, &NodeSet<G::Node>) -> bool,
{
    bounded_search_from(graph, &[], vertex_pred, solution_pred, k)
}

/// Finds a connected set `S` with `|S| <= k` and `solution_pred(graph, S)`.
///
/// The empty set is tested first. Roots are the `seeds` passing
/// `vertex_pred(graph, v, k)`; duplicates are ignored and empty `seeds`
/// means every vertex. Returns the first
/// solution in depth-first order, or `None` once the budget is exhausted on
/// every branch.
pub fn bounded_search_from<'g, G, V, S>(
    graph: &'g G,
    seeds: &[G::Node],
    vertex_pred: V,
    solution_pred: S,
    k: usize,
) -> Option<VertexSet<'g, G>>
where
    G: Graph + ?Sized,
    V: Fn(&G, G::Node, usize) -> bool,
    S: Fn(&G, &NodeSet<G::Node>) -> bool,
{
    let all: Vec<G::Node>;
    let seeds: &[G::Node] = if seeds.is_empty() {
        all = graph.nodes().collect();
        &all
    } else {
        seeds
    };
    let roots = root_candidates(graph, seeds, &vertex_pred, k);
    debug!("bounded_search: k={k}, {} root candidates", roots.len());

    let mut stack = vec![Frame {
        set: NodeSet::default(),
        depth: k,
    }];
    let mut visited = 0usize;

    while let Some(Frame { set, depth }) = stack.pop() {
        visited += 1;
        if solution_pred(graph, &set) {
            debug!("bounded_search: solution of {} vertices after {visited} nodes", set.len());
            return Some(VertexSet::new(graph, set));
        }
        if depth == 0 {
            continue;
        }

        let candidates: Vec<G::Node> = if set.is_empty() {
            roots.clone()
        } else {
            open_neighborhood(graph, set.iter().copied())
                .into_iter()
                .filter(|&v| vertex_pred(graph, v, depth))
                .collect()
        };
        trace!("bounded_search: |S|={} depth={depth} branching={}", set.len(), candidates.len());

        // Reverse so the first candidate is explored first.
        for &v in candidates.iter().rev() {
            let mut child = set.clone();
            child.insert(v);
            stack.push(Frame {
                set: child,
                depth: depth - 1,
            });
        }
    }

    debug!("bounded_search: exhausted after {visited} nodes");
    None
}

/// Seeds that pass `vertex_pred(graph, v, k)`, deduplicated, in input order.
pub(crate) fn root_candidates<G, V>(graph: &G, seeds: &[G::Node], vertex_pred: &V, k: usize) -> Vec<G::Node>
where
    G: Graph + ?Sized,
    V: Fn(&G, G::Node, usize) -> bool,
{
    let mut seen = FxHashSet::default();
    seeds
        .iter()
        .copied()
        .filter(|&v| seen.insert(v) && vertex_pred(graph, v, k))
        .collect()
}

/// Finds a connected `r`-defensive alliance with at most `k` vertices.
///
/// A vertex is only added while its threshold fits in the additions left,
/// counting itself. The pruning is conservative: an alliance of size `s`
/// whose members all have threshold `t` is only reached when `k >= s + t - 1`.
///
/// `seeds` restricts the root vertices; `None` or an empty slice means every
/// vertex.
pub fn defensive_alliance<'g, G>(
    graph: &'g G,
    k: usize,
    r: i64,
    seeds: Option<&[G::Node]>,
) -> Option<Alliance<'g, G>>
where
    G: Graph + ?Sized,
{
    let thresholds = Thresholds::defensive(graph, r);
    let vertex_pred = |_: &G, v: G::Node, d: usize| thresholds.get(v).is_some_and(|t| t <= d as i64);
    let solution_pred = |g: &G, s: &NodeSet<G::Node>| !s.is_empty() && is_threshold_alliance(g, s, &thresholds);
    let found = match seeds {
        Some(seeds) => bounded_search_from(graph, seeds, vertex_pred, solution_pred, k),
        None => bounded_search(graph, vertex_pred, solution_pred, k),
    }?;
    Alliance::defensive(graph, found.into_vertices(), r).ok()
}

// ============================================================================
// Tests
// ============================================================================
