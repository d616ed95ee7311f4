//! Chisel: fixed-point removal of unprotected vertices.
//!
//! Starting from `S`, repeatedly keep only the vertices that are protected
//! with respect to the current set. Every round that changes anything removes
//! at least one vertex, so the loop finishes within `|S|` rounds.
//!
//! For a monotone predicate (more members never hurt) the result is the unique
//! largest subset of `S` in which every member is protected; in particular
//! chiseling a chiseled set is a no-op.

use crate::graph::{Graph, NodeSet};
use crate::threshold::Thresholds;
use log::trace;

/// Shrinks `nodes` to its largest self-protecting subset under `protected`.
///
/// `protected(graph, v, current)` must be pure: same arguments, same answer.
pub fn chisel<G, P>(graph: &G, protected: P, nodes: &NodeSet<G::Node>) -> NodeSet<G::Node>
where
    G: Graph + ?Sized,
    P: Fn(&G, G::Node, &NodeSet<G::Node>) -> bool,
{
    let mut curr = nodes.clone();
    let mut rounds = 0usize;
    loop {
        let next: NodeSet<G::Node> = curr
            .iter()
            .copied()
            .filter(|&v| protected(graph, v, &curr))
            .collect();
        rounds += 1;
        if next.len() == curr.len() {
            // next ⊆ curr, so equal sizes means equal sets.
            trace!("chisel: {} -> {} vertices in {rounds} rounds", nodes.len(), next.len());
            return next;
        }
        curr = next;
    }
}

/// [`chisel`] with an `r`-defensive protection test.
pub fn chisel_defensive<G>(graph: &G, nodes: &NodeSet<G::Node>, r: i64) -> NodeSet<G::Node>
where
    G: Graph + ?Sized,
{
    let thresholds = Thresholds::defensive(graph, r);
    chisel(graph, |g, v, s| thresholds.protects(g, v, s), nodes)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{all_nodes, AdjacencyGraph};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn set(items: &[usize]) -> NodeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn path_unravels_from_the_ends() {
        // Threshold 2 everywhere on the inside of a cycle, endpoints of a path fail first.
        let g = AdjacencyGraph::cycle(6);
        let out = chisel_defensive(&g, &set(&[0, 1, 2, 3, 4]), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn whole_cycle_is_a_fixed_point() {
        let g = AdjacencyGraph::cycle(6);
        let all = all_nodes(&g);
        assert_eq!(chisel_defensive(&g, &all, 1), all);
    }

    #[test]
    fn cascade_removes_dependent_vertices() {
        // Triangle 0-1-2 with a tail 2-3-4. With r = 0 the tail needs both neighbors.
        let g = AdjacencyGraph::from_edges(5, [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let out = chisel_defensive(&g, &set(&[0, 1, 2, 3]), 0);
        // 3 has degree 2 -> threshold 1, it keeps 2; 2 has degree 3 -> threshold 2.
        assert_eq!(out, set(&[0, 1, 2, 3]));

        let out = chisel_defensive(&g, &set(&[2, 3, 4]), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_input_stays_empty() {
        let g = AdjacencyGraph::complete(4);
        assert!(chisel_defensive(&g, &NodeSet::default(), -1).is_empty());
    }

    #[test]
    fn always_protected_keeps_everything() {
        let g = AdjacencyGraph::new(5);
        let s = set(&[1, 3]);
        assert_eq!(chisel(&g, |_, _, _| true, &s), s);
        assert!(chisel(&g, |_, _, _| false, &s).is_empty());
    }

    #[test]
    fn chisel_is_idempotent_and_shrinking_on_random_graphs() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        for trial in 0..40 {
            let g = AdjacencyGraph::new_random(&mut rng, 18, 0.25);
            let all = all_nodes(&g);
            let subset: NodeSet<usize> = all.iter().copied().filter(|v| (v + trial) % 3 != 0).collect();
            for r in -2..=1 {
                let once = chisel_defensive(&g, &subset, r);
                assert!(once.is_subset(&subset));
                assert_eq!(chisel_defensive(&g, &once, r), once);
                let table = Thresholds::defensive(&g, r);
                assert!(once.iter().all(|&v| table.protects(&g, v, &once)));
            }
        }
    }
}
