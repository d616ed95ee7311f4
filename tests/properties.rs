//! Property-based checks across the alliance searches.

use alliances::alliance::validate_global_minimality;
use alliances::graph::all_nodes;
use alliances::prelude::*;
use proptest::prelude::*;

/// Small undirected graphs, edges drawn from the upper triangle.
fn arb_graph() -> impl Strategy<Value = AdjacencyGraph> {
    (1usize..10)
        .prop_flat_map(|n| (Just(n), prop::collection::vec(any::<bool>(), n * (n - 1) / 2)))
        .prop_map(|(n, bits)| {
            let mut g = AdjacencyGraph::new(n);
            let mut idx = 0;
            for u in 0..n {
                for v in (u + 1)..n {
                    if bits[idx] {
                        g.add_edge(u, v);
                    }
                    idx += 1;
                }
            }
            g
        })
}

fn subset(g: &AdjacencyGraph, mask: u16) -> NodeSet<usize> {
    g.nodes().filter(|v| mask & (1 << v) != 0).collect()
}

fn is_connected(g: &AdjacencyGraph, s: &NodeSet<usize>) -> bool {
    let Some(&start) = s.iter().next() else {
        return true;
    };
    let mut seen: NodeSet<usize> = [start].into_iter().collect();
    let mut todo = vec![start];
    while let Some(v) = todo.pop() {
        for w in g.neighbors(v) {
            if s.contains(&w) && seen.insert(w) {
                todo.push(w);
            }
        }
    }
    seen.len() == s.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn defensive_check_matches_doubled_inequality(g in arb_graph(), mask in any::<u16>(), r in -3i64..=3) {
        let s = subset(&g, mask);
        let expected = !s.is_empty()
            && s.iter().all(|&v| {
                let inside = g.neighbors(v).filter(|w| s.contains(w)).count() as i64;
                2 * inside >= g.degree(v) as i64 + r
            });
        prop_assert_eq!(is_defensive_alliance(&g, &s, r), expected);
    }

    #[test]
    fn chisel_shrinks_to_a_protected_fixed_point(g in arb_graph(), mask in any::<u16>(), r in -2i64..=2) {
        let s = subset(&g, mask);
        let once = chisel_defensive(&g, &s, r);
        prop_assert!(once.is_subset(&s));
        prop_assert_eq!(chisel_defensive(&g, &once, r), once.clone());
        let table = Thresholds::defensive(&g, r);
        prop_assert!(once.iter().all(|&v| table.protects(&g, v, &once)));
    }

    #[test]
    fn minimal_search_returns_globally_minimal_sets(g in arb_graph(), r in -2i64..=1, seed in any::<u64>()) {
        match find_gmda(&g, r, &MinimalSearchConfig::seeded(seed)) {
            Some(found) => {
                prop_assert!(validate_global_minimality(&g, found.vertices(), r).is_ok());
            }
            None => prop_assert!(chisel_defensive(&g, &all_nodes(&g), r).is_empty()),
        }
    }

    #[test]
    fn bounded_search_respects_budget_and_connectivity(g in arb_graph(), k in 0usize..5, r in -1i64..=1) {
        if let Some(found) = defensive_alliance(&g, k, r, None) {
            prop_assert!(found.len() <= k);
            prop_assert!(is_defensive_alliance(&g, found.vertices(), r));
            prop_assert!(is_connected(&g, found.vertices()));
        }
    }

    #[test]
    fn parallel_and_sequential_agree_on_existence(g in arb_graph(), k in 0usize..5, r in -1i64..=1) {
        let cfg = ParallelSearchConfig::with_workers(2);
        let seq = defensive_alliance(&g, k, r, None);
        let par = defensive_alliance_parallel(&g, k, r, &[], &cfg).unwrap();
        prop_assert_eq!(seq.is_some(), par.is_some());
        if let Some(found) = par {
            prop_assert!(found.len() <= k);
            prop_assert!(is_connected(&g, found.vertices()));
        }
    }
}
