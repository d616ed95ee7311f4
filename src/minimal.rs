//! Exhaustive search for minimal alliances.
//!
//! Starting from the chiseled vertex set, try removing each member in turn and
//! chisel what is left. The first removal that leaves a non-empty set becomes
//! the new current set; when no removal survives, the current set is minimal:
//! chiseling any of its `(|S|-1)`-subsets yields nothing.
//!
//! Every step strictly shrinks the current set, so there are at most `n`
//! steps, each costing `|S|` chisel runs. Descending into the first surviving
//! removal is enough: any non-empty chisel result is itself an alliance, so
//! the descent below it always bottoms out in a minimal set and never has to
//! backtrack.
//!
//! The removal order is shuffled by default so repeated runs can land on
//! different minimal alliances. Pass a seed, or turn shuffling off, to make a
//! run reproducible. Exponential-time enumeration lives in
//! [`enumerate_minimal`]; both are meant for small gadget graphs.

use crate::alliance::{convert_to_gmda, Alliance};
use crate::chisel::chisel;
use crate::graph::{all_nodes, Graph, NodeSet};
use crate::rng::seeded_rng;
use crate::threshold::Thresholds;
use crate::vertex_set::VertexSet;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;

// ============================================================================
// Configuration
// ============================================================================

/// Options for [`find_minimal`].
#[derive(Clone, Debug)]
pub struct MinimalSearchConfig {
    /// Shuffle the removal order at every step.
    pub shuffle: bool,
    /// Seed for the shuffle. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for MinimalSearchConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
        }
    }
}

impl MinimalSearchConfig {
    /// Deterministic configuration: shuffled with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            shuffle: true,
            seed: Some(seed),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Finds a minimal self-protecting vertex set of `graph`.
///
/// Returns `None` only when chiseling the whole vertex set leaves nothing,
/// i.e. no non-empty alliance exists under a monotone `protected`.
pub fn find_minimal<'g, G, P>(
    graph: &'g G,
    protected: P,
    cfg: &MinimalSearchConfig,
) -> Option<VertexSet<'g, G>>
where
    G: Graph + ?Sized,
    P: Fn(&G, G::Node, &NodeSet<G::Node>) -> bool,
{
    let mut current = chisel(graph, &protected, &all_nodes(graph));
    if current.is_empty() {
        debug!("find_minimal: graph has no non-empty alliance");
        return None;
    }

    let mut rng = seeded_rng(cfg.seed);
    let mut order = Vec::with_capacity(current.len());
    let mut depth = 0usize;

    loop {
        order.clear();
        order.extend(current.iter().copied());
        if cfg.shuffle {
            order.shuffle(&mut rng);
        }

        let mut rest = current.clone();
        let mut next = None;
        for &removed in &order {
            rest.remove(&removed);
            let survivor = chisel(graph, &protected, &rest);
            rest.insert(removed);
            if !survivor.is_empty() {
                next = Some(survivor);
                break;
            }
        }

        match next {
            Some(smaller) => {
                depth += 1;
                trace!("find_minimal: step {depth}: {} -> {} vertices", current.len(), smaller.len());
                current = smaller;
            }
            None => {
                debug!("find_minimal: minimal set of {} vertices after {depth} steps", current.len());
                return Some(VertexSet::new(graph, current));
            }
        }
    }
}

/// Finds a globally minimal `r`-defensive alliance.
pub fn find_gmda<'g, G>(graph: &'g G, r: i64, cfg: &MinimalSearchConfig) -> Option<Alliance<'g, G>>
where
    G: Graph + ?Sized,
{
    let thresholds = Thresholds::defensive(graph, r);
    let found = find_minimal(graph, |g, v, s| thresholds.protects(g, v, s), cfg)?;
    convert_to_gmda(found, r).ok()
}

/// Enumerates the minimal sets reachable from the chiseled vertex set by
/// repeated single removals followed by chisel.
///
/// The search is breadth-first over distinct sets and stops expanding once
/// `limit` distinct sets have been visited, so the result may be partial on
/// large graphs. Results are sorted by size, then by members.
pub fn enumerate_minimal<'g, G, P>(graph: &'g G, protected: P, limit: usize) -> Vec<VertexSet<'g, G>>
where
    G: Graph + ?Sized,
    G::Node: Ord,
    P: Fn(&G, G::Node, &NodeSet<G::Node>) -> bool,
{
    let root = chisel(graph, &protected, &all_nodes(graph));
    if root.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut visited: FxHashSet<Vec<G::Node>> = FxHashSet::default();
    let mut minimal: Vec<Vec<G::Node>> = Vec::new();
    let mut frontier = vec![root];
    visited.insert(canonical(&frontier[0]));

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for set in frontier {
            let mut rest = set.clone();
            let mut reducible = false;
            for &removed in &set {
                rest.remove(&removed);
                let survivor = chisel(graph, &protected, &rest);
                rest.insert(removed);
                if survivor.is_empty() {
                    continue;
                }
                reducible = true;
                if visited.len() < limit && visited.insert(canonical(&survivor)) {
                    next_frontier.push(survivor);
                }
            }
            if !reducible {
                minimal.push(canonical(&set));
            }
        }
        frontier = next_frontier;
    }

    if visited.len() >= limit {
        debug!("enumerate_minimal: visit limit {limit} reached, result may be partial");
    }
    minimal.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    debug!("enumerate_minimal: {} minimal sets from {} visited", minimal.len(), visited.len());
    minimal
        .into_iter()
        .map(|members| VertexSet::new(graph, members.into_iter().collect()))
        .collect()
}

fn canonical<N: Copy + Ord>(set: &NodeSet<N>) -> Vec<N> {
    let mut key: Vec<N> = set.iter().copied().collect();
    key.sort_unstable();
    key
}

// ============================================================================
// Tests
// ============================================================================
