//! Work-queue variant of the bounded search.
//!
//! Partial candidates (member lists in insertion order) live on a shared
//! lock-free queue. Each worker pops an item, records it if it satisfies the
//! solution predicate, and otherwise pushes its one-vertex extensions. The
//! first recorded solution wins: the `found` flag is set with a
//! compare-exchange, so exactly one worker writes the solution slot.
//!
//! After `found` is raised, or the caller's stop flag is set, workers keep
//! popping but discard what they pop. The call returns once every enqueued
//! item has been consumed, tracked by an outstanding-item counter that is
//! incremented before each push and decremented after each item is handled.
//!
//! Exploration order differs from the sequential search, so when several
//! solutions exist the two may return different ones. Whether *some* solution
//! exists is the same for both.

use crate::alliance::{is_threshold_alliance, Alliance};
use crate::bounded::root_candidates;
use crate::graph::{open_neighborhood, Graph, NodeSet};
use crate::threshold::Thresholds;
use crate::vertex_set::VertexSet;
use crossbeam::queue::SegQueue;
use crossbeam::utils::Backoff;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// How long an idle worker sleeps once spinning and yielding gave nothing.
const IDLE_PARK: Duration = Duration::from_micros(200);

// ============================================================================
// Configuration
// ============================================================================

/// Options for [`parallel_bounded_search`].
#[derive(Clone, Debug)]
pub struct ParallelSearchConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// External interrupt. Once set, workers drain the queue without
    /// expanding, and the search returns whatever has been recorded.
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for ParallelSearchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);
        Self { workers, stop: None }
    }
}

impl ParallelSearchConfig {
    /// Configuration with exactly `workers` threads and no stop flag.
    pub fn with_workers(workers: usize) -> Self {
        Self { workers, stop: None }
    }
}

/// Failures that prevent the parallel search from running at all.
#[derive(Debug, Error)]
pub enum SearchError {
    /// `workers` was zero.
    #[error("parallel search needs at least one worker")]
    NoWorkers,
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// ============================================================================
// Shared state
// ============================================================================

struct SharedSearch<N> {
    queue: SegQueue<Vec<N>>,
    outstanding: AtomicUsize,
    found: AtomicBool,
    solution: Mutex<Option<Vec<N>>>,
}

impl<N> SharedSearch<N> {
    fn new() -> Self {
        Self {
            queue: SegQueue::new(),
            outstanding: AtomicUsize::new(0),
            found: AtomicBool::new(false),
            solution: Mutex::new(None),
        }
    }

    fn enqueue(&self, item: Vec<N>) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        self.queue.push(item);
    }

    /// Records `item` unless another worker got there first.
    fn record(&self, item: Vec<N>) -> bool {
        if self
            .found
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            *self.solution.lock().unwrap_or_else(PoisonError::into_inner) = Some(item);
            true
        } else {
            false
        }
    }

    fn take_solution(self) -> Option<Vec<N>> {
        self.solution.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Parallel counterpart of [`bounded_search_from`](crate::bounded::bounded_search_from).
///
/// Empty `seeds` means every vertex. Seeds are filtered by
/// `vertex_pred(graph, v, k)` and deduplicated; the empty set is tested
/// before any worker starts, and `k == 0` never enqueues anything.
pub fn parallel_bounded_search<'g, G, V, S>(
    graph: &'g G,
    seeds: &[G::Node],
    vertex_pred: V,
    solution_pred: S,
    k: usize,
    cfg: &ParallelSearchConfig,
) -> Result<Option<VertexSet<'g, G>>, SearchError>
where
    G: Graph + Sync + ?Sized,
    G::Node: Send,
    V: Fn(&G, G::Node, usize) -> bool + Sync,
    S: Fn(&G, &NodeSet<G::Node>) -> bool + Sync,
{
    if cfg.workers == 0 {
        return Err(SearchError::NoWorkers);
    }

    let empty = NodeSet::default();
    if solution_pred(graph, &empty) {
        return Ok(Some(VertexSet::new(graph, empty)));
    }
    if k == 0 {
        return Ok(None);
    }

    let all: Vec<G::Node>;
    let seeds: &[G::Node] = if seeds.is_empty() {
        all = graph.nodes().collect();
        &all
    } else {
        seeds
    };

    let shared = SharedSearch::new();
    for v in root_candidates(graph, seeds, &vertex_pred, k) {
        shared.enqueue(vec![v]);
    }
    debug!(
        "parallel_bounded_search: k={k}, {} seeds, {} workers",
        shared.outstanding.load(Ordering::Relaxed),
        cfg.workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .thread_name(|i| format!("alliance-worker-{i}"))
        .build()?;

    let stop = cfg.stop.as_deref();
    let processed: usize = pool.install(|| {
        (0..cfg.workers)
            .into_par_iter()
            .map(|worker_id| run_worker(worker_id, graph, &shared, &vertex_pred, &solution_pred, k, stop))
            .sum()
    });

    let found = shared.take_solution();
    debug!(
        "parallel_bounded_search: {} after {processed} items",
        if found.is_some() { "solution" } else { "no solution" }
    );
    Ok(found.map(|members| VertexSet::new(graph, members.into_iter().collect())))
}

/// Parallel counterpart of [`defensive_alliance`](crate::bounded::defensive_alliance).
///
/// Empty `seeds` means every vertex.
pub fn defensive_alliance_parallel<'g, G>(
    graph: &'g G,
    k: usize,
    r: i64,
    seeds: &[G::Node],
    cfg: &ParallelSearchConfig,
) -> Result<Option<Alliance<'g, G>>, SearchError>
where
    G: Graph + Sync + ?Sized,
    G::Node: Send + Sync,
{
    let thresholds = Thresholds::defensive(graph, r);
    let found = parallel_bounded_search(
        graph,
        seeds,
        |_: &G, v: G::Node, d: usize| thresholds.get(v).is_some_and(|t| t <= d as i64),
        |g: &G, s: &NodeSet<G::Node>| !s.is_empty() && is_threshold_alliance(g, s, &thresholds),
        k,
        cfg,
    )?;
    Ok(found.and_then(|vs| Alliance::defensive(graph, vs.into_vertices(), r).ok()))
}

// ============================================================================
// Worker
// ============================================================================

/// Returns the number of items this worker consumed.
fn run_worker<G, V, S>(
    worker_id: usize,
    graph: &G,
    shared: &SharedSearch<G::Node>,
    vertex_pred: &V,
    solution_pred: &S,
    k: usize,
    stop: Option<&AtomicBool>,
) -> usize
where
    G: Graph + ?Sized,
    V: Fn(&G, G::Node, usize) -> bool,
    S: Fn(&G, &NodeSet<G::Node>) -> bool,
{
    let backoff = Backoff::new();
    let mut consumed = 0usize;
    loop {
        match shared.queue.pop() {
            Some(item) => {
                backoff.reset();
                consumed += 1;
                let draining =
                    shared.found.load(Ordering::Acquire) || stop.is_some_and(|s| s.load(Ordering::Relaxed));
                if !draining {
                    expand(worker_id, graph, shared, vertex_pred, solution_pred, k, item);
                }
                shared.outstanding.fetch_sub(1, Ordering::AcqRel);
            }
            None if shared.outstanding.load(Ordering::Acquire) == 0 => break,
            // Long expansions elsewhere: stop spinning and sleep briefly.
            None if backoff.is_completed() => thread::park_timeout(IDLE_PARK),
            None => backoff.snooze(),
        }
    }
    trace!("worker {worker_id}: consumed {consumed} items");
    consumed
}

fn expand<G, V, S>(
    worker_id: usize,
    graph: &G,
    shared: &SharedSearch<G::Node>,
    vertex_pred: &V,
    solution_pred: &S,
    k: usize,
    item: Vec<G::Node>,
) where
    G: Graph + ?Sized,
    V: Fn(&G, G::Node, usize) -> bool,
    S: Fn(&G, &NodeSet<G::Node>) -> bool,
{
    let set: NodeSet<G::Node> = item.iter().copied().collect();
    if solution_pred(graph, &set) {
        if shared.record(item) {
            debug!("worker {worker_id}: recorded solution of {} vertices", set.len());
        }
        return;
    }
    if item.len() >= k {
        return;
    }
    let depth = k - item.len();
    for v in open_neighborhood(graph, set.iter().copied()) {
        if vertex_pred(graph, v, depth) {
            let mut child = Vec::with_capacity(item.len() + 1);
            child.extend_from_slice(&item);
            child.push(v);
            shared.enqueue(child);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
