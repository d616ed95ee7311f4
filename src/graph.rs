//! Read-only graph contract used by every search, plus a small adjacency-list
//! graph for gadgets, tests, and random instances.

use rand::Rng;
use rustc_hash::FxHashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::io::{self, Write};
use thiserror::Error;

/// An unordered set of vertices. Equality is set equality.
pub type NodeSet<N> = FxHashSet<N>;

// ============================================================================
// Graph contract
// ============================================================================

/// Immutable graph queried by the alliance core.
///
/// The core only ever reads through this trait; implementations are free to
/// back it with whatever storage they like.
pub trait Graph {
    /// Opaque vertex identifier. Only equality and hashing are relied upon.
    type Node: Copy + Eq + Hash + Debug;

    /// Enumerates every vertex once.
    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_;

    /// Returns whether the edge `{a, b}` exists.
    fn has_edge(&self, a: Self::Node, b: Self::Node) -> bool;

    /// Enumerates the neighbors of `v`.
    fn neighbors(&self, v: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Returns `|neighbors(v)|`.
    fn degree(&self, v: Self::Node) -> usize {
        self.neighbors(v).count()
    }

    /// Returns the number of vertices.
    fn node_count(&self) -> usize {
        self.nodes().count()
    }
}

/// Collects every vertex of `graph` into a fresh [`NodeSet`].
pub fn all_nodes<G: Graph + ?Sized>(graph: &G) -> NodeSet<G::Node> {
    graph.nodes().collect()
}

/// Returns `N(S) \ S`: vertices adjacent to some member of `set` but outside it.
pub fn open_neighborhood<G, I>(graph: &G, set: I) -> NodeSet<G::Node>
where
    G: Graph + ?Sized,
    I: IntoIterator<Item = G::Node> + Clone,
{
    let members: NodeSet<G::Node> = set.clone().into_iter().collect();
    let mut out = NodeSet::default();
    for v in set {
        out.extend(graph.neighbors(v).filter(|w| !members.contains(w)));
    }
    out
}

// ============================================================================
// AdjacencyGraph
// ============================================================================

/// Simple undirected graph on vertices `0..n`.
///
/// Neighbor lists are kept sorted and deduplicated so `has_edge` is a binary
/// search. Edges are only added while building; once handed to a search the
/// graph is used through `&self` only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    adj: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Creates a graph with `n` isolated vertices.
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![Vec::new(); n],
        }
    }

    /// Creates a graph on `n` vertices from an edge list.
    ///
    /// # Panics
    /// Panics if an endpoint is `>= n`.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::new(n);
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Complete graph `K_n`.
    pub fn complete(n: usize) -> Self {
        let adj = (0..n)
            .map(|v| (0..n).filter(|&w| w != v).collect())
            .collect();
        Self { adj }
    }

    /// Cycle `C_n` (`0 - 1 - ... - (n-1) - 0`). For `n < 3` this is a path.
    pub fn cycle(n: usize) -> Self {
        let mut g = Self::path(n);
        if n >= 3 {
            g.add_edge(n - 1, 0);
        }
        g
    }

    /// Path `P_n` (`0 - 1 - ... - (n-1)`).
    pub fn path(n: usize) -> Self {
        Self::from_edges(n, (1..n).map(|v| (v - 1, v)))
    }

    /// Erdős–Rényi `G(n, p)`: every pair is an edge independently with probability `p`.
    pub fn new_random<R: Rng>(rng: &mut R, n: usize, p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let p = p.clamp(0.0, 1.0);
        let mut g = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(p) {
                    g.add_edge(i, j);
                }
            }
        }
        g
    }

    /// Adds the undirected edge `{u, v}`. Self-loops and duplicates are ignored.
    ///
    /// # Panics
    /// Panics if `u` or `v` is out of range.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        assert!(
            u < self.adj.len() && v < self.adj.len(),
            "edge ({u}, {v}) out of range for {} vertices",
            self.adj.len()
        );
        if u == v {
            return;
        }
        insert_sorted(&mut self.adj[u], v);
        insert_sorted(&mut self.adj[v], u);
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns the sorted neighbor list of `v`.
    #[inline]
    pub fn neighbor_slice(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// Writes the adjacency matrix as `n` lines of `0/1` characters.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        let n = self.adj.len();
        for row in &self.adj {
            let mut line = vec![b'0'; n];
            for &j in row {
                line[j] = b'1';
            }
            w.write_all(&line)?;
            writeln!(w)?;
        }
        Ok(())
    }
}

#[inline]
fn insert_sorted(list: &mut Vec<usize>, v: usize) {
    if let Err(pos) = list.binary_search(&v) {
        list.insert(pos, v);
    }
}

impl Graph for AdjacencyGraph {
    type Node = usize;

    fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        0..self.adj.len()
    }

    #[inline]
    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adj
            .get(a)
            .is_some_and(|row| row.binary_search(&b).is_ok())
    }

    fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj.get(v).into_iter().flatten().copied()
    }

    #[inline]
    fn degree(&self, v: usize) -> usize {
        self.adj.get(v).map_or(0, Vec::len)
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.adj.len()
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Errors encountered while parsing an adjacency matrix.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphParseError {
    /// No non-empty rows were found.
    #[error("adjacency matrix is empty")]
    Empty,
    /// Matrix is not square.
    #[error("adjacency matrix is not square: row {row} has length {got}, expected {expected}")]
    NonSquare {
        /// The row index with wrong length.
        row: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Encountered a non `0/1` character.
    #[error("invalid character at ({row}, {col}): {ch:?} (expected '0' or '1')")]
    InvalidChar {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The invalid character.
        ch: char,
    },
    /// Diagonal contains a `1`.
    #[error("self-loop detected at vertex {vertex}")]
    SelfLoop {
        /// The vertex with a self-loop.
        vertex: usize,
    },
    /// `A[i][j] != A[j][i]`.
    #[error("matrix is not symmetric at ({i},{j})")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },
}

/// Parses a `0/1` adjacency matrix from text.
///
/// Rules:
/// - Blank lines are ignored, surrounding whitespace is trimmed.
/// - The matrix must be square, symmetric, and have a zero diagonal.
///
/// # Errors
/// Returns an error if the input is empty, non-square, contains invalid characters,
/// has self-loops, or is not symmetric.
pub fn parse_adjacency_matrix(text: &str) -> Result<AdjacencyGraph, GraphParseError> {
    let lines: Vec<&[u8]> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::as_bytes)
        .collect();

    if lines.is_empty() {
        return Err(GraphParseError::Empty);
    }
    let n = lines.len();

    for (i, row) in lines.iter().enumerate() {
        if row.len() != n {
            return Err(GraphParseError::NonSquare {
                row: i,
                expected: n,
                got: row.len(),
            });
        }
        for (j, &b) in row.iter().enumerate() {
            if b != b'0' && b != b'1' {
                return Err(GraphParseError::InvalidChar {
                    row: i,
                    col: j,
                    ch: b as char,
                });
            }
        }
        if row[i] == b'1' {
            return Err(GraphParseError::SelfLoop { vertex: i });
        }
    }

    let mut g = AdjacencyGraph::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if lines[i][j] != lines[j][i] {
                return Err(GraphParseError::NotSymmetric { i, j });
            }
            if lines[i][j] == b'1' {
                g.add_edge(i, j);
            }
        }
    }
    Ok(g)
}

// ============================================================================
// Tests
// ============================================================================
