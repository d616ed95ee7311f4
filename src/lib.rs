//! # Alliances
//!
//! Threshold-defined vertex subsets ("alliances") in graphs, and the searches
//! that find them.
//!
//! A *defensive alliance* with parameter `r` is a non-empty set `S` in which
//! every member `v` has at least `ceil((deg(v) + r) / 2)` neighbors inside
//! `S`. This crate provides:
//! - A [`Graph`](graph::Graph) trait and a small adjacency-list graph.
//! - Validated vertex sets: an [`Alliance`](alliance::Alliance) can only be
//!   built from a set that satisfies its invariant.
//! - [`chisel`](chisel::chisel): the fixed point that strips unprotected
//!   vertices from a set.
//! - An exhaustive search for globally minimal alliances.
//! - A fixed-parameter search for connected alliances of bounded size, and a
//!   parallel work-queue variant of it.
//! - A cost-reduction local search for larger graphs.
//!
//! ## Quick Start
//!
//! ```
//! use alliances::prelude::*;
//!
//! // Every edge of a 5-cycle is a globally minimal defensive alliance (r = -1).
//! let g = AdjacencyGraph::cycle(5);
//! let found = find_gmda(&g, -1, &MinimalSearchConfig::seeded(7)).expect("C5 has alliances");
//! assert_eq!(found.len(), 2);
//! assert_eq!(found.kind(), AllianceKind::GloballyMinimal { r: -1 });
//! ```
//!
//! ## Validating Candidate Sets
//!
//! ```
//! use alliances::prelude::*;
//!
//! let g = AdjacencyGraph::complete(5);
//! // Threshold in K5 with r = -1 is 2, so a triangle is protected and a pair is not.
//! let triangle: NodeSet<usize> = [0, 1, 2].into_iter().collect();
//! let pair: NodeSet<usize> = [0, 1].into_iter().collect();
//! assert!(Alliance::defensive(&g, triangle, -1).is_ok());
//! assert!(matches!(
//!     Alliance::defensive(&g, pair, -1),
//!     Err(AllianceError::ConstraintViolation { .. })
//! ));
//! ```
//!
//! ## Bounded Search
//!
//! ```
//! use alliances::prelude::*;
//!
//! let g = AdjacencyGraph::cycle(8);
//! let found = defensive_alliance(&g, 2, -1, None).expect("an edge suffices");
//! assert!(found.len() <= 2);
//!
//! let cfg = ParallelSearchConfig::with_workers(2);
//! let found = defensive_alliance_parallel(&g, 2, -1, &[], &cfg)?;
//! assert!(found.is_some());
//! # Ok::<(), SearchError>(())
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Graph trait, adjacency-list graph, 0/1 matrix parsing.
//! - [`vertex_set`]: Vertex sets tied to a graph, optionally constraint-checked.
//! - [`threshold`]: Neighbor counts and defensive thresholds.
//! - [`alliance`]: The alliance family, validators, and conversions.
//! - [`chisel`]: Fixed-point removal of unprotected vertices.
//! - [`minimal`]: Exhaustive minimal-alliance search and enumeration.
//! - [`bounded`]: Fixed-parameter search for small connected alliances.
//! - [`parallel`]: Work-queue parallel bounded search.
//! - [`heuristic`]: Cost-reduction local search.
//!
//! The library logs through the [`log`] facade and never installs a logger.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)] // Graph-theory variable names
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod alliance;
pub mod bounded;
pub mod chisel;
pub mod graph;
pub mod heuristic;
pub mod minimal;
pub mod parallel;
mod rng;
pub mod threshold;
pub mod vertex_set;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::alliance::{
        convert_to_da, convert_to_gmda, is_defensive_alliance, is_threshold_alliance, Alliance, AllianceError,
        AllianceKind,
    };
    pub use crate::bounded::{bounded_search, bounded_search_from, defensive_alliance};
    pub use crate::chisel::{chisel, chisel_defensive};
    pub use crate::graph::{parse_adjacency_matrix, AdjacencyGraph, Graph, NodeSet};
    pub use crate::heuristic::{defensive_alliance_reduce_cost, reduce_cost, CostReductionConfig};
    pub use crate::minimal::{enumerate_minimal, find_gmda, find_minimal, MinimalSearchConfig};
    pub use crate::parallel::{
        defensive_alliance_parallel, parallel_bounded_search, ParallelSearchConfig, SearchError,
    };
    pub use crate::threshold::{defensive_alliance_threshold, Thresholds};
    pub use crate::vertex_set::{ConstraintViolation, VertexSet};
}
