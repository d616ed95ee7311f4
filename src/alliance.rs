//! Validated alliances.
//!
//! An [`Alliance`] is a [`VertexSet`] that has passed one or more invariant
//! checks, recorded by its [`AllianceKind`]. Each check is also available as a
//! free validator returning `Result<(), AllianceError>`, and the plain yes/no
//! questions (`is_threshold_alliance`, `is_defensive_alliance`) never build an
//! `Alliance` at all, so searches can check candidates cheaply.
//!
//! Kinds, from weakest to strongest:
//! - `Threshold`: every member has at least `threshold(v)` neighbors inside.
//! - `Defensive { r }`: threshold with `ceil((deg(v) + r) / 2)`, and non-empty.
//! - `LocallyMinimal { r }`: no `(|S|-1)`-subset is itself defensive.
//! - `GloballyMinimal { r }`: chisel of every `(|S|-1)`-subset is empty.
//!
//! A defensive `(|S|-1)`-subset survives chisel unchanged, so globally
//! minimal implies locally minimal.

use crate::chisel::chisel;
use crate::graph::{Graph, NodeSet};
use crate::threshold::{da_is_protected, Thresholds};
use crate::vertex_set::{ConstraintViolation, VertexSet};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Kinds and errors
// ============================================================================

/// Which invariants an [`Alliance`] has been validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllianceKind {
    /// Validated against an external threshold table.
    Threshold,
    /// `r`-defensive alliance.
    Defensive {
        /// Defensive parameter.
        r: i64,
    },
    /// Locally minimal `r`-defensive alliance.
    LocallyMinimal {
        /// Defensive parameter.
        r: i64,
    },
    /// Globally minimal `r`-defensive alliance.
    GloballyMinimal {
        /// Defensive parameter.
        r: i64,
    },
}

impl AllianceKind {
    /// The defensive parameter, if this kind has one.
    pub const fn r(self) -> Option<i64> {
        match self {
            Self::Threshold => None,
            Self::Defensive { r } | Self::LocallyMinimal { r } | Self::GloballyMinimal { r } => {
                Some(r)
            }
        }
    }

    /// Returns whether an alliance of this kind also satisfies `other`'s invariants.
    pub fn implies(self, other: Self) -> bool {
        let rank = |k: Self| match k {
            Self::Threshold => 0,
            Self::Defensive { .. } => 1,
            Self::LocallyMinimal { .. } => 2,
            Self::GloballyMinimal { .. } => 3,
        };
        match other.r() {
            None => true,
            Some(r) => self.r() == Some(r) && rank(self) >= rank(other),
        }
    }
}

/// Why a candidate set is not an alliance of the requested kind.
///
/// All variants are ordinary, recoverable outcomes. Witness fields are for
/// diagnostics only.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AllianceError<N: fmt::Debug> {
    /// A member has fewer in-set neighbors than its threshold.
    #[error("vertex {vertex:?} is below its threshold")]
    ConstraintViolation {
        /// A member that is not protected.
        vertex: N,
    },
    /// Defensive alliances must be non-empty.
    #[error("a defensive alliance cannot be empty")]
    Empty,
    /// Removing `removed` still leaves a defensive alliance.
    #[error("not locally minimal: still defensive without {removed:?}")]
    NotLocallyMinimal {
        /// The vertex whose removal keeps the set defensive.
        removed: N,
    },
    /// Chiseling the set without `removed` leaves a non-empty alliance.
    #[error("not globally minimal: removing {removed:?} chisels down to {} vertices", .survivor.len())]
    NotGloballyMinimal {
        /// The vertex that was removed.
        removed: N,
        /// The surviving smaller alliance, in no particular order.
        survivor: Vec<N>,
    },
    /// Minimality is only defined for defensive alliances.
    #[error("minimality checks need a defensive alliance")]
    NotDefensive,
}

impl<N: fmt::Debug> From<ConstraintViolation<N>> for AllianceError<N> {
    fn from(v: ConstraintViolation<N>) -> Self {
        Self::ConstraintViolation { vertex: v.vertex }
    }
}

// ============================================================================
// Validators
// ============================================================================

/// Checks every member of `nodes` against `thresholds`.
///
/// # Errors
/// [`AllianceError::ConstraintViolation`] naming an unprotected member.
pub fn validate_threshold<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    thresholds: &Thresholds<G::Node>,
) -> Result<(), AllianceError<G::Node>> {
    match nodes.iter().find(|&&v| !thresholds.protects(graph, v, nodes)) {
        Some(&vertex) => Err(AllianceError::ConstraintViolation { vertex }),
        None => Ok(()),
    }
}

/// Checks that `nodes` is a non-empty `r`-defensive alliance.
///
/// Only the members' thresholds are computed, so the cost depends on the
/// candidate, not on the size of the graph.
///
/// # Errors
/// [`AllianceError::Empty`] or [`AllianceError::ConstraintViolation`].
pub fn validate_defensive<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    r: i64,
) -> Result<(), AllianceError<G::Node>> {
    if nodes.is_empty() {
        return Err(AllianceError::Empty);
    }
    match nodes.iter().find(|&&v| !da_is_protected(graph, v, nodes, r)) {
        Some(&vertex) => Err(AllianceError::ConstraintViolation { vertex }),
        None => Ok(()),
    }
}

/// Checks that no single-vertex removal from `nodes` is still `r`-defensive.
///
/// Does not check that `nodes` itself is defensive.
///
/// # Errors
/// [`AllianceError::NotLocallyMinimal`] naming a removable vertex.
pub fn validate_local_minimality<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    r: i64,
) -> Result<(), AllianceError<G::Node>> {
    let thresholds = Thresholds::defensive(graph, r);
    let mut rest = nodes.clone();
    for &removed in nodes {
        rest.remove(&removed);
        let defensive =
            !rest.is_empty() && rest.iter().all(|&v| thresholds.protects(graph, v, &rest));
        rest.insert(removed);
        if defensive {
            return Err(AllianceError::NotLocallyMinimal { removed });
        }
    }
    Ok(())
}

/// Checks that chiseling any `(|S|-1)`-subset of `nodes` under `r`-defensive
/// protection leaves nothing.
///
/// Does not check that `nodes` itself is defensive.
///
/// # Errors
/// [`AllianceError::NotGloballyMinimal`] naming the removed vertex and the survivors.
pub fn validate_global_minimality<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    r: i64,
) -> Result<(), AllianceError<G::Node>> {
    let thresholds = Thresholds::defensive(graph, r);
    let protected = |g: &G, v: G::Node, s: &NodeSet<G::Node>| thresholds.protects(g, v, s);
    let mut rest = nodes.clone();
    for &removed in nodes {
        rest.remove(&removed);
        let survivor = chisel(graph, &protected, &rest);
        rest.insert(removed);
        if !survivor.is_empty() {
            return Err(AllianceError::NotGloballyMinimal {
                removed,
                survivor: survivor.into_iter().collect(),
            });
        }
    }
    Ok(())
}

/// Returns whether every member of `nodes` meets its threshold.
pub fn is_threshold_alliance<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    thresholds: &Thresholds<G::Node>,
) -> bool {
    nodes.iter().all(|&v| thresholds.protects(graph, v, nodes))
}

/// Returns whether `nodes` is a non-empty `r`-defensive alliance.
///
/// Cost is per member; searches checking many sets should precompute a
/// [`Thresholds`] table and use [`is_threshold_alliance`].
pub fn is_defensive_alliance<G: Graph + ?Sized>(
    graph: &G,
    nodes: &NodeSet<G::Node>,
    r: i64,
) -> bool {
    !nodes.is_empty() && nodes.iter().all(|&v| da_is_protected(graph, v, nodes, r))
}

// ============================================================================
// Alliance
// ============================================================================

/// A vertex set proven to satisfy the invariants named by its kind.
///
/// Only obtainable through the validating constructors below; immutable.
pub struct Alliance<'g, G: Graph + ?Sized> {
    set: VertexSet<'g, G>,
    kind: AllianceKind,
}

impl<'g, G: Graph + ?Sized> Alliance<'g, G> {
    /// Validates `nodes` against an external threshold table.
    ///
    /// # Errors
    /// [`AllianceError::ConstraintViolation`] if a member is below its threshold.
    pub fn threshold(
        graph: &'g G,
        nodes: NodeSet<G::Node>,
        thresholds: &Thresholds<G::Node>,
    ) -> Result<Self, AllianceError<G::Node>> {
        let set = VertexSet::constrained(graph, nodes, |g, v, s| thresholds.protects(g, v, s))?;
        Ok(Self {
            set,
            kind: AllianceKind::Threshold,
        })
    }

    /// Validates `nodes` as a non-empty `r`-defensive alliance.
    ///
    /// # Errors
    /// [`AllianceError::Empty`] or [`AllianceError::ConstraintViolation`].
    pub fn defensive(
        graph: &'g G,
        nodes: NodeSet<G::Node>,
        r: i64,
    ) -> Result<Self, AllianceError<G::Node>> {
        if nodes.is_empty() {
            return Err(AllianceError::Empty);
        }
        let thresholds = Thresholds::defensive(graph, r);
        let mut alliance = Self::threshold(graph, nodes, &thresholds)?;
        alliance.kind = AllianceKind::Defensive { r };
        Ok(alliance)
    }

    /// Validates `nodes` as a locally minimal `r`-defensive alliance.
    ///
    /// # Errors
    /// Any defensive failure, or [`AllianceError::NotLocallyMinimal`].
    pub fn locally_minimal(
        graph: &'g G,
        nodes: NodeSet<G::Node>,
        r: i64,
    ) -> Result<Self, AllianceError<G::Node>> {
        Self::defensive(graph, nodes, r)?.into_locally_minimal()
    }

    /// Validates `nodes` as a globally minimal `r`-defensive alliance.
    ///
    /// # Errors
    /// Any defensive failure, or [`AllianceError::NotGloballyMinimal`].
    pub fn globally_minimal(
        graph: &'g G,
        nodes: NodeSet<G::Node>,
        r: i64,
    ) -> Result<Self, AllianceError<G::Node>> {
        Self::defensive(graph, nodes, r)?.into_globally_minimal()
    }

    /// Promotes a defensive alliance after checking local minimality.
    ///
    /// # Errors
    /// [`AllianceError::NotLocallyMinimal`], or [`AllianceError::NotDefensive`]
    /// for a threshold-only alliance.
    pub fn into_locally_minimal(self) -> Result<Self, AllianceError<G::Node>> {
        let Some(r) = self.kind.r() else {
            return Err(AllianceError::NotDefensive);
        };
        if self.kind.implies(AllianceKind::LocallyMinimal { r }) {
            return Ok(self);
        }
        validate_local_minimality(self.graph(), self.vertices(), r)?;
        Ok(Self {
            kind: AllianceKind::LocallyMinimal { r },
            ..self
        })
    }

    /// Promotes a defensive alliance after checking global minimality.
    ///
    /// # Errors
    /// [`AllianceError::NotGloballyMinimal`], or [`AllianceError::NotDefensive`]
    /// for a threshold-only alliance.
    pub fn into_globally_minimal(self) -> Result<Self, AllianceError<G::Node>> {
        let Some(r) = self.kind.r() else {
            return Err(AllianceError::NotDefensive);
        };
        if self.kind.implies(AllianceKind::GloballyMinimal { r }) {
            return Ok(self);
        }
        validate_global_minimality(self.graph(), self.vertices(), r)?;
        Ok(Self {
            kind: AllianceKind::GloballyMinimal { r },
            ..self
        })
    }

    /// The invariants this alliance has been checked against.
    #[inline]
    pub fn kind(&self) -> AllianceKind {
        self.kind
    }

    /// The graph this alliance belongs to.
    #[inline]
    pub fn graph(&self) -> &'g G {
        self.set.graph()
    }

    /// The member vertices.
    #[inline]
    pub fn vertices(&self) -> &NodeSet<G::Node> {
        self.set.vertices()
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Always false for defensive kinds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns whether `v` is a member.
    #[inline]
    pub fn contains(&self, v: G::Node) -> bool {
        self.set.contains(v)
    }

    /// Borrows the underlying vertex set.
    pub fn as_vertex_set(&self) -> &VertexSet<'g, G> {
        &self.set
    }

    /// Drops the validation tag.
    pub fn into_vertex_set(self) -> VertexSet<'g, G> {
        self.set
    }
}

impl<G: Graph + ?Sized> Clone for Alliance<'_, G> {
    fn clone(&self) -> Self {
        Self {
            set: self.set.clone(),
            kind: self.kind,
        }
    }
}

impl<G: Graph + ?Sized> fmt::Debug for Alliance<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alliance")
            .field("kind", &self.kind)
            .field("vertices", self.set.vertices())
            .finish_non_exhaustive()
    }
}

impl<G: Graph + ?Sized> fmt::Display for Alliance<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.set, f)
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Validates an unchecked vertex set as an `r`-defensive alliance.
///
/// # Errors
/// See [`Alliance::defensive`].
pub fn convert_to_da<G: Graph + ?Sized>(
    vs: VertexSet<'_, G>,
    r: i64,
) -> Result<Alliance<'_, G>, AllianceError<G::Node>> {
    let graph = vs.graph();
    Alliance::defensive(graph, vs.into_vertices(), r)
}

/// Validates an unchecked vertex set as a globally minimal `r`-defensive alliance.
///
/// # Errors
/// See [`Alliance::globally_minimal`].
pub fn convert_to_gmda<G: Graph + ?Sized>(
    vs: VertexSet<'_, G>,
    r: i64,
) -> Result<Alliance<'_, G>, AllianceError<G::Node>> {
    let graph = vs.graph();
    Alliance::globally_minimal(graph, vs.into_vertices(), r)
}

// ============================================================================
// Tests
// ============================================================================
