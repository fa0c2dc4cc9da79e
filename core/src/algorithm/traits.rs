//! Core trait and type definitions for the capacitated spanning tree solvers
//!
//! This module establishes the identifiers, the error taxonomy and the solver
//! trait shared by every algorithm in the crate.
//!
//! # Key Design Principles
//! - Vertices and edges are addressed by strongly typed indices into flat arenas
//! - Construction errors fail fast, before any solver runs
//! - Union rejections are ordinary algorithmic outcomes, not errors
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::solution::CmstSolution;
use crate::data_structures::graph::Graph;

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge identifier, equal to the edge's insertion order
///
/// Doubles as the stable tie-breaker when two edges carry the same weight.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Error types for graph construction and solver execution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CmstError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid node: {0}")]
    InvalidNode(NodeId),

    #[error("No spanning tree honours capacity {capacity}: accepted {accepted} of {required} edges")]
    InfeasibleConstraint {
        capacity: usize,
        accepted: usize,
        required: usize,
    },

    #[error("Vertex {0} has no direct edge to the root")]
    MissingRootLink(NodeId),

    #[error("Invalid solution: {0}")]
    InvalidSolution(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Which solver produced a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CmstAlgorithm {
    /// Capacity-aware Kruskal, exact feasibility check
    #[serde(rename = "kruskal")]
    ModifiedKruskal,
    /// Esau-Williams tradeoff heuristic
    EsauWilliams,
}

impl CmstAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            CmstAlgorithm::ModifiedKruskal => "kruskal",
            CmstAlgorithm::EsauWilliams => "esau-williams",
        }
    }
}

impl Default for CmstAlgorithm {
    fn default() -> Self {
        CmstAlgorithm::EsauWilliams
    }
}

impl Display for CmstAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution statistics collected during one solver run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStatistics {
    /// Candidate edges handed to the union-find
    pub edges_examined: usize,
    /// Unions that succeeded (merges and root attachments)
    pub unions_accepted: usize,
    /// Unions refused for any reason
    pub unions_rejected: usize,
    /// Tradeoff values recomputed (Esau-Williams only)
    pub tradeoff_evaluations: usize,
    /// Improvement iterations (Esau-Williams only)
    pub iterations: usize,
}

/// A solver for the capacitated minimum spanning tree problem
///
/// # Invariants
/// - The graph is never mutated; all per-run state is owned by the solver
/// - Deterministic behavior for given inputs
pub trait CapacitatedSolver: Debug {
    /// Returns the solver's descriptive name
    fn name(&self) -> &'static str;

    /// Returns which algorithm the solver implements
    fn algorithm(&self) -> CmstAlgorithm;

    /// Computes a capacitated spanning tree rooted at the graph's root
    fn solve(&mut self, graph: &Graph) -> Result<CmstSolution, CmstError>;

    /// Statistics of the most recent run
    fn statistics(&self) -> &SolverStatistics;
}
