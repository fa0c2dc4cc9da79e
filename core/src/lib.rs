//! Capacitated Minimum Spanning Trees
//!
//! Given an undirected weighted graph, a root vertex and a capacity `W`, find
//! a low-weight spanning tree in which every subtree hanging off the root
//! carries a total demand of at most `W` (with unit demands: at most `W`
//! vertices).
//!
//! Two solvers share one capacity-constrained union-find:
//!
//! - [`ModifiedKruskal`]: Kruskal's greedy scan that refuses capacity-violating
//!   unions and a second root edge per cluster; reports infeasibility.
//! - [`EsauWilliams`]: starts from the star topology and merges clusters by
//!   smallest tradeoff while the total weight does not grow.
//!
//! ```
//! use cmst_core::{solve_esau_williams, solve_kruskal, Graph};
//!
//! let graph = Graph::from_edge_list(4, 2, &[
//!     (0, 1, 4), (0, 2, 4), (0, 3, 4), (1, 2, 1), (2, 3, 1),
//! ]).unwrap();
//!
//! assert_eq!(solve_kruskal(&graph).unwrap().total_weight, 9);
//! assert_eq!(solve_esau_williams(&graph).unwrap().total_weight, 9);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;

pub use crate::algorithm::graph::{
    solve_esau_williams, solve_kruskal, validate_solution, CapacitatedSpanningTree, CmstConfig,
    CmstSolution, EsauWilliams, ModifiedKruskal, RootBranch, SolutionEdge,
};
pub use crate::algorithm::traits::{
    CapacitatedSolver, CmstAlgorithm, CmstError, EdgeId, NodeId, SolverStatistics,
};
pub use crate::data_structures::graph::{Edge, EdgeStatus, Graph, GraphBuilder, Weight};
pub use crate::data_structures::union_find::{CapacitatedUnionFind, Rejection, UnionOutcome};
