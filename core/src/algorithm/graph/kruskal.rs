//! Capacity-aware Kruskal's algorithm
//!
//! Kruskal's greedy scan driven by the capacity-constrained union-find: edges
//! are taken in ascending weight order (ties by insertion order) and each one
//! is accepted exactly when [`CapacitatedUnionFind::union`] accepts it. The
//! scan stops once `V - 1` edges are in the tree.
//!
//! # Feasibility
//!
//! If the edge list runs out before `V - 1` edges are accepted, no tree
//! honouring the capacity is reachable by this scan and the run reports
//! [`CmstError::InfeasibleConstraint`]. Partial trees are never returned.
//!
//! # Algorithmic Complexity
//!
//! - **Time Complexity**: O(E log E) for the sort; union-find operations are
//!   amortized near O(1)
//! - **Space Complexity**: O(V + E)
//!
//! When the capacity is at least `V` no union is ever refused for capacity and
//! the result is the classical minimum spanning tree.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, info, trace};

use crate::algorithm::graph::solution::{CmstSolution, SolutionEdge};
use crate::algorithm::traits::{CapacitatedSolver, CmstAlgorithm, CmstError, SolverStatistics};
use crate::data_structures::graph::{Graph, Weight};
use crate::data_structures::union_find::{CapacitatedUnionFind, UnionOutcome};

/// Modified Kruskal solver
#[derive(Debug, Clone, Default)]
pub struct ModifiedKruskal {
    statistics: SolverStatistics,
}

impl ModifiedKruskal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapacitatedSolver for ModifiedKruskal {
    fn name(&self) -> &'static str {
        "Modified Kruskal"
    }

    fn algorithm(&self) -> CmstAlgorithm {
        CmstAlgorithm::ModifiedKruskal
    }

    fn solve(&mut self, graph: &Graph) -> Result<CmstSolution, CmstError> {
        self.statistics = SolverStatistics::default();
        let required = graph.vertex_count() - 1;

        let mut uf = CapacitatedUnionFind::new(graph);
        let mut accepted: Vec<SolutionEdge> = Vec::with_capacity(required);
        let mut total_weight: Weight = 0;

        for id in graph.sorted_edges() {
            if accepted.len() == required {
                break;
            }
            let edge = graph.edge(id);
            self.statistics.edges_examined += 1;

            match uf.union(edge.from, edge.to) {
                UnionOutcome::Rejected(reason) => {
                    self.statistics.unions_rejected += 1;
                    trace!(
                        "Rejected ({}, {}) [{}]: {}",
                        edge.from,
                        edge.to,
                        edge.weight,
                        reason
                    );
                }
                outcome => {
                    self.statistics.unions_accepted += 1;
                    total_weight += edge.weight;
                    accepted.push(SolutionEdge::from(edge));
                    debug!(
                        "Accepted ({}, {}) [{}] as {:?}, weight now {}",
                        edge.from,
                        edge.to,
                        edge.weight,
                        outcome,
                        total_weight
                    );
                }
            }
        }

        if accepted.len() != required {
            info!(
                "Modified Kruskal infeasible: {} of {} edges under capacity {}",
                accepted.len(),
                required,
                graph.capacity()
            );
            return Err(CmstError::InfeasibleConstraint {
                capacity: graph.capacity(),
                accepted: accepted.len(),
                required,
            });
        }

        info!(
            "Modified Kruskal: weight {} over {} edges ({} examined)",
            total_weight,
            accepted.len(),
            self.statistics.edges_examined
        );

        Ok(CmstSolution {
            edges: accepted,
            total_weight,
            algorithm: CmstAlgorithm::ModifiedKruskal,
            upper_bound: None,
            statistics: self.statistics.clone(),
        })
    }

    fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}

/// Solve `graph` with the modified Kruskal algorithm
pub fn solve_kruskal(graph: &Graph) -> Result<CmstSolution, CmstError> {
    ModifiedKruskal::new().solve(graph)
}
