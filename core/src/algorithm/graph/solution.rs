//! Capacitated spanning tree results
//!
//! Solvers hand back a [`CmstSolution`]: the accepted edges, their total
//! weight, and run statistics. The solution can be decomposed into the
//! branches hanging off the root and checked against the graph it was
//! computed for.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{CmstAlgorithm, CmstError, EdgeId, NodeId, SolverStatistics};
use crate::data_structures::graph::{Edge, Graph, Weight};

/// Edge accepted into a capacitated spanning tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}

impl From<&Edge> for SolutionEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id,
            from: edge.from,
            to: edge.to,
            weight: edge.weight,
        }
    }
}

/// Subtree hanging off the root through a single gate edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBranch {
    /// The branch's only edge to the root
    pub gate: EdgeId,
    /// Vertex at the non-root end of the gate
    pub gateway: NodeId,
    /// Member vertices, ascending
    pub vertices: Vec<NodeId>,
    /// Sum of member demands
    pub demand: usize,
}

/// Capacitated minimum spanning tree result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmstSolution {
    /// Accepted edges. Kruskal reports them in acceptance order,
    /// Esau-Williams in edge id order.
    pub edges: Vec<SolutionEdge>,
    /// Total weight of the accepted edges
    pub total_weight: Weight,
    /// Algorithm used to compute the tree
    pub algorithm: CmstAlgorithm,
    /// Star-topology weight the heuristic started from, if any
    pub upper_bound: Option<Weight>,
    /// Performance statistics
    pub statistics: SolverStatistics,
}

impl CmstSolution {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    /// Decompose the tree into the branches attached to the root
    ///
    /// Branches are listed in the order their gate edges appear in the
    /// solution. Vertices unreachable from the root belong to no branch.
    pub fn branches(&self, graph: &Graph) -> Vec<RootBranch> {
        let n = graph.vertex_count();
        let root = graph.root();
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        for edge in &self.edges {
            if edge.from.as_usize() < n && edge.to.as_usize() < n {
                adjacency[edge.from.as_usize()].push(edge.to);
                adjacency[edge.to.as_usize()].push(edge.from);
            }
        }

        let mut visited = vec![false; n];
        visited[root.as_usize()] = true;
        let mut branches = Vec::new();

        for edge in self.edges.iter().filter(|e| e.from == root || e.to == root) {
            let gateway = if edge.from == root { edge.to } else { edge.from };
            if gateway.as_usize() >= n || visited[gateway.as_usize()] {
                continue;
            }

            let mut vertices = Vec::new();
            let mut stack = vec![gateway];
            visited[gateway.as_usize()] = true;
            while let Some(current) = stack.pop() {
                vertices.push(current);
                for &next in &adjacency[current.as_usize()] {
                    if !visited[next.as_usize()] {
                        visited[next.as_usize()] = true;
                        stack.push(next);
                    }
                }
            }
            vertices.sort();
            let demand = vertices.iter().map(|&v| graph.demand(v)).sum();

            branches.push(RootBranch {
                gate: edge.id,
                gateway,
                vertices,
                demand,
            });
        }

        branches
    }
}

/// Validate a solution against its graph
///
/// Verification includes:
/// 1. Every edge exists in the graph with matching endpoints and weight
/// 2. Correct number of edges (V-1) and a matching total weight
/// 3. Every vertex reachable from the root (with 1, the tree property)
/// 4. Every root branch within capacity
pub fn validate_solution(graph: &Graph, solution: &CmstSolution) -> Result<(), CmstError> {
    let n = graph.vertex_count();

    for edge in &solution.edges {
        if edge.id.as_usize() >= graph.edge_count() {
            return Err(CmstError::InvalidSolution(format!(
                "edge {} is not part of the graph",
                edge.id
            )));
        }
        if SolutionEdge::from(graph.edge(edge.id)) != *edge {
            return Err(CmstError::InvalidSolution(format!(
                "edge {} does not match the graph",
                edge.id
            )));
        }
    }

    if solution.edges.len() != n - 1 {
        return Err(CmstError::InvalidSolution(format!(
            "expected {} edges, found {}",
            n - 1,
            solution.edges.len()
        )));
    }

    let weight: Weight = solution.edges.iter().map(|e| e.weight).sum();
    if weight != solution.total_weight {
        return Err(CmstError::InvalidSolution(format!(
            "reported weight {} but edges sum to {}",
            solution.total_weight, weight
        )));
    }

    let branches = solution.branches(graph);
    let reached: usize = branches.iter().map(|b| b.vertices.len()).sum();
    if reached != n - 1 {
        return Err(CmstError::InvalidSolution(format!(
            "only {} of {} vertices reachable from the root",
            reached,
            n - 1
        )));
    }

    if let Some(branch) = branches.iter().find(|b| b.demand > graph.capacity()) {
        return Err(CmstError::InvalidSolution(format!(
            "branch through {} has demand {} above capacity {}",
            branch.gateway,
            branch.demand,
            graph.capacity()
        )));
    }

    Ok(())
}
