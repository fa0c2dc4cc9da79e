//! Esau-Williams heuristic for capacitated spanning trees
//!
//! The heuristic starts from the star topology, every vertex wired straight to
//! the root, and greedily merges clusters while doing so lowers the total
//! weight.
//!
//! # Tradeoff
//!
//! For a vertex `u` in cluster `C` the tradeoff is
//!
//! ```text
//! t(u) = w(cheapest unprocessed edge at u) - w(connecting link of C)
//! ```
//!
//! A non-positive tradeoff means replacing one of the two clusters' root links
//! by the candidate edge does not increase the total. Each iteration selects
//! the globally smallest tradeoff and attempts the merge through the
//! capacity-constrained union-find; the candidate edge is then either used or
//! discarded, so the loop performs at most `E` decisions.
//!
//! # Bookkeeping
//!
//! Cluster representatives carry their member list and their connecting link,
//! the cheapest root edge of any member. When two clusters merge, the cheaper
//! link survives and the costlier one is superseded: it leaves the tree and
//! its weight is subtracted from the running total. Only vertices of touched
//! clusters have their tradeoff recomputed.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeSet;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::solution::{CmstSolution, SolutionEdge};
use crate::algorithm::traits::{
    CapacitatedSolver, CmstAlgorithm, CmstError, EdgeId, NodeId, SolverStatistics,
};
use crate::data_structures::graph::{EdgeStatus, Graph, Weight};
use crate::data_structures::union_find::{CapacitatedUnionFind, Rejection, UnionOutcome};

/// Improvement metric of one vertex and the edge it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tradeoff {
    pub value: Weight,
    pub edge: EdgeId,
}

/// Per-iteration working map from vertex to its current tradeoff
///
/// `None` stands for an exhausted adjacency list: an infinite tradeoff that is
/// never selected and never blocks termination.
#[derive(Debug, Clone)]
pub struct TradeoffTable {
    entries: Vec<Option<Tradeoff>>,
    root: NodeId,
}

impl TradeoffTable {
    pub fn new(vertex_count: usize, root: NodeId) -> Self {
        Self {
            entries: vec![None; vertex_count],
            root,
        }
    }

    pub fn get(&self, u: NodeId) -> Option<Tradeoff> {
        self.entries[u.as_usize()]
    }

    pub fn set(&mut self, u: NodeId, tradeoff: Option<Tradeoff>) {
        self.entries[u.as_usize()] = tradeoff;
    }

    fn candidates(&self) -> impl Iterator<Item = (NodeId, Tradeoff)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |&(i, _)| i != self.root.as_usize())
            .filter_map(|(i, t)| t.map(|t| (NodeId(i), t)))
    }

    /// True when no vertex has a tradeoff `<= 0`
    pub fn all_positive(&self) -> bool {
        self.candidates().all(|(_, t)| t.value > 0)
    }

    /// Smallest tradeoff; ties go to the lowest vertex index
    pub fn select_min(&self) -> Option<(NodeId, Tradeoff)> {
        self.candidates().fold(None, |best, (u, t)| match best {
            Some((_, b)) if b.value <= t.value => best,
            _ => Some((u, t)),
        })
    }
}

/// Cluster contents and root links, kept on representatives
#[derive(Debug, Clone)]
pub struct ClusterBook {
    elements: Vec<Vec<NodeId>>,
    connecting_link: Vec<Option<EdgeId>>,
}

impl ClusterBook {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            elements: vec![Vec::new(); vertex_count],
            connecting_link: vec![None; vertex_count],
        }
    }

    /// Start `u` as a singleton cluster linked to the root by `link`
    pub fn seed(&mut self, u: NodeId, link: EdgeId) {
        self.elements[u.as_usize()] = vec![u];
        self.connecting_link[u.as_usize()] = Some(link);
    }

    pub fn is_seeded(&self, u: NodeId) -> bool {
        self.connecting_link[u.as_usize()].is_some()
    }

    /// Members of the cluster represented by `rep`
    pub fn elements(&self, rep: NodeId) -> &[NodeId] {
        &self.elements[rep.as_usize()]
    }

    /// Cheapest known root edge of the cluster represented by `rep`
    pub fn connecting_link(&self, rep: NodeId) -> Option<EdgeId> {
        self.connecting_link[rep.as_usize()]
    }

    /// Fold `absorbed` into `survivor`, returning the superseded root link
    ///
    /// The cheaper link stays with the survivor; on equal weight the
    /// survivor's own link is kept.
    pub fn absorb(&mut self, graph: &Graph, survivor: NodeId, absorbed: NodeId) -> Option<EdgeId> {
        let moved = std::mem::take(&mut self.elements[absorbed.as_usize()]);
        self.elements[survivor.as_usize()].extend(moved);

        let kept = self.connecting_link[survivor.as_usize()];
        let incoming = self.connecting_link[absorbed.as_usize()].take();
        match (kept, incoming) {
            (Some(k), Some(i)) if graph.edge(i).weight < graph.edge(k).weight => {
                self.connecting_link[survivor.as_usize()] = Some(i);
                Some(k)
            }
            (Some(_), incoming) => incoming,
            (None, incoming) => {
                self.connecting_link[survivor.as_usize()] = incoming;
                None
            }
        }
    }
}

/// What happened to a selected candidate edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Clusters merged; `superseded` is the root link that left the tree
    Merged { superseded: Option<EdgeId> },
    /// Edge discarded
    Rejected(Rejection),
}

/// One selection of the improvement loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub vertex: NodeId,
    pub edge: EdgeId,
    pub tradeoff: Weight,
    pub decision: Decision,
    /// Running total after the decision
    pub total_weight: Weight,
}

/// Esau-Williams solver
#[derive(Debug, Clone, Default)]
pub struct EsauWilliams {
    statistics: SolverStatistics,
    trace: Vec<DecisionRecord>,
}

impl EsauWilliams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decisions of the most recent run, in order
    pub fn trace(&self) -> &[DecisionRecord] {
        &self.trace
    }
}

impl CapacitatedSolver for EsauWilliams {
    fn name(&self) -> &'static str {
        "Esau-Williams"
    }

    fn algorithm(&self) -> CmstAlgorithm {
        CmstAlgorithm::EsauWilliams
    }

    fn solve(&mut self, graph: &Graph) -> Result<CmstSolution, CmstError> {
        self.statistics = SolverStatistics::default();
        self.trace.clear();

        let (upper_bound, total_weight, accepted) = {
            let mut run = Run::new(graph, &mut self.statistics, &mut self.trace);
            let upper_bound = run.initialize()?;
            run.improve();
            (upper_bound, run.total_weight, std::mem::take(&mut run.accepted))
        };
        let edges: Vec<SolutionEdge> = accepted
            .into_iter()
            .map(|id| SolutionEdge::from(graph.edge(id)))
            .collect();

        info!(
            "Esau-Williams: weight {} (star bound {}) after {} iterations",
            total_weight, upper_bound, self.statistics.iterations
        );

        Ok(CmstSolution {
            edges,
            total_weight,
            algorithm: CmstAlgorithm::EsauWilliams,
            upper_bound: Some(upper_bound),
            statistics: self.statistics.clone(),
        })
    }

    fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}

/// Solve `graph` with the Esau-Williams heuristic
pub fn solve_esau_williams(graph: &Graph) -> Result<CmstSolution, CmstError> {
    EsauWilliams::new().solve(graph)
}

/// Mutable state of a single run
struct Run<'a> {
    graph: &'a Graph,
    uf: CapacitatedUnionFind,
    status: Vec<EdgeStatus>,
    clusters: ClusterBook,
    table: TradeoffTable,
    accepted: BTreeSet<EdgeId>,
    pending: BTreeSet<NodeId>,
    total_weight: Weight,
    statistics: &'a mut SolverStatistics,
    trace: &'a mut Vec<DecisionRecord>,
}

impl<'a> Run<'a> {
    fn new(
        graph: &'a Graph,
        statistics: &'a mut SolverStatistics,
        trace: &'a mut Vec<DecisionRecord>,
    ) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            uf: CapacitatedUnionFind::new(graph),
            status: vec![EdgeStatus::Unprocessed; graph.edge_count()],
            clusters: ClusterBook::new(n),
            table: TradeoffTable::new(n, graph.root()),
            accepted: BTreeSet::new(),
            pending: BTreeSet::new(),
            total_weight: 0,
            statistics,
            trace,
        }
    }

    /// Wire every vertex to the root through its cheapest direct edge
    ///
    /// Returns the star weight.
    fn initialize(&mut self) -> Result<Weight, CmstError> {
        let root = self.graph.root();
        for &id in self.graph.root_edges() {
            let gateway = self.graph.edge(id).other(root);
            if self.clusters.is_seeded(gateway) {
                // A cheaper parallel root edge already seeded this vertex
                self.status[id.as_usize()] = EdgeStatus::Discard;
                continue;
            }
            self.clusters.seed(gateway, id);
            self.status[id.as_usize()] = EdgeStatus::Used;
            self.accepted.insert(id);
            self.total_weight += self.graph.edge(id).weight;
        }

        if let Some(orphan) = self
            .graph
            .non_root_vertices()
            .find(|&u| !self.clusters.is_seeded(u))
        {
            return Err(CmstError::MissingRootLink(orphan));
        }

        self.pending.extend(self.graph.non_root_vertices());
        debug!("Star topology weight {}", self.total_weight);
        Ok(self.total_weight)
    }

    fn recompute(&mut self, u: NodeId) {
        let candidate = self
            .graph
            .adjacency(u)
            .iter()
            .copied()
            .find(|id| self.status[id.as_usize()] == EdgeStatus::Unprocessed);
        let rep = self.uf.find(u);
        let link = self.clusters.connecting_link(rep);

        let tradeoff = match (candidate, link) {
            (Some(edge), Some(link)) => Some(Tradeoff {
                value: self.graph.edge(edge).weight - self.graph.edge(link).weight,
                edge,
            }),
            _ => None,
        };
        trace!("tradeoff {}: {:?}", u, tradeoff);
        self.table.set(u, tradeoff);
        self.statistics.tradeoff_evaluations += 1;
    }

    /// Union of the clusters of `from` and `to` with cluster bookkeeping layered on top
    fn union_ew(&mut self, from: NodeId, to: NodeId) -> Decision {
        match self.uf.union(from, to) {
            UnionOutcome::Merged { survivor, absorbed } => Decision::Merged {
                superseded: self.clusters.absorb(self.graph, survivor, absorbed),
            },
            // Root edges leave the Unprocessed state during initialization
            UnionOutcome::AttachedToRoot { .. } => {
                unreachable!("root edge ({}, {}) selected as a merge candidate", from, to)
            }
            UnionOutcome::Rejected(reason) => Decision::Rejected(reason),
        }
    }

    fn enqueue_cluster(&mut self, u: NodeId) {
        let rep = self.uf.find(u);
        self.pending.extend(self.clusters.elements(rep).iter().copied());
    }

    fn improve(&mut self) {
        loop {
            for u in std::mem::take(&mut self.pending) {
                self.recompute(u);
            }
            if self.table.all_positive() {
                break;
            }
            let Some((vertex, tradeoff)) = self.table.select_min() else {
                break;
            };
            self.statistics.iterations += 1;
            self.statistics.edges_examined += 1;

            let edge = *self.graph.edge(tradeoff.edge);
            debug_assert_eq!(self.status[edge.id.as_usize()], EdgeStatus::Unprocessed);

            let decision = self.union_ew(edge.from, edge.to);
            match decision {
                Decision::Merged { superseded } => {
                    let before = self.total_weight;
                    self.status[edge.id.as_usize()] = EdgeStatus::Used;
                    self.accepted.insert(edge.id);
                    self.total_weight += edge.weight;
                    if let Some(link) = superseded {
                        self.status[link.as_usize()] = EdgeStatus::Discard;
                        self.accepted.remove(&link);
                        self.total_weight -= self.graph.edge(link).weight;
                    }
                    debug_assert!(self.total_weight <= before);
                    self.statistics.unions_accepted += 1;

                    debug!(
                        "Merged via ({}, {}) [{}], tradeoff {}, superseding {:?}: weight {} -> {}",
                        edge.from,
                        edge.to,
                        edge.weight,
                        tradeoff.value,
                        superseded,
                        before,
                        self.total_weight
                    );
                    self.enqueue_cluster(edge.from);
                }
                Decision::Rejected(reason) => {
                    self.status[edge.id.as_usize()] = EdgeStatus::Discard;
                    self.statistics.unions_rejected += 1;
                    debug!(
                        "Discarded ({}, {}) [{}], tradeoff {}: {}",
                        edge.from, edge.to, edge.weight, tradeoff.value, reason
                    );
                    self.enqueue_cluster(edge.from);
                    self.enqueue_cluster(edge.to);
                }
            }

            self.trace.push(DecisionRecord {
                vertex,
                edge: edge.id,
                tradeoff: tradeoff.value,
                decision,
                total_weight: self.total_weight,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::kruskal::solve_kruskal;
    use crate::algorithm::graph::solution::validate_solution;
    use crate::data_structures::graph::GraphBuilder;
    use proptest::prelude::*;

    const SIX_VERTEX: [(usize, usize, Weight); 15] = [
        (1, 3, 3), (1, 2, 4), (0, 1, 5), (2, 4, 5), (0, 2, 6),
        (3, 4, 6), (3, 5, 6), (4, 5, 7), (2, 3, 8), (1, 4, 8),
        (0, 3, 9), (1, 5, 10), (0, 4, 12), (2, 5, 12), (0, 5, 15),
    ];

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_capacity_three_regression() {
        init_logger();
        let g = Graph::from_edge_list(6, 3, &SIX_VERTEX).unwrap();
        let mut solver = EsauWilliams::new();
        let s = solver.solve(&g).unwrap();

        assert_eq!(s.upper_bound, Some(47));
        assert_eq!(s.total_weight, 25);
        assert_eq!(
            s.edge_ids(),
            vec![EdgeId(0), EdgeId(2), EdgeId(3), EdgeId(4), EdgeId(6)]
        );
        assert!(validate_solution(&g, &s).is_ok());

        let totals: Vec<Weight> = solver.trace().iter().map(|r| r.total_weight).collect();
        assert_eq!(totals, vec![38, 31, 25, 25, 25]);
        assert_eq!(
            solver.trace()[0].decision,
            Decision::Merged { superseded: Some(EdgeId(14)) }
        );
        assert_eq!(
            solver.trace()[3].decision,
            Decision::Rejected(Rejection::CapacityExceeded)
        );
        assert_eq!(s.statistics.iterations, 5);
        assert_eq!(s.statistics.unions_accepted, 3);
        assert_eq!(s.statistics.unions_rejected, 2);
    }

    #[test]
    fn test_custom_root() {
        // Same graph with vertices 0 and 4 swapped
        let g = GraphBuilder::new(6, 3)
            .root(4)
            .edges([
                (1, 3, 3), (1, 2, 4), (4, 1, 5), (2, 0, 5), (4, 2, 6),
                (3, 0, 6), (3, 5, 6), (0, 5, 7), (2, 3, 8), (1, 0, 8),
                (4, 3, 9), (1, 5, 10), (4, 0, 12), (2, 5, 12), (4, 5, 15),
            ])
            .build()
            .unwrap();
        let s = solve_esau_williams(&g).unwrap();
        assert_eq!(s.upper_bound, Some(47));
        assert_eq!(s.total_weight, 25);
        assert!(validate_solution(&g, &s).is_ok());
        for branch in s.branches(&g) {
            assert!(!branch.vertices.contains(&NodeId(4)));
            assert!(branch.demand <= 3);
        }
    }

    #[test]
    fn test_weighted_demand_regression() {
        init_logger();
        let g = GraphBuilder::new(7, 3)
            .edges([
                (0, 1, 5), (0, 2, 6), (0, 3, 9), (0, 4, 10), (0, 5, 11), (0, 6, 15),
                (1, 2, 9), (1, 3, 6), (1, 4, 6), (1, 5, 8), (1, 6, 17), (2, 3, 7),
                (2, 4, 9), (2, 5, 8), (2, 6, 12), (3, 4, 10), (3, 5, 5), (3, 6, 11),
                (4, 5, 14), (4, 6, 9), (5, 6, 8),
            ])
            .demand(3, 2)
            .build()
            .unwrap();
        let mut solver = EsauWilliams::new();
        let s = solver.solve(&g).unwrap();

        assert_eq!(s.upper_bound, Some(56));
        assert_eq!(s.total_weight, 42);
        assert!(validate_solution(&g, &s).is_ok());

        let steps: Vec<(usize, usize, bool)> = solver
            .trace()
            .iter()
            .map(|r| {
                let edge = g.edge(r.edge);
                let merged = matches!(r.decision, Decision::Merged { .. });
                (edge.from.as_usize(), edge.to.as_usize(), merged)
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                (5, 6, true),
                (3, 5, false),
                (1, 4, true),
                (1, 3, false),
                (1, 5, false),
                (2, 5, true),
                (2, 3, false),
            ]
        );
        let totals: Vec<Weight> = solver.trace().iter().map(|r| r.total_weight).collect();
        assert_eq!(totals, vec![49, 49, 45, 45, 45, 42, 42]);
    }

    #[test]
    fn test_beats_kruskal_on_regression_graph() {
        let g = Graph::from_edge_list(6, 3, &SIX_VERTEX).unwrap();
        let heuristic = solve_esau_williams(&g).unwrap();
        let kruskal = solve_kruskal(&g).unwrap();
        assert!(heuristic.total_weight < kruskal.total_weight);
    }

    #[test]
    fn test_unit_capacity_keeps_star() {
        let g = Graph::from_edge_list(6, 1, &SIX_VERTEX).unwrap();
        let s = solve_esau_williams(&g).unwrap();
        assert_eq!(s.total_weight, 47);
        assert_eq!(
            s.edge_ids(),
            vec![EdgeId(2), EdgeId(4), EdgeId(10), EdgeId(12), EdgeId(14)]
        );
    }

    #[test]
    fn test_missing_root_link() {
        let g = Graph::from_edge_list(4, 3, &[(0, 1, 1), (1, 2, 1), (0, 3, 1)]).unwrap();
        assert_eq!(
            solve_esau_williams(&g).unwrap_err(),
            CmstError::MissingRootLink(NodeId(2))
        );
    }

    #[test]
    fn test_parallel_root_edges() {
        let g = Graph::from_edge_list(3, 2, &[(0, 1, 5), (0, 1, 2), (0, 2, 4), (1, 2, 10)])
            .unwrap();
        let s = solve_esau_williams(&g).unwrap();
        assert_eq!(s.upper_bound, Some(6));
        assert_eq!(s.total_weight, 6);
        assert_eq!(s.edge_ids(), vec![EdgeId(1), EdgeId(2)]);
    }

    #[test]
    fn test_zero_tradeoff_still_merges() {
        // 1-2 costs exactly as much as the root link of 2
        let g = Graph::from_edge_list(3, 2, &[(0, 1, 3), (0, 2, 4), (1, 2, 4)]).unwrap();
        let mut solver = EsauWilliams::new();
        let s = solver.solve(&g).unwrap();
        assert_eq!(s.total_weight, 7);
        assert!(matches!(solver.trace()[0].decision, Decision::Merged { .. }));
        assert!(s.contains(EdgeId(0)));
        assert!(s.contains(EdgeId(2)));
    }

    #[test]
    fn test_single_vertex() {
        let g = GraphBuilder::new(1, 2).build().unwrap();
        let s = solve_esau_williams(&g).unwrap();
        assert!(s.edges.is_empty());
        assert_eq!(s.total_weight, 0);
    }

    #[test]
    fn test_weighted_demand() {
        let g = GraphBuilder::new(4, 3)
            .edges([(0, 1, 10), (0, 2, 10), (0, 3, 10), (1, 2, 1), (2, 3, 1)])
            .demand(2, 2)
            .build()
            .unwrap();
        let s = solve_esau_williams(&g).unwrap();
        assert!(validate_solution(&g, &s).is_ok());
        // {1, 2} fills the capacity; 3 stays on its own root link
        assert_eq!(s.total_weight, 21);
    }

    #[test]
    fn test_tradeoff_table_selection() {
        let mut table = TradeoffTable::new(4, NodeId(0));
        assert!(table.all_positive());
        assert_eq!(table.select_min(), None);

        table.set(NodeId(0), Some(Tradeoff { value: -100, edge: EdgeId(9) }));
        assert!(table.all_positive());

        table.set(NodeId(1), Some(Tradeoff { value: 2, edge: EdgeId(0) }));
        table.set(NodeId(2), Some(Tradeoff { value: 0, edge: EdgeId(1) }));
        table.set(NodeId(3), Some(Tradeoff { value: 0, edge: EdgeId(2) }));
        assert!(!table.all_positive());
        assert_eq!(
            table.select_min(),
            Some((NodeId(2), Tradeoff { value: 0, edge: EdgeId(1) }))
        );

        table.set(NodeId(2), None);
        table.set(NodeId(3), Some(Tradeoff { value: 1, edge: EdgeId(2) }));
        assert_eq!(table.get(NodeId(2)), None);
        assert_eq!(table.get(NodeId(3)).map(|t| t.value), Some(1));
        assert!(table.all_positive());
    }

    #[test]
    fn test_cluster_book_keeps_cheaper_link() {
        let g = Graph::from_edge_list(3, 2, &[(0, 1, 8), (0, 2, 3), (1, 2, 1)]).unwrap();
        let mut book = ClusterBook::new(3);
        book.seed(NodeId(1), EdgeId(0));
        book.seed(NodeId(2), EdgeId(1));

        let superseded = book.absorb(&g, NodeId(1), NodeId(2));
        assert_eq!(superseded, Some(EdgeId(0)));
        assert_eq!(book.connecting_link(NodeId(1)), Some(EdgeId(1)));
        assert_eq!(book.connecting_link(NodeId(2)), None);
        assert_eq!(book.elements(NodeId(1)), &[NodeId(1), NodeId(2)]);
        assert!(book.elements(NodeId(2)).is_empty());
    }

    fn complete_graph(n: usize, weights: &[Weight]) -> Vec<(usize, usize, Weight)> {
        let mut edges = Vec::new();
        let mut k = 0;
        for u in 0..n {
            for v in u + 1..n {
                edges.push((u, v, weights[k % weights.len()]));
                k += 1;
            }
        }
        edges
    }

    proptest! {
        #[test]
        fn test_monotone_and_feasible(
            n in 2usize..10,
            capacity in 1usize..6,
            weights in prop::collection::vec(0i64..50, 1..45)
        ) {
            let edges = complete_graph(n, &weights);
            let g = Graph::from_edge_list(n, capacity, &edges).unwrap();
            let mut solver = EsauWilliams::new();
            let s = solver.solve(&g).unwrap();

            prop_assert!(validate_solution(&g, &s).is_ok());
            let bound = s.upper_bound.unwrap();
            prop_assert!(s.total_weight <= bound);

            let mut previous = bound;
            for record in solver.trace() {
                prop_assert!(record.total_weight <= previous);
                previous = record.total_weight;
            }
            prop_assert!(solver.trace().len() <= g.edge_count());

            for branch in s.branches(&g) {
                prop_assert!(branch.demand <= capacity);
            }
        }
    }
}
