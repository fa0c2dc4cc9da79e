//! Capacity-constrained union-find
//!
//! A disjoint-set forest over the vertex arena of a [`Graph`] with two extra
//! rules layered on the classical structure:
//!
//! - **Capacity**: two clusters merge only if their combined demand stays
//!   within the graph's capacity `W`.
//! - **Root adjacency**: the root never joins a cluster. A union with the root
//!   is a *virtual* attachment that flags the other cluster as root-adjacent,
//!   and each cluster may be attached at most once.
//!
//! Union by size keeps the trees shallow and path compression flattens them
//! on every `find`, giving near-constant amortized cost per operation.
//!
//! # Invariants
//! - Following `parent` from any vertex ends at a vertex that is its own parent
//! - `size[r]` is the total demand of the cluster represented by `r`
//! - A cluster's root-adjacency flag survives every merge it takes part in
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::Graph;

/// Why a union was refused. A normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Both endpoints already resolve to the same cluster
    SameCluster,
    /// The merged cluster would exceed the capacity bound
    CapacityExceeded,
    /// The cluster already owns its one edge to the root
    RootAlreadyAttached,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::SameCluster => "already connected",
            Rejection::CapacityExceeded => "capacity exceeded",
            Rejection::RootAlreadyAttached => "root already attached",
        };
        f.write_str(reason)
    }
}

/// Result of a union attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionOutcome {
    /// Two non-root clusters merged; `absorbed` now points at `survivor`
    Merged { survivor: NodeId, absorbed: NodeId },
    /// The cluster represented by `cluster` took its edge to the root
    AttachedToRoot { cluster: NodeId },
    Rejected(Rejection),
}

impl UnionOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, UnionOutcome::Rejected(_))
    }
}

/// Disjoint-set forest honouring a capacity ceiling and a single root attachment per cluster
#[derive(Debug, Clone)]
pub struct CapacitatedUnionFind {
    /// Parent pointers; a self-loop marks a representative
    parent: Vec<NodeId>,
    /// Cluster demand, valid on representatives only
    size: Vec<usize>,
    /// Whether the cluster already owns an edge to the root
    adj_root: Vec<bool>,
    root: NodeId,
    capacity: usize,
    /// Number of non-root clusters
    num_clusters: usize,
}

impl CapacitatedUnionFind {
    /// One singleton cluster per vertex, sized by demand
    pub fn new(graph: &Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            parent: (0..n).map(NodeId).collect(),
            size: graph.vertices().iter().map(|v| v.demand).collect(),
            adj_root: vec![false; n],
            root: graph.root(),
            capacity: graph.capacity(),
            num_clusters: n.saturating_sub(1),
        }
    }

    /// Find the representative of `x` with path compression
    pub fn find(&mut self, x: NodeId) -> NodeId {
        let p = self.parent[x.as_usize()];
        if p != x {
            let rep = self.find(p);
            self.parent[x.as_usize()] = rep;
        }
        self.parent[x.as_usize()]
    }

    /// Attempt to join the clusters of `u` and `v`
    ///
    /// State changes only when the outcome is accepted.
    pub fn union(&mut self, u: NodeId, v: NodeId) -> UnionOutcome {
        let rep_u = self.find(u);
        let rep_v = self.find(v);

        if rep_u == rep_v {
            return UnionOutcome::Rejected(Rejection::SameCluster);
        }
        if self.size[rep_u.as_usize()] + self.size[rep_v.as_usize()] > self.capacity {
            return UnionOutcome::Rejected(Rejection::CapacityExceeded);
        }

        // The root stays outside every cluster
        if u == self.root || v == self.root {
            let cluster = if u == self.root { rep_v } else { rep_u };
            if self.adj_root[cluster.as_usize()] {
                return UnionOutcome::Rejected(Rejection::RootAlreadyAttached);
            }
            self.adj_root[cluster.as_usize()] = true;
            return UnionOutcome::AttachedToRoot { cluster };
        }

        // Two attached clusters are already joined through the root
        if self.adj_root[rep_u.as_usize()] && self.adj_root[rep_v.as_usize()] {
            return UnionOutcome::Rejected(Rejection::RootAlreadyAttached);
        }

        let (survivor, absorbed) = if self.size[rep_u.as_usize()] >= self.size[rep_v.as_usize()] {
            (rep_u, rep_v)
        } else {
            (rep_v, rep_u)
        };
        self.size[survivor.as_usize()] += self.size[absorbed.as_usize()];
        self.parent[absorbed.as_usize()] = survivor;
        if self.adj_root[absorbed.as_usize()] {
            self.adj_root[survivor.as_usize()] = true;
        }
        self.num_clusters -= 1;

        UnionOutcome::Merged { survivor, absorbed }
    }

    /// Check if two vertices are in the same cluster
    pub fn connected(&mut self, u: NodeId, v: NodeId) -> bool {
        self.find(u) == self.find(v)
    }

    /// Total demand of the cluster containing `u`
    pub fn cluster_size(&mut self, u: NodeId) -> usize {
        let rep = self.find(u);
        self.size[rep.as_usize()]
    }

    /// Whether the cluster containing `u` owns an edge to the root
    pub fn is_root_attached(&mut self, u: NodeId) -> bool {
        let rep = self.find(u);
        self.adj_root[rep.as_usize()]
    }

    /// Number of non-root clusters
    pub fn clusters(&self) -> usize {
        self.num_clusters
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::GraphBuilder;
    use proptest::prelude::*;

    fn forest(n: usize, capacity: usize) -> CapacitatedUnionFind {
        CapacitatedUnionFind::new(&GraphBuilder::new(n, capacity).build().unwrap())
    }

    #[test]
    fn test_union_find() {
        let mut uf = forest(6, 5);

        // Root excluded from the count
        assert_eq!(uf.clusters(), 5);
        assert!(!uf.connected(NodeId(1), NodeId(2)));

        assert!(uf.union(NodeId(1), NodeId(2)).is_accepted());
        assert_eq!(uf.clusters(), 4);
        assert!(uf.connected(NodeId(1), NodeId(2)));

        assert_eq!(
            uf.union(NodeId(2), NodeId(1)),
            UnionOutcome::Rejected(Rejection::SameCluster)
        );
        assert_eq!(uf.clusters(), 4);

        assert!(uf.union(NodeId(3), NodeId(4)).is_accepted());
        assert!(uf.union(NodeId(1), NodeId(4)).is_accepted());
        assert_eq!(uf.clusters(), 2);
        assert_eq!(uf.cluster_size(NodeId(3)), 4);
    }

    #[test]
    fn test_capacity_ceiling() {
        let mut uf = forest(5, 2);
        assert!(uf.union(NodeId(1), NodeId(2)).is_accepted());
        assert_eq!(
            uf.union(NodeId(2), NodeId(3)),
            UnionOutcome::Rejected(Rejection::CapacityExceeded)
        );
        assert_eq!(uf.cluster_size(NodeId(3)), 1);
        assert!(!uf.connected(NodeId(2), NodeId(3)));
    }

    #[test]
    fn test_smaller_cluster_absorbed() {
        let mut uf = forest(5, 4);
        assert!(uf.union(NodeId(1), NodeId(2)).is_accepted());
        let rep = uf.find(NodeId(1));
        match uf.union(NodeId(3), NodeId(1)) {
            UnionOutcome::Merged { survivor, absorbed } => {
                assert_eq!(survivor, rep);
                assert_eq!(absorbed, NodeId(3));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_root_attachment_is_virtual() {
        let mut uf = forest(4, 3);
        assert_eq!(
            uf.union(NodeId(0), NodeId(1)),
            UnionOutcome::AttachedToRoot { cluster: NodeId(1) }
        );
        // The root never joins the cluster
        assert!(!uf.connected(NodeId(0), NodeId(1)));
        assert_eq!(uf.cluster_size(NodeId(1)), 1);
        assert_eq!(uf.clusters(), 3);
        assert!(uf.is_root_attached(NodeId(1)));

        assert_eq!(
            uf.union(NodeId(1), NodeId(0)),
            UnionOutcome::Rejected(Rejection::RootAlreadyAttached)
        );
    }

    #[test]
    fn test_root_flag_survives_merge() {
        let mut uf = forest(5, 4);
        assert!(uf.union(NodeId(2), NodeId(0)).is_accepted());
        assert!(uf.union(NodeId(3), NodeId(4)).is_accepted());
        // {3, 4} survives, absorbing the attached {2}
        assert!(uf.union(NodeId(2), NodeId(3)).is_accepted());
        assert!(uf.is_root_attached(NodeId(4)));
        assert_eq!(
            uf.union(NodeId(0), NodeId(4)),
            UnionOutcome::Rejected(Rejection::RootAlreadyAttached)
        );
    }

    #[test]
    fn test_two_attached_clusters_never_merge() {
        let mut uf = forest(4, 3);
        assert!(uf.union(NodeId(0), NodeId(1)).is_accepted());
        assert!(uf.union(NodeId(0), NodeId(2)).is_accepted());
        assert_eq!(
            uf.union(NodeId(1), NodeId(2)),
            UnionOutcome::Rejected(Rejection::RootAlreadyAttached)
        );
    }

    #[test]
    fn test_root_capacity_check_uses_cluster_demand() {
        let g = GraphBuilder::new(3, 2).demand(1, 2).build().unwrap();
        let mut uf = CapacitatedUnionFind::new(&g);
        assert_eq!(
            uf.union(NodeId(1), NodeId(2)),
            UnionOutcome::Rejected(Rejection::CapacityExceeded)
        );
        // Root demand is zero, so a full cluster can still attach
        assert!(uf.union(NodeId(1), NodeId(0)).is_accepted());
    }

    proptest! {
        #[test]
        fn test_representatives_are_fixed_points(
            n in 2usize..24,
            capacity in 1usize..8,
            pairs in prop::collection::vec((0usize..24, 0usize..24), 0..64)
        ) {
            let mut uf = forest(n, capacity);
            let mut merges = 0;
            for (a, b) in pairs {
                let (a, b) = (NodeId(a % n), NodeId(b % n));
                if let UnionOutcome::Merged { .. } = uf.union(a, b) {
                    merges += 1;
                }
            }

            let mut reps = std::collections::HashSet::new();
            for x in 1..n {
                let rep = uf.find(NodeId(x));
                prop_assert_eq!(uf.find(rep), rep);
                prop_assert!(uf.cluster_size(rep) <= capacity);
                reps.insert(rep);
            }
            prop_assert_eq!(reps.len(), n - 1 - merges);
            prop_assert_eq!(uf.clusters(), n - 1 - merges);
        }
    }
}
