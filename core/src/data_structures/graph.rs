//! Graph store for capacitated spanning tree computation
//!
//! This module implements an arena-backed undirected graph with a designated
//! root vertex and a per-branch capacity bound. Vertices and edges live in flat
//! vectors addressed by [`NodeId`] and [`EdgeId`]; every edge is stored exactly
//! once and referenced by index from both endpoints' adjacency lists.
//!
//! # Lifecycle
//! A [`Graph`] is assembled once through [`GraphBuilder`] and never structurally
//! mutated afterwards. Solvers keep their own scratch state (edge statuses,
//! union-find forests, tradeoff tables), so the same graph may be solved any
//! number of times.
//!
//! # Invariants
//! - `0 <= from, to < vertex_count` and `from != to` for every edge
//! - Adjacency lists are ordered by `(weight, edge id)` ascending
//! - The root has demand 0, every other vertex has demand in `1..=capacity`
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{CmstError, EdgeId, NodeId};

/// Edge cost. Non-negative by construction.
pub type Weight = i64;

/// Processing state of an edge during a solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeStatus {
    /// Not yet considered
    Unprocessed,
    /// Included in the tree
    Used,
    /// Rejected, or superseded by a cheaper link
    Discard,
}

impl Default for EdgeStatus {
    fn default() -> Self {
        EdgeStatus::Unprocessed
    }
}

/// Undirected weighted edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}

impl Edge {
    /// Endpoint opposite to `u`
    #[inline]
    pub fn other(&self, u: NodeId) -> NodeId {
        if self.from == u {
            self.to
        } else {
            self.from
        }
    }

    #[inline]
    pub fn touches(&self, u: NodeId) -> bool {
        self.from == u || self.to == u
    }

    /// Total order used by every solver: weight first, insertion order second
    #[inline]
    pub fn sort_key(&self) -> (Weight, EdgeId) {
        (self.weight, self.id)
    }
}

/// Per-vertex record: identity, demand and incident edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexRecord {
    pub label: NodeId,
    /// Capacity consumed by this vertex; 0 for the root
    pub demand: usize,
    adjacency: Vec<EdgeId>,
}

impl VertexRecord {
    /// Incident edges, cheapest first
    pub fn adjacency(&self) -> &[EdgeId] {
        &self.adjacency
    }

    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}

/// Immutable undirected graph with a root and a capacity bound
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    vertices: Vec<VertexRecord>,
    edges: Vec<Edge>,
    root: NodeId,
    capacity: usize,
}

impl Graph {
    /// Build a graph rooted at vertex 0 from `(u, v, weight)` triples
    ///
    /// Edge ids follow the order of `edges`.
    pub fn from_edge_list(
        vertex_count: usize,
        capacity: usize,
        edges: &[(usize, usize, Weight)],
    ) -> Result<Self, CmstError> {
        GraphBuilder::new(vertex_count, capacity)
            .edges(edges.iter().copied())
            .build()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn is_root(&self, u: NodeId) -> bool {
        u == self.root
    }

    /// Maximum total demand of a branch hanging off the root
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn vertex(&self, u: NodeId) -> &VertexRecord {
        &self.vertices[u.as_usize()]
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.as_usize()]
    }

    #[inline]
    pub fn demand(&self, u: NodeId) -> usize {
        self.vertices[u.as_usize()].demand
    }

    /// Incident edges of `u`, ordered by `(weight, id)`
    #[inline]
    pub fn adjacency(&self, u: NodeId) -> &[EdgeId] {
        self.vertices[u.as_usize()].adjacency()
    }

    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every vertex except the root, in index order
    pub fn non_root_vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        let root = self.root;
        (0..self.vertices.len()).map(NodeId).filter(move |&u| u != root)
    }

    /// Edge ids sorted ascending by weight, ties by insertion order
    pub fn sorted_edges(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.edges.iter().map(|e| e.id).collect();
        ids.sort_by_key(|&id| self.edges[id.as_usize()].sort_key());
        ids
    }

    /// Direct root edges, cheapest first
    pub fn root_edges(&self) -> &[EdgeId] {
        self.adjacency(self.root)
    }

    /// Sum of all vertex demands
    pub fn total_demand(&self) -> usize {
        self.vertices.iter().map(|v| v.demand).sum()
    }
}

/// Incremental construction of a [`Graph`]
///
/// All validation happens in [`GraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    vertex_count: usize,
    capacity: usize,
    root: usize,
    edges: Vec<(usize, usize, Weight)>,
    demands: Vec<(usize, usize)>,
}

impl GraphBuilder {
    /// Start a graph with `vertex_count` vertices, root 0, and branch capacity `capacity`
    pub fn new(vertex_count: usize, capacity: usize) -> Self {
        Self {
            vertex_count,
            capacity,
            root: 0,
            edges: Vec::new(),
            demands: Vec::new(),
        }
    }

    /// Designate a root other than vertex 0
    pub fn root(mut self, root: usize) -> Self {
        self.root = root;
        self
    }

    pub fn edge(mut self, u: usize, v: usize, weight: Weight) -> Self {
        self.edges.push((u, v, weight));
        self
    }

    pub fn edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, Weight)>,
    {
        self.edges.extend(edges);
        self
    }

    /// Override the demand of a non-root vertex (default 1)
    pub fn demand(mut self, vertex: usize, demand: usize) -> Self {
        self.demands.push((vertex, demand));
        self
    }

    pub fn build(self) -> Result<Graph, CmstError> {
        let n = self.vertex_count;
        if self.capacity < 1 {
            return Err(CmstError::InvalidConfiguration(format!(
                "capacity must be at least 1, got {}",
                self.capacity
            )));
        }
        if n == 0 {
            return Err(CmstError::InvalidConfiguration(
                "graph has no vertices to designate as root".to_string(),
            ));
        }
        if self.root >= n {
            return Err(CmstError::InvalidNode(NodeId(self.root)));
        }

        let mut vertices: Vec<VertexRecord> = (0..n)
            .map(|i| VertexRecord {
                label: NodeId(i),
                demand: if i == self.root { 0 } else { 1 },
                adjacency: Vec::new(),
            })
            .collect();

        for &(vertex, demand) in &self.demands {
            if vertex >= n {
                return Err(CmstError::InvalidNode(NodeId(vertex)));
            }
            if vertex == self.root {
                return Err(CmstError::InvalidConfiguration(
                    "the root carries no demand".to_string(),
                ));
            }
            if demand < 1 || demand > self.capacity {
                return Err(CmstError::InvalidConfiguration(format!(
                    "demand {} of vertex {} outside 1..={}",
                    demand, vertex, self.capacity
                )));
            }
            vertices[vertex].demand = demand;
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        for (i, &(u, v, weight)) in self.edges.iter().enumerate() {
            if u >= n {
                return Err(CmstError::InvalidNode(NodeId(u)));
            }
            if v >= n {
                return Err(CmstError::InvalidNode(NodeId(v)));
            }
            if u == v {
                return Err(CmstError::InvalidConfiguration(format!(
                    "self-loop on vertex {}",
                    u
                )));
            }
            if weight < 0 {
                return Err(CmstError::InvalidConfiguration(format!(
                    "edge ({}, {}) has negative weight {}",
                    u, v, weight
                )));
            }
            let id = EdgeId(i);
            edges.push(Edge {
                id,
                from: NodeId(u),
                to: NodeId(v),
                weight,
            });
            vertices[u].adjacency.push(id);
            vertices[v].adjacency.push(id);
        }

        for vertex in &mut vertices {
            // Stable: equal weights keep insertion order
            vertex
                .adjacency
                .sort_by_key(|&id| edges[id.as_usize()].sort_key());
        }

        debug!(
            "Built graph: {} vertices, {} edges, root {}, capacity {}",
            n,
            edges.len(),
            self.root,
            self.capacity
        );

        Ok(Graph {
            vertices,
            edges,
            root: NodeId(self.root),
            capacity: self.capacity,
        })
    }
}
