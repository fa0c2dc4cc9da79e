//! Graph storage and disjoint-set structures
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod union_find;

pub use self::graph::{Edge, EdgeStatus, Graph, GraphBuilder, VertexRecord, Weight};
pub use self::union_find::{CapacitatedUnionFind, Rejection, UnionOutcome};
