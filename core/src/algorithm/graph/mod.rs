//! Capacitated spanning tree algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod cmst;
pub mod esau_williams;
pub mod kruskal;
pub mod solution;

pub use self::cmst::{CapacitatedSpanningTree, CmstConfig};
pub use self::esau_williams::{
    solve_esau_williams, ClusterBook, Decision, DecisionRecord, EsauWilliams, Tradeoff,
    TradeoffTable,
};
pub use self::kruskal::{solve_kruskal, ModifiedKruskal};
pub use self::solution::{validate_solution, CmstSolution, RootBranch, SolutionEdge};
