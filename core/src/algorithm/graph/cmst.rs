//! Capacitated Minimum Spanning Tree front end
//!
//! [`CapacitatedSpanningTree`] selects one of the two solvers from its
//! configuration, runs it, and optionally validates the result against the
//! graph before handing it back.
//!
//! Configuration is available both as a typed [`CmstConfig`] (serde-ready, so
//! callers can load it from any format they like) and through the string
//! parameter interface shared with the rest of the algorithm framework:
//!
//! | parameter         | values                      | default         |
//! |-------------------|-----------------------------|-----------------|
//! | `algorithm`       | `kruskal`, `esau-williams`  | `esau-williams` |
//! | `validate_result` | `true`, `false`             | `true`          |
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::esau_williams::EsauWilliams;
use crate::algorithm::graph::kruskal::ModifiedKruskal;
use crate::algorithm::graph::solution::{validate_solution, CmstSolution};
use crate::algorithm::traits::{CapacitatedSolver, CmstAlgorithm, CmstError, SolverStatistics};
use crate::data_structures::graph::Graph;

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmstConfig {
    pub algorithm: CmstAlgorithm,
    /// Check every result with [`validate_solution`] before returning it
    pub validate_result: bool,
}

impl Default for CmstConfig {
    fn default() -> Self {
        Self {
            algorithm: CmstAlgorithm::default(),
            validate_result: true,
        }
    }
}

/// Capacitated minimum spanning tree with configurable solver
#[derive(Debug, Clone, Default)]
pub struct CapacitatedSpanningTree {
    config: CmstConfig,
    statistics: SolverStatistics,
}

impl CapacitatedSpanningTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CmstConfig) -> Self {
        Self {
            config,
            statistics: SolverStatistics::default(),
        }
    }

    pub fn config(&self) -> &CmstConfig {
        &self.config
    }

    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), CmstError> {
        match name {
            "algorithm" => {
                self.config.algorithm = match value {
                    "kruskal" => CmstAlgorithm::ModifiedKruskal,
                    "esau-williams" => CmstAlgorithm::EsauWilliams,
                    _ => {
                        return Err(CmstError::InvalidParameter {
                            name: name.to_string(),
                            reason: format!(
                                "unknown algorithm {}; valid options: kruskal, esau-williams",
                                value
                            ),
                        })
                    }
                };
                Ok(())
            }
            "validate_result" => {
                self.config.validate_result =
                    value.parse().map_err(|_| CmstError::InvalidParameter {
                        name: name.to_string(),
                        reason: format!("invalid boolean value: {}. Use 'true' or 'false'", value),
                    })?;
                Ok(())
            }
            _ => Err(CmstError::InvalidParameter {
                name: name.to_string(),
                reason: "valid parameters: algorithm, validate_result".to_string(),
            }),
        }
    }

    pub fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "algorithm" => Some(self.config.algorithm.as_str().to_string()),
            "validate_result" => Some(self.config.validate_result.to_string()),
            _ => None,
        }
    }

    pub fn get_parameters(&self) -> HashMap<String, String> {
        ["algorithm", "validate_result"]
            .into_iter()
            .filter_map(|name| self.get_parameter(name).map(|v| (name.to_string(), v)))
            .collect()
    }
}

impl CapacitatedSolver for CapacitatedSpanningTree {
    fn name(&self) -> &'static str {
        "Capacitated Minimum Spanning Tree"
    }

    fn algorithm(&self) -> CmstAlgorithm {
        self.config.algorithm
    }

    fn solve(&mut self, graph: &Graph) -> Result<CmstSolution, CmstError> {
        debug!("Solving with {}", self.config.algorithm);
        let solution = match self.config.algorithm {
            CmstAlgorithm::ModifiedKruskal => ModifiedKruskal::new().solve(graph),
            CmstAlgorithm::EsauWilliams => EsauWilliams::new().solve(graph),
        }?;
        self.statistics = solution.statistics.clone();

        if self.config.validate_result {
            validate_solution(graph, &solution)?;
        }
        Ok(solution)
    }

    fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}
