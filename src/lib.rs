//! Multidimensional server consolidation: First-Fit-Decreasing construction
//! followed by local search with randomized relocate/swap perturbation.

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod report;
pub mod scheduler;

pub use config::Config;
pub use error::{ConfigError, PlacementError, SolutionError};
pub use model::{Dimension, Node, NodeId, ResourceVector, ServerTemplate, Workload, WorkloadId};
pub use scheduler::{solve_ffd, ConsolidationOptimizer, ConsolidationOutcome, OptimizerSettings};
