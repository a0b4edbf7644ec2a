pub mod consolidation;
pub mod perturbation;
pub mod placement;
pub mod solution;

pub use consolidation::{
    ConsolidationOptimizer, ConsolidationOutcome, ConsolidationReport, IterationEvent, OptimizerSettings,
};
pub use placement::solve_ffd;
pub use solution::{total_cost, verify_solution, workload_count};
