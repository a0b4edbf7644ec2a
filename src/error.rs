use thiserror::Error;

use crate::model::{Dimension, NodeId, WorkloadId};

#[derive(Error, Debug, PartialEq)]
pub enum PlacementError {
    #[error("Workload {workload} is unplaceable: {dimension} demand {demand} exceeds server capacity {capacity}")]
    Unplaceable {
        workload: WorkloadId,
        dimension: Dimension,
        demand: f64,
        capacity: f64,
    },

    #[error("Workload id {0} appears more than once in the input")]
    DuplicateWorkload(WorkloadId),
}

#[derive(Error, Debug, PartialEq)]
pub enum SolutionError {
    #[error("Node {node} exceeds capacity in {dimension}: load {load}, capacity {capacity}")]
    CapacityExceeded {
        node: NodeId,
        dimension: Dimension,
        load: f64,
        capacity: f64,
    },

    #[error("Node {0} load does not match the sum of its workloads")]
    LoadMismatch(NodeId),

    #[error("Workload {0} is missing from the solution")]
    MissingWorkload(WorkloadId),

    #[error("Workload {workload} is assigned {count} times")]
    DuplicatedWorkload { workload: WorkloadId, count: usize },

    #[error("Workload {0} is not part of the input")]
    UnknownWorkload(WorkloadId),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
