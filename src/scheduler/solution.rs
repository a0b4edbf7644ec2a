use std::collections::HashMap;

use crate::error::SolutionError;
use crate::model::{Dimension, Node, ResourceVector, Workload, WorkloadId};

pub fn workload_count(nodes: &[Node]) -> usize {
    nodes.iter().map(|n| n.workloads().len()).sum()
}

/// Fleet cost: one unit per node, scaled by its cost tier.
pub fn total_cost(nodes: &[Node]) -> f64 {
    nodes.iter().map(Node::cost_tier).sum()
}

/// Checks that `nodes` is a feasible placement of exactly `workloads`.
///
/// Every node's load must equal the sum of its demands and fit its capacity,
/// and every input workload must be assigned exactly once.
pub fn verify_solution(nodes: &[Node], workloads: &[Workload]) -> Result<(), SolutionError> {
    let mut seen: HashMap<WorkloadId, usize> = HashMap::with_capacity(workloads.len());

    for node in nodes {
        let expected = node
            .workloads()
            .iter()
            .fold(ResourceVector::zero(), |acc, w| acc + w.demand);
        let drift = expected - *node.load();
        if Dimension::ALL
            .into_iter()
            .any(|d| drift.component(d).abs() > 1e-6)
        {
            return Err(SolutionError::LoadMismatch(node.id()));
        }

        if let Some(dimension) = node.load().first_exceeding(node.capacity()) {
            return Err(SolutionError::CapacityExceeded {
                node: node.id(),
                dimension,
                load: node.load().component(dimension),
                capacity: node.capacity().component(dimension),
            });
        }

        for workload in node.workloads() {
            *seen.entry(workload.id).or_insert(0) += 1;
        }
    }

    for workload in workloads {
        match seen.remove(&workload.id) {
            None => return Err(SolutionError::MissingWorkload(workload.id)),
            Some(1) => {}
            Some(count) => {
                return Err(SolutionError::DuplicatedWorkload {
                    workload: workload.id,
                    count,
                })
            }
        }
    }

    match seen.into_keys().min() {
        Some(unknown) => Err(SolutionError::UnknownWorkload(unknown)),
        None => Ok(()),
    }
}
