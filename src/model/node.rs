use serde::{Deserialize, Serialize};
use std::fmt;

use super::resources::ResourceVector;
use super::workload::{Workload, WorkloadId};

pub type NodeId = u32;

/// Capacity every node is cloned from, plus its FinOps cost multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerTemplate {
    pub capacity: ResourceVector,
    pub cost_tier: f64,
}

impl ServerTemplate {
    pub fn new(capacity: ResourceVector) -> Self {
        Self {
            capacity,
            cost_tier: 1.0,
        }
    }
}

/// A capacity-bounded server holding zero or more workloads.
///
/// `load` is only touched by [`Node::add_workload`] and [`Node::remove_workload`],
/// so it always equals the sum of the assigned demands and always fits `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    capacity: ResourceVector,
    cost_tier: f64,
    load: ResourceVector,
    assigned: Vec<Workload>,
}

impl Node {
    pub fn new(id: NodeId, template: &ServerTemplate) -> Self {
        Self {
            id,
            capacity: template.capacity,
            cost_tier: template.cost_tier,
            load: ResourceVector::zero(),
            assigned: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn capacity(&self) -> &ResourceVector {
        &self.capacity
    }

    pub fn cost_tier(&self) -> f64 {
        self.cost_tier
    }

    pub fn load(&self) -> &ResourceVector {
        &self.load
    }

    pub fn workloads(&self) -> &[Workload] {
        &self.assigned
    }

    pub fn workload_ids(&self) -> Vec<WorkloadId> {
        self.assigned.iter().map(|w| w.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn contains(&self, id: WorkloadId) -> bool {
        self.assigned.iter().any(|w| w.id == id)
    }

    pub fn can_fit(&self, workload: &Workload) -> bool {
        (self.load + workload.demand).fits_in(&self.capacity)
    }

    /// Places `workload` if it fits. Returns `false` and leaves the node
    /// untouched otherwise.
    #[must_use]
    pub fn add_workload(&mut self, workload: Workload) -> bool {
        if !self.can_fit(&workload) {
            return false;
        }
        self.load += workload.demand;
        self.assigned.push(workload);
        true
    }

    /// Removes the workload with the given id, if it is assigned here.
    pub fn remove_workload(&mut self, id: WorkloadId) -> Option<Workload> {
        let index = self.assigned.iter().position(|w| w.id == id)?;
        let workload = self.assigned.remove(index);
        self.load -= workload.demand;
        Some(workload)
    }

    pub fn remaining_capacity(&self) -> ResourceVector {
        self.capacity - self.load
    }

    /// Mean of CPU and RAM fill ratios. Other dimensions take part in fitting
    /// but not in this ranking key. A zero-capacity dimension counts as 0.
    pub fn utilization_score(&self) -> f64 {
        let ratio = |load: f64, capacity: f64| {
            if capacity > 0.0 {
                load / capacity
            } else {
                0.0
            }
        };
        (ratio(self.load.cpu, self.capacity.cpu) + ratio(self.load.ram, self.capacity.ram)) / 2.0
    }

    /// Whether `outgoing` (assigned here) could be exchanged for `incoming`
    /// without exceeding capacity, judged against the room left once
    /// `outgoing` is gone.
    pub fn admits_in_place_of(&self, outgoing: &Workload, incoming: &Workload) -> bool {
        let room = self.remaining_capacity() + outgoing.demand;
        incoming.demand.fits_in(&room)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S{} [Tier:{}] | Load: {} | Tasks: {}",
            self.id,
            self.cost_tier,
            self.load,
            self.assigned.len()
        )
    }
}
