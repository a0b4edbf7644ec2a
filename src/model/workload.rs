use serde::{Deserialize, Serialize};
use std::fmt;

use super::resources::ResourceVector;

pub type WorkloadId = u32;

/// An identified resource demand. Identity is the id, not the demand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Workload {
    pub id: WorkloadId,
    pub demand: ResourceVector,
}

impl Workload {
    pub fn new(id: WorkloadId, demand: ResourceVector) -> Self {
        Self { id, demand }
    }

    /// Sort key for first-fit-decreasing: CPU first, RAM as the secondary pressure.
    pub fn weight(&self) -> f64 {
        self.demand.cpu * 0.6 + self.demand.ram * 0.4
    }
}

impl PartialEq for Workload {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Workload {}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T{} {}]", self.id, self.demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id() {
        let a = Workload::new(7, ResourceVector::new(10.0, 1.0, 0.0, 0.0));
        let b = Workload::new(7, ResourceVector::new(99.0, 9.0, 0.0, 0.0));
        let c = Workload::new(8, ResourceVector::new(10.0, 1.0, 0.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn weight_blends_cpu_and_ram() {
        let w = Workload::new(1, ResourceVector::new(10.0, 20.0, 500.0, 2.0));
        assert!((w.weight() - 14.0).abs() < 1e-9);
    }
}
