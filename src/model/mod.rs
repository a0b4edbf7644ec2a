pub mod node;
pub mod resources;
pub mod workload;

pub use node::{Node, NodeId, ServerTemplate};
pub use resources::{Dimension, ResourceVector};
pub use workload::{Workload, WorkloadId};
