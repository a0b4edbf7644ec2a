use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::PlacementError;
use crate::model::{Node, NodeId, ServerTemplate, Workload};

/// Multidimensional First-Fit-Decreasing.
///
/// Workloads are ordered by descending [`Workload::weight`] (stable, so equal
/// weights keep their input order) and each one goes to the first node, in
/// creation order, that fits it in every dimension. When none does, a fresh
/// node is cloned from `template`. Node ids start at 1.
pub fn solve_ffd(
    workloads: &[Workload],
    template: &ServerTemplate,
) -> Result<Vec<Node>, PlacementError> {
    check_placeable(workloads, template)?;

    let mut sorted: Vec<Workload> = workloads.to_vec();
    sorted.sort_by(|a, b| b.weight().total_cmp(&a.weight()));

    let mut nodes: Vec<Node> = Vec::new();
    let mut next_id: NodeId = 1;

    for workload in sorted {
        if let Some(node) = nodes.iter_mut().find(|n| n.can_fit(&workload)) {
            let placed = node.add_workload(workload);
            debug_assert!(placed);
            continue;
        }

        let mut node = Node::new(next_id, template);
        next_id += 1;
        let placed = node.add_workload(workload);
        debug_assert!(placed, "placeability was checked up front");
        debug!(node = node.id(), workload = workload.id, "opened new node");
        nodes.push(node);
    }

    info!(
        workloads = workloads.len(),
        nodes = nodes.len(),
        "first-fit-decreasing placement complete"
    );

    Ok(nodes)
}

/// Rejects inputs that could never be placed: a workload larger than an empty
/// server in some dimension, or a repeated workload id.
fn check_placeable(workloads: &[Workload], template: &ServerTemplate) -> Result<(), PlacementError> {
    let mut seen = HashSet::with_capacity(workloads.len());
    for workload in workloads {
        if !seen.insert(workload.id) {
            return Err(PlacementError::DuplicateWorkload(workload.id));
        }
        if let Some(dimension) = workload.demand.first_exceeding(&template.capacity) {
            return Err(PlacementError::Unplaceable {
                workload: workload.id,
                dimension,
                demand: workload.demand.component(dimension),
                capacity: template.capacity.component(dimension),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimension, ResourceVector};

    fn template() -> ServerTemplate {
        ServerTemplate::new(ResourceVector::new(80.0, 64.0, 5000.0, 10.0))
    }

    fn workload(id: u32, cpu: f64, ram: f64) -> Workload {
        Workload::new(id, ResourceVector::new(cpu, ram, 100.0, 1.0))
    }

    #[test]
    fn oversized_workload_is_reported() {
        let workloads = vec![workload(1, 10.0, 1.0), workload(2, 90.0, 1.0)];
        let err = solve_ffd(&workloads, &template()).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Unplaceable {
                workload: 2,
                dimension: Dimension::Cpu,
                demand: 90.0,
                capacity: 80.0,
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let workloads = vec![workload(1, 10.0, 1.0), workload(1, 20.0, 1.0)];
        assert_eq!(
            solve_ffd(&workloads, &template()).unwrap_err(),
            PlacementError::DuplicateWorkload(1)
        );
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        assert!(solve_ffd(&[], &template()).unwrap().is_empty());
    }

    #[test]
    fn largest_workloads_are_placed_first() {
        let workloads = vec![
            workload(1, 10.0, 1.0),
            workload(2, 50.0, 1.0),
            workload(3, 40.0, 1.0),
            workload(4, 30.0, 1.0),
        ];
        let nodes = solve_ffd(&workloads, &template()).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id(), 1);
        assert_eq!(nodes[0].workload_ids(), vec![2, 4]);
        assert_eq!(nodes[1].id(), 2);
        assert_eq!(nodes[1].workload_ids(), vec![3, 1]);
    }

    #[test]
    fn equal_weights_keep_input_order() {
        let workloads = vec![
            workload(5, 20.0, 2.0),
            workload(3, 20.0, 2.0),
            workload(9, 20.0, 2.0),
        ];
        let nodes = solve_ffd(&workloads, &template()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].workload_ids(), vec![5, 3, 9]);
    }

    #[test]
    fn non_scored_dimensions_still_constrain_fit() {
        let workloads = vec![
            Workload::new(1, ResourceVector::new(5.0, 1.0, 100.0, 6.0)),
            Workload::new(2, ResourceVector::new(5.0, 1.0, 100.0, 6.0)),
        ];
        let nodes = solve_ffd(&workloads, &template()).unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn nodes_inherit_template_cost_tier() {
        let template = ServerTemplate {
            capacity: ResourceVector::new(80.0, 64.0, 5000.0, 10.0),
            cost_tier: 2.5,
        };
        let nodes = solve_ffd(&[workload(1, 10.0, 1.0)], &template).unwrap();
        assert_eq!(nodes[0].cost_tier(), 2.5);
        assert_eq!(*nodes[0].capacity(), template.capacity);
    }
}
