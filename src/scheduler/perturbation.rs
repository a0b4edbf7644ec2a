use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::Serialize;

use crate::model::{Node, NodeId, WorkloadId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Relocation {
    pub workload: WorkloadId,
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exchange {
    pub first: WorkloadId,
    pub first_node: NodeId,
    pub second: WorkloadId,
    pub second_node: NodeId,
}

/// Moves one random workload to another node that can take it.
///
/// Sources are tried in random order, one random workload each, against the
/// remaining nodes in random order. Returns `None` when no pair works.
pub fn relocate<R: Rng + ?Sized>(nodes: &mut [Node], rng: &mut R) -> Option<Relocation> {
    let mut sources: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].is_empty()).collect();
    sources.shuffle(rng);

    for source in sources {
        let workload = *nodes[source].workloads().choose(rng)?;

        let mut targets: Vec<usize> = (0..nodes.len()).filter(|&i| i != source).collect();
        targets.shuffle(rng);

        let Some(target) = targets.into_iter().find(|&t| nodes[t].can_fit(&workload)) else {
            continue;
        };

        let Some(removed) = nodes[source].remove_workload(workload.id) else {
            continue;
        };
        if !nodes[target].add_workload(removed) {
            let restored = nodes[source].add_workload(removed);
            debug_assert!(restored);
            continue;
        }

        return Some(Relocation {
            workload: workload.id,
            from: nodes[source].id(),
            to: nodes[target].id(),
        });
    }

    None
}

/// Exchanges one workload between two random non-empty nodes, trying up to
/// `attempts` random pairs.
pub fn swap<R: Rng + ?Sized>(nodes: &mut [Node], rng: &mut R, attempts: usize) -> Option<Exchange> {
    let occupied: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].is_empty()).collect();
    if occupied.len() < 2 {
        return None;
    }

    let picked = index::sample(rng, occupied.len(), 2);
    let (a, b) = (occupied[picked.index(0)], occupied[picked.index(1)]);

    for _ in 0..attempts {
        let first = nodes[a].workloads().choose(rng)?.id;
        let second = nodes[b].workloads().choose(rng)?.id;

        if try_swap(nodes, a, b, first, second) {
            return Some(Exchange {
                first,
                first_node: nodes[a].id(),
                second,
                second_node: nodes[b].id(),
            });
        }
    }

    None
}

/// Exchanges `first` (on `nodes[a]`) with `second` (on `nodes[b]`) if each
/// node can take the other's workload once its own is gone.
///
/// The four mutations run on copies of the two nodes and are written back
/// only when all of them succeed.
pub fn try_swap(
    nodes: &mut [Node],
    a: usize,
    b: usize,
    first: WorkloadId,
    second: WorkloadId,
) -> bool {
    if a == b || a >= nodes.len() || b >= nodes.len() {
        return false;
    }

    let lookup = |node: &Node, id: WorkloadId| node.workloads().iter().copied().find(|w| w.id == id);
    let (Some(t1), Some(t2)) = (lookup(&nodes[a], first), lookup(&nodes[b], second)) else {
        return false;
    };

    if !nodes[a].admits_in_place_of(&t1, &t2) || !nodes[b].admits_in_place_of(&t2, &t1) {
        return false;
    }

    let mut node_a = nodes[a].clone();
    let mut node_b = nodes[b].clone();
    let committed = node_a.remove_workload(t1.id).is_some()
        && node_b.remove_workload(t2.id).is_some()
        && node_a.add_workload(t2)
        && node_b.add_workload(t1);
    if !committed {
        return false;
    }

    nodes[a] = node_a;
    nodes[b] = node_b;
    true
}
