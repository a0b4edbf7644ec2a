use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::perturbation::{self, Exchange, Relocation};
use crate::model::{Node, NodeId, ResourceVector, WorkloadId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    pub max_iterations: usize,
    pub relocate_probability: f64,
    pub swap_attempts: usize,
    pub seed: u64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            relocate_probability: 0.6,
            swap_attempts: 5,
            seed: 42,
        }
    }
}

/// What happened in one optimizer iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IterationEvent {
    Consolidated {
        iteration: usize,
        node: NodeId,
        score: f64,
        moved: Vec<WorkloadId>,
    },
    Relocated {
        iteration: usize,
        #[serde(flatten)]
        relocation: Relocation,
    },
    Swapped {
        iteration: usize,
        #[serde(flatten)]
        exchange: Exchange,
    },
    /// Neither a relocation nor a swap was possible.
    TooTight { iteration: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidationReport {
    pub initial_nodes: usize,
    pub final_nodes: usize,
    pub nodes_saved: usize,
    pub iterations_run: usize,
    pub events: Vec<IterationEvent>,
}

#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub nodes: Vec<Node>,
    pub report: ConsolidationReport,
}

/// Trial re-placement of one node's workloads: target order plus, per
/// workload, the index (into `nodes`) it lands on.
struct Evacuation {
    order: Vec<usize>,
    moves: Vec<(WorkloadId, usize)>,
}

/// Iterated local search that empties lightly used nodes and perturbs the
/// placement (relocate or swap) when no node can be emptied.
///
/// The random source is injected so a seeded generator replays the same
/// perturbation sequence. `max_iterations` is a hard cap, not a convergence
/// criterion.
pub struct ConsolidationOptimizer<R: Rng> {
    settings: OptimizerSettings,
    rng: R,
}

impl<R: Rng> ConsolidationOptimizer<R> {
    pub fn new(settings: OptimizerSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    pub fn optimize(&mut self, mut nodes: Vec<Node>) -> ConsolidationOutcome {
        let initial_nodes = nodes.len();
        let mut events = Vec::new();
        let mut iterations_run = 0;

        info!(
            nodes = initial_nodes,
            max_iterations = self.settings.max_iterations,
            "starting consolidation"
        );

        for iteration in 1..=self.settings.max_iterations {
            nodes.sort_by(|a, b| a.utilization_score().total_cmp(&b.utilization_score()));
            if nodes.len() < 2 {
                break;
            }
            iterations_run = iteration;

            if let Some(event) = self.consolidate_one(&mut nodes, iteration) {
                events.push(event);
                continue;
            }

            events.push(self.perturb(&mut nodes, iteration));
        }

        let before_prune = nodes.len();
        nodes.retain(|n| !n.is_empty());
        if nodes.len() < before_prune {
            debug!(dropped = before_prune - nodes.len(), "dropped empty nodes");
        }

        let report = ConsolidationReport {
            initial_nodes,
            final_nodes: nodes.len(),
            nodes_saved: initial_nodes.saturating_sub(nodes.len()),
            iterations_run,
            events,
        };

        info!(
            initial = report.initial_nodes,
            remaining = report.final_nodes,
            saved = report.nodes_saved,
            iterations = report.iterations_run,
            "consolidation finished"
        );

        ConsolidationOutcome { nodes, report }
    }

    /// Tries candidates from least to most utilized and commits the first one
    /// whose workloads all fit elsewhere. `nodes` must already be sorted.
    fn consolidate_one(&self, nodes: &mut Vec<Node>, iteration: usize) -> Option<IterationEvent> {
        for candidate in 0..nodes.len() {
            let Some(plan) = plan_evacuation(nodes, candidate) else {
                continue;
            };

            let node = nodes[candidate].id();
            let score = nodes[candidate].utilization_score();
            let moved: Vec<WorkloadId> = plan.moves.iter().map(|(w, _)| *w).collect();
            commit_evacuation(nodes, candidate, plan);

            info!(iteration, node, score, "node emptied");
            return Some(IterationEvent::Consolidated {
                iteration,
                node,
                score,
                moved,
            });
        }
        None
    }

    fn perturb(&mut self, nodes: &mut [Node], iteration: usize) -> IterationEvent {
        if self.rng.gen_bool(self.settings.relocate_probability.clamp(0.0, 1.0)) {
            if let Some(relocation) = perturbation::relocate(nodes, &mut self.rng) {
                debug!(
                    iteration,
                    workload = relocation.workload,
                    from = relocation.from,
                    to = relocation.to,
                    "perturbation: relocate"
                );
                return IterationEvent::Relocated {
                    iteration,
                    relocation,
                };
            }
        }

        if let Some(exchange) = perturbation::swap(nodes, &mut self.rng, self.settings.swap_attempts) {
            debug!(
                iteration,
                first = exchange.first,
                second = exchange.second,
                first_node = exchange.first_node,
                second_node = exchange.second_node,
                "perturbation: swap"
            );
            return IterationEvent::Swapped { iteration, exchange };
        }

        debug!(iteration, "placement too tight to perturb");
        IterationEvent::TooTight { iteration }
    }
}

/// Simulates moving every workload off `nodes[candidate]` onto the others,
/// fullest first. Only the targets' loads are snapshotted; `nodes` is not
/// touched.
fn plan_evacuation(nodes: &[Node], candidate: usize) -> Option<Evacuation> {
    let mut order: Vec<usize> = (0..nodes.len()).filter(|&i| i != candidate).collect();
    order.sort_by(|&a, &b| {
        nodes[b]
            .utilization_score()
            .total_cmp(&nodes[a].utilization_score())
    });

    let mut loads: Vec<ResourceVector> = order.iter().map(|&i| *nodes[i].load()).collect();
    let mut moves = Vec::with_capacity(nodes[candidate].workloads().len());

    for workload in nodes[candidate].workloads() {
        let slot = order.iter().enumerate().position(|(slot, &i)| {
            (loads[slot] + workload.demand).fits_in(nodes[i].capacity())
        })?;
        loads[slot] += workload.demand;
        moves.push((workload.id, order[slot]));
    }

    Some(Evacuation { order, moves })
}

/// Applies a successful trial: the candidate disappears and the survivors
/// take the trial's target order.
fn commit_evacuation(nodes: &mut Vec<Node>, candidate: usize, plan: Evacuation) {
    let mut slots: Vec<Option<Node>> = std::mem::take(nodes).into_iter().map(Some).collect();
    let Some(mut emptied) = slots[candidate].take() else {
        return;
    };

    for (workload_id, target) in plan.moves {
        let (Some(workload), Some(node)) = (emptied.remove_workload(workload_id), slots[target].as_mut()) else {
            continue;
        };
        let placed = node.add_workload(workload);
        debug_assert!(placed, "trial and commit use the same arithmetic");
    }
    debug_assert!(emptied.is_empty());

    nodes.extend(plan.order.into_iter().filter_map(|i| slots[i].take()));
}
