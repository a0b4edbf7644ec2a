use chrono::{DateTime, Utc};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

use crate::model::{Node, NodeId, ResourceVector, ServerTemplate, Workload, WorkloadId};
use crate::scheduler::{total_cost, ConsolidationReport, IterationEvent};

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub utilization: f64,
    pub load: ResourceVector,
    pub workloads: Vec<WorkloadId>,
}

impl NodeSummary {
    fn from_node(node: &Node) -> Self {
        Self {
            id: node.id(),
            utilization: node.utilization_score(),
            load: *node.load(),
            workloads: node.workload_ids(),
        }
    }
}

/// Before/after summary of one placement run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub workload_count: usize,
    pub total_cpu_demand: f64,
    pub total_ram_demand: f64,
    pub template: ServerTemplate,
    pub initial_nodes: usize,
    pub final_nodes: usize,
    pub nodes_saved: usize,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub mean_utilization: f64,
    pub utilization_std_dev: f64,
    pub initial_placement: Vec<NodeSummary>,
    pub final_placement: Vec<NodeSummary>,
    pub events: Vec<IterationEvent>,
}

impl RunReport {
    pub fn new(
        workloads: &[Workload],
        template: &ServerTemplate,
        initial: &[Node],
        final_nodes: &[Node],
        consolidation: &ConsolidationReport,
    ) -> Self {
        let scores: Vec<f64> = final_nodes.iter().map(Node::utilization_score).collect();
        let (mean_utilization, utilization_std_dev) = match scores.len() {
            0 => (0.0, 0.0),
            1 => (scores[0], 0.0),
            _ => (scores.iter().mean(), scores.iter().std_dev()),
        };

        let mut final_placement: Vec<NodeSummary> =
            final_nodes.iter().map(NodeSummary::from_node).collect();
        final_placement.sort_by_key(|n| n.id);

        Self {
            generated_at: Utc::now(),
            workload_count: workloads.len(),
            total_cpu_demand: workloads.iter().map(|w| w.demand.cpu).sum(),
            total_ram_demand: workloads.iter().map(|w| w.demand.ram).sum(),
            template: *template,
            initial_nodes: initial.len(),
            final_nodes: final_nodes.len(),
            nodes_saved: initial.len().saturating_sub(final_nodes.len()),
            initial_cost: total_cost(initial),
            final_cost: total_cost(final_nodes),
            mean_utilization,
            utilization_std_dev,
            initial_placement: initial.iter().map(NodeSummary::from_node).collect(),
            final_placement,
            events: consolidation.events.clone(),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);

        writeln!(f, "Total workloads: {}", self.workload_count)?;
        writeln!(f, "Capacity per server: {}", self.template.capacity)?;
        writeln!(
            f,
            "Total demand: CPU={}, RAM={}",
            self.total_cpu_demand, self.total_ram_demand
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "Phase 1 (multidimensional FFD): {} servers used",
            self.initial_nodes
        )?;
        for node in &self.initial_placement {
            writeln!(
                f,
                "  S{} | Load: {} | Tasks: {}",
                node.id,
                node.load,
                node.workloads.len()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Phase 2 (local search):")?;
        for event in &self.events {
            writeln!(f, "  {}", EventLine(event))?;
        }

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "COST OPTIMIZATION REPORT (MULTIDIMENSIONAL)")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Initial servers: {}", self.initial_nodes)?;
        writeln!(f, "Final servers after optimization: {}", self.final_nodes)?;
        writeln!(f, "Total savings: {} servers", self.nodes_saved)?;
        writeln!(
            f,
            "Fleet cost: {:.2} -> {:.2}",
            self.initial_cost, self.final_cost
        )?;
        writeln!(
            f,
            "Utilization: mean {:.2}, std dev {:.2}",
            self.mean_utilization, self.utilization_std_dev
        )?;
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "Final infrastructure state:")?;
        for node in &self.final_placement {
            writeln!(
                f,
                "  S{} [Score: {:.2}] | Load: {}",
                node.id, node.utilization, node.load
            )?;
        }
        Ok(())
    }
}

struct EventLine<'a>(&'a IterationEvent);

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            IterationEvent::Consolidated {
                iteration,
                node,
                score,
                moved,
            } => write!(
                f,
                "[Iteration {}] Server {} emptied (score {:.2}), {} tasks moved",
                iteration,
                node,
                score,
                moved.len()
            ),
            IterationEvent::Relocated {
                iteration,
                relocation,
            } => write!(
                f,
                "[Iteration {}] Perturbation (MOVE): T{} S{} -> S{}",
                iteration, relocation.workload, relocation.from, relocation.to
            ),
            IterationEvent::Swapped {
                iteration,
                exchange,
            } => write!(
                f,
                "[Iteration {}] Perturbation (SWAP): T{} (S{}) <-> T{} (S{})",
                iteration,
                exchange.first,
                exchange.first_node,
                exchange.second,
                exchange.second_node
            ),
            IterationEvent::TooTight { iteration } => write!(
                f,
                "[Iteration {}] Placement too tight, no perturbation possible",
                iteration
            ),
        }
    }
}
