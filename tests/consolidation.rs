//! End-to-end properties of the two placement phases.

use binpack_optimizer::generator::{GeneratorSettings, WorkloadGenerator};
use binpack_optimizer::scheduler::verify_solution;
use binpack_optimizer::{
    solve_ffd, ConsolidationOptimizer, Node, OptimizerSettings, PlacementError, ResourceVector,
    ServerTemplate, Workload,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn template() -> ServerTemplate {
    ServerTemplate::new(
        ResourceVector::new(80.0, 64.0, 5000.0, 10.0)
            .with_gpu(4.0)
            .with_energy(1000.0),
    )
}

fn optimize(nodes: Vec<Node>, max_iterations: usize, seed: u64) -> Vec<Node> {
    let settings = OptimizerSettings {
        max_iterations,
        seed,
        ..OptimizerSettings::default()
    };
    ConsolidationOptimizer::new(settings, StdRng::seed_from_u64(seed))
        .optimize(nodes)
        .nodes
}

/// Integer-valued demands that always fit an empty template server.
fn arb_workloads() -> impl Strategy<Value = Vec<Workload>> {
    prop::collection::vec(
        (1u32..=80, 0u32..=64, 0u32..=5000, 0u32..=10, 0u32..=1),
        0..40,
    )
    .prop_map(|demands| {
        demands
            .into_iter()
            .enumerate()
            .map(|(i, (cpu, ram, iops, net_bw, gpu))| {
                let demand = ResourceVector::new(cpu.into(), ram.into(), iops.into(), net_bw.into())
                    .with_gpu(gpu.into())
                    .with_energy(f64::from(cpu) * 2.0 + f64::from(gpu) * 100.0);
                Workload::new(i as u32 + 1, demand)
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Scenario tests
// ---------------------------------------------------------------------------

#[test]
fn oversized_workload_is_a_configuration_error() {
    let template = ServerTemplate::new(ResourceVector::new(80.0, 64.0, 5000.0, 10.0));
    let workloads = vec![Workload::new(1, ResourceVector::new(90.0, 1.0, 10.0, 1.0))];
    assert!(matches!(
        solve_ffd(&workloads, &template),
        Err(PlacementError::Unplaceable { workload: 1, .. })
    ));
}

#[test]
fn generated_fleet_shrinks_and_stays_consistent() {
    let workloads = WorkloadGenerator::new(GeneratorSettings::default())
        .unwrap()
        .generate();
    let initial = solve_ffd(&workloads, &template()).unwrap();
    verify_solution(&initial, &workloads).unwrap();

    let outcome = ConsolidationOptimizer::new(OptimizerSettings::default(), StdRng::seed_from_u64(42))
        .optimize(initial.clone());

    verify_solution(&outcome.nodes, &workloads).unwrap();
    assert!(outcome.nodes.len() <= initial.len());
    assert_eq!(outcome.report.initial_nodes, initial.len());
    assert_eq!(outcome.report.final_nodes, outcome.nodes.len());
    assert!(outcome.report.iterations_run <= 50);
    assert!(!outcome.report.events.is_empty());
}

#[test]
fn construction_is_deterministic() {
    let workloads = WorkloadGenerator::new(GeneratorSettings::default())
        .unwrap()
        .generate();
    let a = solve_ffd(&workloads, &template()).unwrap();
    let b = solve_ffd(&workloads, &template()).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placement_conserves_and_respects_capacity(workloads in arb_workloads()) {
        let nodes = solve_ffd(&workloads, &template()).unwrap();
        prop_assert_eq!(verify_solution(&nodes, &workloads), Ok(()));
        prop_assert!(nodes.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn consolidation_never_grows_the_fleet(
        workloads in arb_workloads(),
        budget in 0usize..40,
        seed in any::<u64>(),
    ) {
        let initial = solve_ffd(&workloads, &template()).unwrap();
        let optimized = optimize(initial.clone(), budget, seed);

        prop_assert!(optimized.len() <= initial.len());
        prop_assert_eq!(verify_solution(&optimized, &workloads), Ok(()));
    }

    #[test]
    fn zero_budget_returns_input(workloads in arb_workloads(), seed in any::<u64>()) {
        let initial = solve_ffd(&workloads, &template()).unwrap();
        let optimized = optimize(initial.clone(), 0, seed);
        prop_assert_eq!(optimized, initial);
    }
}
