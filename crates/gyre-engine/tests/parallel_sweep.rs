//! Parallel sweeps: agreement with the synchronous path, failure
//! propagation, and the explicit install step.

use gyre_core::NodeIndex;
use gyre_engine::{Automaton, ConfigError, StepError, WorkerConfig, WorkerPool};
use gyre_graph::Graph;
use gyre_test_utils::fixtures::{complete, ring, star};
use gyre_test_utils::{CountingRule, FailingRule, PanickingRule, SumRule};
use proptest::prelude::*;

fn pool(workers: usize, chunk_size: usize) -> WorkerPool {
    WorkerPool::new(&WorkerConfig {
        worker_count: Some(workers),
        chunk_size,
    })
    .unwrap()
}

fn arb_graph() -> impl Strategy<Value = Graph<u64>> {
    (1usize..40, any::<bool>()).prop_flat_map(|(n, directed)| {
        (
            prop::collection::vec(any::<u64>(), n),
            prop::collection::vec((0..n, 0..n), 0..n * 2),
        )
            .prop_map(move |(values, edges)| {
                let mut g = Graph::new(directed);
                for v in values {
                    g.add_node(v);
                }
                for (a, b) in edges {
                    g.add_edge(NodeIndex(a), NodeIndex(b)).unwrap();
                }
                g
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parallel_matches_synchronous(
        graph in arb_graph(),
        chunk_size in 1usize..9,
        sweeps in 1usize..10,
    ) {
        let workers = pool(3, chunk_size);
        let mut sync = Automaton::from_graph(graph.clone(), SumRule);
        let mut par = Automaton::from_graph(graph, SumRule);

        for _ in 0..sweeps {
            let expected = sync.step().unwrap();
            let got = par.post_step_async(par.step_async(&workers)).unwrap();
            prop_assert_eq!(sync.graph(), par.graph());
            prop_assert_eq!(expected.computed, got.computed);
            prop_assert_eq!(expected.settled, got.settled);
            prop_assert_eq!(expected.stalled, got.stalled);
            prop_assert_eq!(got.chunks, par.len().div_ceil(chunk_size));
        }
    }
}

#[test]
fn chunks_cover_every_cell_once() {
    let workers = pool(4, 7);
    let rule = CountingRule::default();
    let mut ca = Automaton::from_graph(ring(100, |i| i as u64), rule);

    let metrics = ca.post_step_async(ca.step_async(&workers)).unwrap();
    assert_eq!(metrics.chunks, 15);
    assert_eq!(metrics.computed, 100);
    assert_eq!(ca.rule().calls(), 100);
    assert!(ca.currents().enumerate().all(|(i, v)| *v == i as u64));
}

#[test]
fn nothing_installed_until_caller_installs() {
    let workers = pool(2, 4);
    let mut ca = Automaton::from_graph(complete(10, 1u64), SumRule);
    let before = ca.graph().clone();

    let pending = ca.step_async(&workers);
    // The automaton is still readable while the sweep runs.
    assert_eq!(*ca.graph(), before);
    let outcome = pending.wait().unwrap();
    assert_eq!(*ca.graph(), before);
    assert_eq!(outcome.nodes().len(), 10);
    assert_eq!(outcome.revision(), ca.revision());

    ca.install(outcome).unwrap();
    assert_ne!(*ca.graph(), before);
    assert_eq!(ca.sweeps(), 1);
}

#[test]
fn abandoned_sweep_leaves_automaton_untouched() {
    let workers = pool(2, 1);
    let mut ca = Automaton::from_graph(star(16, 2u64), SumRule);
    let before = ca.graph().clone();

    drop(ca.step_async(&workers));
    assert_eq!(*ca.graph(), before);

    // The automaton keeps working; the abandoned snapshot is not reused.
    ca.step().unwrap();
    assert_eq!(ca.sweeps(), 1);
}

#[test]
fn outdated_outcome_is_rejected() {
    let workers = pool(2, 2);
    let mut ca = Automaton::from_graph(ring(5, |_| 1u64), SumRule);

    let first = ca.step_async(&workers);
    let second = ca.step_async(&workers);
    let launched = ca.revision();

    ca.post_step_async(first).unwrap();
    let after_first = ca.graph().clone();

    let err = ca.post_step_async(second).unwrap_err();
    assert_eq!(
        err,
        StepError::StaleOutcome {
            launched_at: launched,
            current: launched + 1,
        }
    );
    assert_eq!(*ca.graph(), after_first);

    // Structural edits also invalidate in-flight sweeps.
    let pending = ca.step_async(&workers);
    ca.add_node(0);
    assert!(matches!(
        ca.post_step_async(pending),
        Err(StepError::StaleOutcome { .. })
    ));
}

#[test]
fn rule_failure_propagates_through_wait() {
    let workers = pool(3, 2);
    let mut ca = Automaton::from_graph(ring(9, |i| i as u64), FailingRule { at: 7 });
    let before = ca.graph().clone();

    let err = ca.post_step_async(ca.step_async(&workers)).unwrap_err();
    assert!(matches!(
        err,
        StepError::RuleFailed { node, .. } if node.0 >= 7
    ));
    assert_eq!(*ca.graph(), before);
    assert_eq!(ca.sweeps(), 0);
}

#[test]
fn panicking_rule_surfaces_as_worker_lost() {
    let workers = pool(2, 3);
    let mut ca = Automaton::from_graph(ring(9, |i| i as u64), PanickingRule { at: 4 });
    let before = ca.graph().clone();

    let err = ca.post_step_async(ca.step_async(&workers)).unwrap_err();
    assert_eq!(err, StepError::WorkerLost);
    assert_eq!(*ca.graph(), before);

    // Workers survive the panic and keep serving jobs.
    let mut healthy = Automaton::from_graph(ring(9, |_| 1u64), SumRule);
    healthy.post_step_async(healthy.step_async(&workers)).unwrap();
    assert_eq!(workers.worker_count(), 2);
}

#[test]
fn one_pool_serves_many_automata() {
    let workers = pool(4, 8);
    let mut a = Automaton::from_graph(ring(50, |i| i as u64), SumRule);
    let mut b = Automaton::from_graph(complete(12, 3u64), SumRule);

    let pa = a.step_async(&workers);
    let pb = b.step_async(&workers);
    b.post_step_async(pb).unwrap();
    a.post_step_async(pa).unwrap();
    assert_eq!((a.sweeps(), b.sweeps()), (1, 1));
}

#[test]
fn empty_automaton_sweeps_trivially() {
    let workers = pool(1, 4);
    let mut ca = Automaton::new(false, SumRule);
    let pending = ca.step_async(&workers);
    assert!(pending.is_finished());
    let metrics = ca.post_step_async(pending).unwrap();
    assert_eq!(metrics.chunks, 0);
    assert!(ca.is_empty());
}

#[test]
fn zero_chunk_size_is_rejected() {
    let err = WorkerPool::new(&WorkerConfig {
        worker_count: Some(1),
        chunk_size: 0,
    })
    .unwrap_err();
    assert_eq!(err, ConfigError::InvalidChunkSize);
}
