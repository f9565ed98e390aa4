//! Conway's Life on a torus, stepped synchronously and in parallel.
//!
//! Run with `RUST_LOG=gyre_engine=debug` to see per-sweep events.

use gyre_engine::{WorkerConfig, WorkerPool};
use gyre_graph::Lattice;
use gyre_rules::{lattice_automaton, render, seeded_board, Life};
use tracing_subscriber::EnvFilter;

const SIDE: u32 = 24;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let torus = Lattice::torus(SIDE, SIDE)?;
    let cells = seeded_board(SIDE, SIDE, 0.3, 2024)?;
    let mut sync = lattice_automaton(&torus, cells.clone(), Life::conway())?;
    let mut parallel = lattice_automaton(&torus, cells, Life::conway())?;
    let workers = WorkerPool::new(&WorkerConfig::default())?;
    tracing::info!(workers = workers.worker_count(), cells = sync.len(), "starting");

    println!("generation 0\n{}\n", render(sync.currents(), SIDE));

    for generation in 1..=20 {
        for _ in 0..3 {
            sync.step()?;
            parallel.post_step_async(parallel.step_async(&workers))?;
        }
        let alive = sync.currents().filter(|c| **c).count();
        tracing::info!(generation, alive, "generation complete");

        if sync.graph() != parallel.graph() {
            return Err("parallel sweep diverged from synchronous sweep".into());
        }
        if generation % 5 == 0 {
            println!("generation {generation}\n{}\n", render(sync.currents(), SIDE));
        }
    }

    let mut saved = Vec::new();
    sync.save(&mut saved)?;
    println!("saved {} cells in {} bytes", sync.len(), saved.len());
    Ok(())
}
