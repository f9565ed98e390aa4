//! Benchmark profiles for gyre.
//!
//! - [`reference_profile`]: 100x100 Life torus (10K cells)
//! - [`stress_profile`]: 316x316 Life torus (~100K cells)
//! - [`neuron_profile`]: random sparse network of logistic units

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gyre_core::{GraphError, NodeIndex};
use gyre_engine::Automaton;
use gyre_graph::Lattice;
use gyre_rules::{lattice_automaton, seeded_board, BoardError, Life, Neuron, NeuronState};

/// Initial live-cell density of the Life profiles.
pub const DENSITY: f64 = 0.35;

/// Build a 100x100 Life torus (10K cells) seeded from `seed`.
pub fn reference_profile(seed: u64) -> Result<Automaton<bool, Life>, BoardError> {
    life_torus(100, seed)
}

/// Build a 316x316 Life torus (~100K cells) seeded from `seed`.
pub fn stress_profile(seed: u64) -> Result<Automaton<bool, Life>, BoardError> {
    life_torus(316, seed)
}

fn life_torus(side: u32, seed: u64) -> Result<Automaton<bool, Life>, BoardError> {
    let lattice = Lattice::torus(side, side)?;
    let cells = seeded_board(side, side, DENSITY, seed)?;
    lattice_automaton(&lattice, cells, Life::conway())
}

/// Build a directed network of `units` neurons, each listening to
/// `fan_in` earlier-or-later units chosen by a fixed stride.
///
/// Deterministic: the same arguments always give the same network.
pub fn neuron_profile(
    units: usize,
    fan_in: usize,
) -> Result<Automaton<NeuronState, Neuron>, GraphError> {
    let mut ca = Automaton::new(true, Neuron::default());
    for i in 0..units {
        let weights = (0..fan_in)
            .map(|k| if (i + k) % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        ca.add_node(NeuronState::new((i % 7) as f64 / 7.0, 0.1, weights));
    }
    if units > 1 {
        for i in 0..units {
            for k in 1..=fan_in {
                let j = (i + k * 31) % units;
                if j != i {
                    ca.add_edge(NodeIndex(i), NodeIndex(j))?;
                }
            }
        }
    }
    Ok(ca)
}
