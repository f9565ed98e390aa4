//! Reference update rules for gyre.
//!
//! - [`Life`]: Life-like outer-totalistic rules over `bool` cells
//!   (Conway's B3/S23 by default).
//! - [`Neuron`]: logistic units over [`NeuronState`] cells, each
//!   weighting its neighbours' activations.
//!
//! [`board`] builds seeded random boards and lattice-wired automata for
//! demos and benchmarks.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod board;
pub mod life;
pub mod neuron;

pub use board::{lattice_automaton, render, seeded_board, BoardError};
pub use life::Life;
pub use neuron::{Neuron, NeuronState};
