//! gyre: asynchronous cellular automata on arbitrary graphs.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all gyre sub-crates. For most users, adding `gyre` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gyre::prelude::*;
//!
//! // A 5×5 torus with a horizontal blinker in the middle row.
//! let torus = Lattice::torus(5, 5)?;
//! let mut cells = vec![false; 25];
//! for col in 1..4 {
//!     cells[torus.index_of(2, col).unwrap().index()] = true;
//! }
//! let mut life = Automaton::new(false, Life::conway());
//! for cell in cells {
//!     life.add_node(cell);
//! }
//! life.wire_lattice(&torus)?;
//!
//! // Three sweeps (compute, settle, settle) make one generation.
//! for _ in 0..3 {
//!     life.step()?;
//! }
//! let centre_column = (1..4).all(|row| *life.current(torus.index_of(row, 2).unwrap()).unwrap());
//! assert!(centre_column);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gyre-core` | `NodeIndex`, error types, binary codec |
//! | [`pool`] | `gyre-pool` | Growth-only object pool and leases |
//! | [`graph`] | `gyre-graph` | Directed/undirected graphs, lattice wiring |
//! | [`engine`] | `gyre-engine` | Double-buffered cells, the automaton, worker pool |
//! | [`rules`] | `gyre-rules` | Life-like rules, logistic neurons, seeded boards |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Node identity, errors, and the binary codec (`gyre-core`).
pub use gyre_core as types;

/// Growth-only object pool (`gyre-pool`).
///
/// [`pool::Pool::acquire`] never blocks; a [`pool::Lease`] returns its
/// object when dropped.
pub use gyre_pool as pool;

/// Graphs and grid wiring (`gyre-graph`).
pub use gyre_graph as graph;

/// Phase-rotation engine (`gyre-engine`).
///
/// [`engine::Automaton::step`] sweeps on the calling thread;
/// [`engine::Automaton::step_async`] sweeps across a
/// [`engine::WorkerPool`] and returns a [`engine::PendingStep`] that the
/// caller waits on and installs.
pub use gyre_engine as engine;

/// Reference update rules (`gyre-rules`).
pub use gyre_rules as rules;

/// Common imports for typical gyre usage.
///
/// ```rust
/// use gyre::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gyre_core::{Codec, NodeIndex};

    // Errors
    pub use gyre_core::{FileFormatError, GraphError, RuleError};
    pub use gyre_engine::{ConfigError, StepError};

    // Graph
    pub use gyre_graph::{EdgeBehavior, Graph, Lattice};

    // Pool
    pub use gyre_pool::{Lease, Pool, Recycle};

    // Engine
    pub use gyre_engine::{
        from_fn, AsyncState, Automaton, Neighbors, PendingStep, Phase, StepMetrics, UpdateRule,
        WorkerConfig, WorkerPool,
    };

    // Rules
    pub use gyre_rules::{Life, Neuron, NeuronState};
}
