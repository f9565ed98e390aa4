//! Asynchronous cellular-automaton engine over arbitrary graphs.
//!
//! Every node of a [`Graph`](gyre_graph::Graph) holds an [`AsyncState`]:
//! two buffers of the user's cell type plus a phase counter that cycles
//! compute → settle → settle. An [`Automaton`] drives the cycle with a
//! pluggable [`UpdateRule`], either on the calling thread
//! ([`Automaton::step`]) or across a [`WorkerPool`]
//! ([`Automaton::step_async`]).
//!
//! # Architecture
//!
//! ```text
//! Automaton<T, R>
//! ├── Arc<Graph<AsyncState<T>>>   published snapshot (copy-then-swap)
//! ├── Arc<R: UpdateRule<T>>       injected strategy
//! └── Arc<Pool<Vec<NodeIndex>>>   neighbour scratch lists
//!
//! step_async(&WorkerPool) ──► chunk jobs ──► PendingStep<T>
//!                                                 │ wait()
//!                                                 ▼
//!                            install(SweepOutcome<T>) ──► new snapshot
//! ```
//!
//! # Phase rotation
//!
//! A cell advances only when no neighbour sits one phase behind it,
//! which keeps adjacent cells within one step of each other in the
//! rotation. Three sweeps from a uniform start equal one generation of
//! a synchronous automaton.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod automaton;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rule;
pub mod state;
pub mod sweep;
pub mod worker;

pub use automaton::Automaton;
pub use config::{ConfigError, WorkerConfig};
pub use error::StepError;
pub use metrics::StepMetrics;
pub use rule::{from_fn, FnRule, Neighbors, UpdateRule};
pub use state::{AsyncState, Phase};
pub use sweep::{PendingStep, SweepOutcome};
pub use worker::WorkerPool;
