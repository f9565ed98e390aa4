//! Graph storage for gyre automata.
//!
//! [`Graph`] is an ordered node store indexed by a permanent
//! [`NodeIndex`](gyre_core::NodeIndex) plus one insertion-ordered,
//! duplicate-free adjacency list per node. Undirected graphs keep every
//! edge mirrored. [`Lattice`] wires a graph as a 2D grid with the eight
//! compass neighbours, optionally wrapping into a torus.
//!
//! # Format
//!
//! ```text
//! [version i32] [directed u8] [nodes: u32 n, T × n] [edges: u32 n, (u32 k, u32 × k) × n]
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod edge;
pub mod graph;
pub mod lattice;

pub use edge::EdgeBehavior;
pub use graph::Graph;
pub use lattice::{Lattice, LatticeError};
