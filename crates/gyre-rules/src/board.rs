//! Seeded boards and lattice-wired automata.
//!
//! Each board owns its own generator, seeded explicitly, so the same
//! seed always produces the same board. Nothing here touches a global
//! random source.

use std::error::Error;
use std::fmt;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use gyre_core::GraphError;
use gyre_engine::{Automaton, UpdateRule};
use gyre_graph::{Lattice, LatticeError};

/// Errors from building a board.
#[derive(Debug, PartialEq)]
pub enum BoardError {
    /// `density` is not a probability.
    InvalidDensity {
        /// The rejected value.
        density: f64,
    },
    /// The board does not match the lattice it is placed on.
    SizeMismatch {
        /// Cells in the lattice.
        expected: usize,
        /// Cells supplied.
        found: usize,
    },
    /// The lattice dimensions are invalid.
    Lattice(LatticeError),
    /// Wiring the lattice failed.
    Graph(GraphError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDensity { density } => {
                write!(f, "density {density} is outside [0, 1]")
            }
            Self::SizeMismatch { expected, found } => {
                write!(f, "board has {found} cells, lattice has {expected}")
            }
            Self::Lattice(e) => write!(f, "lattice: {e}"),
            Self::Graph(e) => write!(f, "graph: {e}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            Self::Graph(e) => Some(e),
            Self::InvalidDensity { .. } | Self::SizeMismatch { .. } => None,
        }
    }
}

impl From<LatticeError> for BoardError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<GraphError> for BoardError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// A `rows × cols` board, row-major, where each cell is alive with
/// probability `density`.
pub fn seeded_board(rows: u32, cols: u32, density: f64, seed: u64) -> Result<Vec<bool>, BoardError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(BoardError::InvalidDensity { density });
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = rows as usize * cols as usize;
    Ok((0..cells).map(|_| rng.random_bool(density)).collect())
}

/// An automaton over `lattice` with cell `i` starting at `cells[i]`.
pub fn lattice_automaton<T, R>(
    lattice: &Lattice,
    cells: Vec<T>,
    rule: R,
) -> Result<Automaton<T, R>, BoardError>
where
    T: Clone,
    R: UpdateRule<T>,
{
    if cells.len() != lattice.cell_count() {
        return Err(BoardError::SizeMismatch {
            expected: lattice.cell_count(),
            found: cells.len(),
        });
    }
    let mut automaton = Automaton::new(false, rule);
    for cell in cells {
        automaton.add_node(cell);
    }
    automaton.wire_lattice(lattice)?;
    Ok(automaton)
}

/// Draw a boolean board as text: `#` alive, `.` dead, one line per row.
pub fn render<'a>(cells: impl IntoIterator<Item = &'a bool>, cols: u32) -> String {
    let cols = cols.max(1) as usize;
    let mut out = String::new();
    for (i, alive) in cells.into_iter().enumerate() {
        if i > 0 && i % cols == 0 {
            out.push('\n');
        }
        out.push(if *alive { '#' } else { '.' });
    }
    out
}
