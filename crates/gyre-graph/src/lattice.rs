//! 2D grid wiring with the 8-connected (Moore) neighbourhood.

use std::fmt;

use smallvec::SmallVec;

use gyre_core::{GraphError, NodeIndex};

use crate::edge::{resolve_axis, EdgeBehavior};
use crate::graph::Graph;

/// All 8 offsets: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Errors from lattice construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// A lattice must have at least one row and one column.
    Empty,
    /// `rows * cols` does not fit in `usize`.
    TooLarge {
        /// Requested rows.
        rows: u32,
        /// Requested columns.
        cols: u32,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "lattice must have at least one cell"),
            Self::TooLarge { rows, cols } => {
                write!(f, "lattice {rows}x{cols} is too large to index")
            }
        }
    }
}

impl std::error::Error for LatticeError {}

/// A `rows × cols` grid laid out row-major over node indices.
///
/// Cell `(r, c)` is node `r * cols + c`. Neighbours are the eight
/// compass directions resolved under the lattice's [`EdgeBehavior`];
/// with [`EdgeBehavior::Wrap`] the grid is a torus and, for grids of at
/// least 3×3, every cell has exactly 8 distinct neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    rows: u32,
    cols: u32,
    edge: EdgeBehavior,
}

impl Lattice {
    /// Create a lattice. Fails if either dimension is zero.
    pub fn new(rows: u32, cols: u32, edge: EdgeBehavior) -> Result<Self, LatticeError> {
        if rows == 0 || cols == 0 {
            return Err(LatticeError::Empty);
        }
        (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(LatticeError::TooLarge { rows, cols })?;
        Ok(Self { rows, cols, edge })
    }

    /// Shorthand for a wrapping (toroidal) lattice.
    pub fn torus(rows: u32, cols: u32) -> Result<Self, LatticeError> {
        Self::new(rows, cols, EdgeBehavior::Wrap)
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Edge behaviour.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Node index of `(row, col)`, or `None` outside the grid.
    pub fn index_of(&self, row: u32, col: u32) -> Option<NodeIndex> {
        (row < self.rows && col < self.cols)
            .then(|| NodeIndex(row as usize * self.cols as usize + col as usize))
    }

    /// `(row, col)` of a node index, or `None` outside the grid.
    pub fn coord_of(&self, index: NodeIndex) -> Option<(u32, u32)> {
        (index.0 < self.cell_count()).then(|| {
            let cols = self.cols as usize;
            ((index.0 / cols) as u32, (index.0 % cols) as u32)
        })
    }

    /// The distinct neighbours of `index`, in compass order N, S, W, E,
    /// NW, NE, SW, SE with repeats dropped.
    ///
    /// Returns an empty list for an index outside the grid.
    pub fn neighbours(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut out = SmallVec::new();
        let Some((r, c)) = self.coord_of(index) else {
            return out;
        };
        for (dr, dc) in OFFSETS_8 {
            let nr = resolve_axis(i64::from(r) + dr, self.rows, self.edge);
            let nc = resolve_axis(i64::from(c) + dc, self.cols, self.edge);
            if let (Some(nr), Some(nc)) = (nr, nc) {
                let n = NodeIndex(nr as usize * self.cols as usize + nc as usize);
                if !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Add every lattice edge to `graph`.
    ///
    /// The graph must already hold at least [`cell_count`](Lattice::cell_count)
    /// nodes; cells map onto nodes `0..cell_count`.
    pub fn wire<T>(&self, graph: &mut Graph<T>) -> Result<(), GraphError> {
        if let Some(last) = self.cell_count().checked_sub(1) {
            graph.check(NodeIndex(last))?;
        }
        for i in 0..self.cell_count() {
            let from = NodeIndex(i);
            for to in self.neighbours(from) {
                graph.add_edge(from, to)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn at(l: &Lattice, r: u32, c: u32) -> NodeIndex {
        l.index_of(r, c).unwrap()
    }

    #[test]
    fn empty_lattice_rejected() {
        assert_eq!(Lattice::torus(0, 4), Err(LatticeError::Empty));
        assert_eq!(Lattice::torus(4, 0), Err(LatticeError::Empty));
    }

    #[test]
    fn torus_corner_wraps_both_axes() {
        let l = Lattice::torus(5, 5).unwrap();
        let n = l.neighbours(at(&l, 0, 0));
        assert_eq!(n.len(), 8);
        assert!(n.contains(&at(&l, 4, 4))); // NW wraps on both axes
        assert!(n.contains(&at(&l, 4, 0))); // N wraps
        assert!(n.contains(&at(&l, 0, 4))); // W wraps
    }

    #[test]
    fn absorb_corner_and_edge() {
        let l = Lattice::new(5, 5, EdgeBehavior::Absorb).unwrap();
        assert_eq!(l.neighbours(at(&l, 0, 0)).len(), 3);
        assert_eq!(l.neighbours(at(&l, 0, 2)).len(), 5);
        assert_eq!(l.neighbours(at(&l, 2, 2)).len(), 8);
    }

    #[test]
    fn clamp_corner_self_loops_once() {
        let l = Lattice::new(5, 5, EdgeBehavior::Clamp).unwrap();
        let corner = at(&l, 0, 0);
        let n = l.neighbours(corner);
        assert!(n.contains(&corner));
        assert_eq!(n.len(), 4);
    }

    #[test]
    fn tiny_torus_collapses_duplicates() {
        // On a 2x2 torus N and S are the same cell.
        let l = Lattice::torus(2, 2).unwrap();
        let n = l.neighbours(NodeIndex(0));
        assert_eq!(n.len(), 3);
        assert!(!n.contains(&NodeIndex(0)));
    }

    #[test]
    fn wire_requires_enough_nodes() {
        let l = Lattice::torus(3, 3).unwrap();
        let mut g: Graph<()> = Graph::new(false);
        g.add_node(());
        assert!(matches!(
            l.wire(&mut g),
            Err(GraphError::IndexOutOfRange { .. })
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn coord_roundtrip() {
        let l = Lattice::torus(3, 7).unwrap();
        for i in 0..l.cell_count() {
            let (r, c) = l.coord_of(NodeIndex(i)).unwrap();
            assert_eq!(l.index_of(r, c), Some(NodeIndex(i)));
        }
        assert_eq!(l.coord_of(NodeIndex(21)), None);
        assert_eq!(l.index_of(3, 0), None);
    }

    proptest! {
        #[test]
        fn wired_torus_has_eight_distinct_neighbours(rows in 3u32..12, cols in 3u32..12) {
            let l = Lattice::torus(rows, cols).unwrap();
            for directed in [true, false] {
                let mut g = Graph::new(directed);
                for _ in 0..l.cell_count() {
                    g.add_node(());
                }
                l.wire(&mut g).unwrap();
                for i in g.indices() {
                    let adj: HashSet<NodeIndex> = g.neighbors(i).unwrap().iter().copied().collect();
                    prop_assert_eq!(adj.len(), 8);
                    prop_assert_eq!(g.neighbors(i).unwrap().len(), 8);
                    prop_assert!(!adj.contains(&i));
                }
            }
        }
    }
}
