//! Graph and board fixtures.

use gyre_core::NodeIndex;
use gyre_graph::{Graph, Lattice};

/// Undirected cycle `0 - 1 - … - (n-1) - 0` with node `i` holding `value(i)`.
pub fn ring<T>(n: usize, mut value: impl FnMut(usize) -> T) -> Graph<T> {
    let mut g = Graph::with_capacity(false, n);
    for i in 0..n {
        g.add_node(value(i));
    }
    for i in 0..n {
        g.add_edge(NodeIndex(i), NodeIndex((i + 1) % n))
            .expect("ring indices are in range");
    }
    g
}

/// Undirected complete graph on `n` nodes, all holding `value`.
pub fn complete<T: Clone>(n: usize, value: T) -> Graph<T> {
    let mut g = Graph::with_capacity(false, n);
    for _ in 0..n {
        g.add_node(value.clone());
    }
    for a in 0..n {
        for b in a + 1..n {
            g.add_edge(NodeIndex(a), NodeIndex(b))
                .expect("complete-graph indices are in range");
        }
    }
    g
}

/// Undirected star: node 0 joined to each of `1..n`.
pub fn star<T: Clone>(n: usize, value: T) -> Graph<T> {
    let mut g = Graph::with_capacity(false, n);
    for _ in 0..n {
        g.add_node(value.clone());
    }
    for leaf in 1..n {
        g.add_edge(NodeIndex(0), NodeIndex(leaf))
            .expect("star indices are in range");
    }
    g
}

/// A lattice graph with cell `i` holding `cells[i]`.
pub fn lattice_graph<T: Clone>(lattice: &Lattice, cells: &[T]) -> Graph<T> {
    assert_eq!(cells.len(), lattice.cell_count(), "board size mismatch");
    let mut g = Graph::with_capacity(false, cells.len());
    for cell in cells {
        g.add_node(cell.clone());
    }
    lattice.wire(&mut g).expect("board covers the lattice");
    g
}

/// Board with the given `(row, col)` cells alive.
pub fn board(rows: u32, cols: u32, alive: &[(u32, u32)]) -> Vec<bool> {
    let mut cells = vec![false; rows as usize * cols as usize];
    for &(r, c) in alive {
        cells[r as usize * cols as usize + c as usize] = true;
    }
    cells
}

/// Three cells in a row, centred on the middle of a 5×5 board.
pub fn blinker_horizontal() -> Vec<bool> {
    board(5, 5, &[(2, 1), (2, 2), (2, 3)])
}

/// Three cells in a column, centred on the middle of a 5×5 board.
pub fn blinker_vertical() -> Vec<bool> {
    board(5, 5, &[(1, 2), (2, 2), (3, 2)])
}

/// A 2×2 block, stable under B3/S23, at the top-left of a 6×6 board.
pub fn block() -> Vec<bool> {
    board(6, 6, &[(1, 1), (1, 2), (2, 1), (2, 2)])
}
