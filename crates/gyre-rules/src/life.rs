//! Life-like outer-totalistic rules.

use gyre_core::RuleError;
use gyre_engine::{Neighbors, UpdateRule};

/// A birth/survival rule over live-neighbour counts `0..=8`.
///
/// A dead cell becomes alive when its live-neighbour count is in the
/// birth set; a live cell stays alive when its count is in the survival
/// set. Everything else dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Life {
    birth: u16,
    survive: u16,
}

impl Life {
    /// Conway's Game of Life, B3/S23.
    pub fn conway() -> Self {
        Self::new(&[3], &[2, 3])
    }

    /// HighLife, B36/S23.
    pub fn highlife() -> Self {
        Self::new(&[3, 6], &[2, 3])
    }

    /// A rule from explicit birth and survival counts. Counts above 8
    /// are ignored.
    pub fn new(birth: &[u8], survive: &[u8]) -> Self {
        Self {
            birth: mask(birth),
            survive: mask(survive),
        }
    }

    /// Whether a cell with `live` live neighbours is alive next generation.
    pub fn next(&self, alive: bool, live: usize) -> bool {
        let set = if alive { self.survive } else { self.birth };
        live <= 8 && set & (1 << live) != 0
    }
}

impl Default for Life {
    fn default() -> Self {
        Self::conway()
    }
}

fn mask(counts: &[u8]) -> u16 {
    counts
        .iter()
        .filter(|&&c| c <= 8)
        .fold(0, |m, &c| m | (1 << c))
}

impl UpdateRule<bool> for Life {
    fn update(&self, previous: &bool, neighbors: &Neighbors<'_, bool>) -> Result<bool, RuleError> {
        let live = neighbors.iter().filter(|alive| **alive).count();
        Ok(self.next(*previous, live))
    }
}
