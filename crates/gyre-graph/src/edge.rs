//! Boundary behaviour for lattice wiring.

/// How a [`Lattice`](crate::Lattice) handles neighbours past its edges.
///
/// # Examples
///
/// ```
/// use gyre_graph::{EdgeBehavior, Lattice};
/// use gyre_core::NodeIndex;
///
/// // Absorb: a corner has 3 neighbours, an interior cell has 8.
/// let absorb = Lattice::new(4, 4, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(absorb.neighbours(NodeIndex(0)).len(), 3);
/// assert_eq!(absorb.neighbours(NodeIndex(5)).len(), 8);
///
/// // Wrap: every cell has 8 neighbours (torus).
/// let wrap = Lattice::new(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(wrap.neighbours(NodeIndex(0)).len(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour maps to the boundary cell (self-loop).
    Clamp,
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    Absorb,
}

/// Resolve a single axis value under the given edge behaviour.
/// Returns `Some(resolved)` or `None` for Absorb out-of-bounds.
pub(crate) fn resolve_axis(val: i64, len: u32, edge: EdgeBehavior) -> Option<u32> {
    let n = i64::from(len);
    if (0..n).contains(&val) {
        return Some(val as u32);
    }
    match edge {
        EdgeBehavior::Absorb => None,
        EdgeBehavior::Clamp => Some(val.clamp(0, n - 1) as u32),
        EdgeBehavior::Wrap => Some(val.rem_euclid(n) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_is_identity() {
        for edge in [EdgeBehavior::Absorb, EdgeBehavior::Clamp, EdgeBehavior::Wrap] {
            assert_eq!(resolve_axis(3, 5, edge), Some(3));
        }
    }

    #[test]
    fn out_of_range_per_behavior() {
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Absorb), None);
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Clamp), Some(0));
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Wrap), Some(4));
        assert_eq!(resolve_axis(5, 5, EdgeBehavior::Wrap), Some(0));
        assert_eq!(resolve_axis(5, 5, EdgeBehavior::Clamp), Some(4));
    }
}
