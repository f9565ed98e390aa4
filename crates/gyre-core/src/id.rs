//! Strongly-typed node identity.

use std::fmt;

/// Identifies a node (cell) within a graph.
///
/// Assigned at creation in insertion order, starting at 0. An index is
/// permanent: nodes are never removed, so `NodeIndex(n)` always refers
/// to the n-th node ever added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    /// The raw position of this node in node storage.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<NodeIndex> for usize {
    fn from(v: NodeIndex) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_position() {
        assert_eq!(NodeIndex(42).to_string(), "42");
    }

    #[test]
    fn ordering_follows_position() {
        assert!(NodeIndex(1) < NodeIndex(2));
        assert_eq!(usize::from(NodeIndex::from(7)), 7);
    }
}
