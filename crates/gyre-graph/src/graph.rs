//! Ordered node storage with per-node adjacency lists.

use indexmap::set::Slice;
use indexmap::IndexSet;

use gyre_core::{GraphError, NodeIndex};

/// Adjacency of a single node: insertion-ordered, no duplicates.
pub(crate) type Adjacency = IndexSet<NodeIndex>;

/// A directed or undirected graph over payloads of type `T`.
///
/// Node identity is position: [`add_node`](Graph::add_node) hands out
/// 0, 1, 2, … and nodes are never removed, so indices stay valid for the
/// lifetime of the graph. Each node owns an ordered adjacency list with
/// no duplicate entries. On undirected graphs every edge `a → b` is
/// mirrored by `b → a`; [`add_edge`](Graph::add_edge) and
/// [`remove_edge`](Graph::remove_edge) maintain the pair together.
///
/// Structural edits take `&mut self`, so they cannot interleave with
/// anything holding a shared borrow of the graph.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    nodes: Vec<T>,
    edges: Vec<Adjacency>,
    /// Reverse adjacency, kept only for directed graphs.
    incoming: Vec<Adjacency>,
    directed: bool,
}

impl<T> Graph<T> {
    /// Create an empty graph. `directed` is fixed for the graph's lifetime.
    pub fn new(directed: bool) -> Self {
        Self::with_capacity(directed, 0)
    }

    /// Create an empty graph with room for `capacity` nodes.
    pub fn with_capacity(directed: bool, capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity),
            incoming: Vec::with_capacity(if directed { capacity } else { 0 }),
            directed,
        }
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of adjacency entries.
    ///
    /// An undirected edge between two distinct nodes counts twice, once
    /// per direction; a self-loop counts once.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(IndexSet::len).sum()
    }

    /// Append a node and return its permanent index.
    pub fn add_node(&mut self, value: T) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(value);
        self.edges.push(Adjacency::new());
        if self.directed {
            self.incoming.push(Adjacency::new());
        }
        index
    }

    /// Add the edge `from → to` (and `to → from` when undirected).
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        self.edges[from.0].insert(to);
        if self.directed {
            self.incoming[to.0].insert(from);
        } else {
            self.edges[to.0].insert(from);
        }
        Ok(())
    }

    /// Remove the edge `from → to` (and `to → from` when undirected).
    ///
    /// Removing an absent edge is a no-op. The relative order of the
    /// remaining neighbours is preserved.
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        self.edges[from.0].shift_remove(&to);
        if self.directed {
            self.incoming[to.0].shift_remove(&from);
        } else {
            self.edges[to.0].shift_remove(&from);
        }
        Ok(())
    }

    /// Whether `to` appears in `from`'s adjacency.
    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> Result<bool, GraphError> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.edges[from.0].contains(&to))
    }

    /// Borrow a node's payload.
    pub fn node(&self, index: NodeIndex) -> Result<&T, GraphError> {
        self.check(index)?;
        Ok(&self.nodes[index.0])
    }

    /// Mutably borrow a node's payload.
    pub fn node_mut(&mut self, index: NodeIndex) -> Result<&mut T, GraphError> {
        self.check(index)?;
        Ok(&mut self.nodes[index.0])
    }

    /// The ordered neighbours of `index`.
    pub fn neighbors(&self, index: NodeIndex) -> Result<&Slice<NodeIndex>, GraphError> {
        self.check(index)?;
        Ok(self.edges[index.0].as_slice())
    }

    /// The nodes with an edge into `index`, in the order those edges were
    /// added. On an undirected graph this is [`neighbors`](Graph::neighbors).
    pub fn predecessors(&self, index: NodeIndex) -> Result<&Slice<NodeIndex>, GraphError> {
        self.check(index)?;
        let lists = if self.directed {
            &self.incoming
        } else {
            &self.edges
        };
        Ok(lists[index.0].as_slice())
    }

    /// All payloads, in index order.
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    /// All payloads, mutably. The node count cannot change through this.
    pub fn nodes_mut(&mut self) -> &mut [T] {
        &mut self.nodes
    }

    /// Iterate over every node index in order.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// Swap in a whole new node array, returning the old one.
    ///
    /// The replacement must have exactly [`len`](Graph::len) entries;
    /// adjacency is untouched.
    pub fn replace_nodes(&mut self, nodes: Vec<T>) -> Result<Vec<T>, GraphError> {
        if nodes.len() != self.nodes.len() {
            return Err(GraphError::LengthMismatch {
                expected: self.nodes.len(),
                found: nodes.len(),
            });
        }
        Ok(std::mem::replace(&mut self.nodes, nodes))
    }

    /// Transform every payload, keeping indices and adjacency.
    pub fn map<U>(self, mut f: impl FnMut(NodeIndex, T) -> U) -> Graph<U> {
        let nodes = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, value)| f(NodeIndex(i), value))
            .collect();
        Graph {
            nodes,
            edges: self.edges,
            incoming: self.incoming,
            directed: self.directed,
        }
    }

    /// Fail with [`GraphError::IndexOutOfRange`] unless `index < len`.
    pub fn check(&self, index: NodeIndex) -> Result<(), GraphError> {
        if index.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                index,
                len: self.nodes.len(),
            })
        }
    }

    pub(crate) fn from_parts(
        directed: bool,
        nodes: Vec<T>,
        edges: Vec<Adjacency>,
    ) -> Self {
        debug_assert_eq!(nodes.len(), edges.len());
        let mut incoming = Vec::new();
        if directed {
            incoming = vec![Adjacency::new(); edges.len()];
            for (from, list) in edges.iter().enumerate() {
                for to in list {
                    incoming[to.0].insert(NodeIndex(from));
                }
            }
        }
        Self {
            nodes,
            edges,
            incoming,
            directed,
        }
    }

    pub(crate) fn adjacency(&self) -> &[Adjacency] {
        &self.edges
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Adjacency order is significant: two graphs are equal only if every
/// node lists the same neighbours in the same order.
impl<T: PartialEq> PartialEq for Graph<T> {
    fn eq(&self, other: &Self) -> bool {
        self.directed == other.directed
            && self.nodes == other.nodes
            && self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(&other.edges)
                .all(|(a, b)| a.iter().eq(b.iter()))
    }
}
