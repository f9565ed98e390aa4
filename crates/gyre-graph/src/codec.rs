//! Binary encode/decode for [`Graph`].
//!
//! Record layout, in order: version tag, `directed` flag, node
//! sequence, adjacency sequence (one list per node). Decoding validates
//! the structure fully before returning, so a failed decode never
//! yields a half-built graph.

use std::io::{Read, Write};

use gyre_core::codec::{read_len, read_version, write_len, write_version};
use gyre_core::{Codec, FileFormatError, NodeIndex};

use crate::graph::{Adjacency, Graph};

impl<T: Codec> Graph<T> {
    /// Write the graph record to `w`.
    pub fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_version(w)?;
        self.is_directed().encode(w)?;

        write_len(w, self.len())?;
        for node in self.nodes() {
            node.encode(w)?;
        }

        let adjacency = self.adjacency();
        write_len(w, adjacency.len())?;
        for list in adjacency {
            write_len(w, list.len())?;
            for neighbour in list {
                neighbour.encode(w)?;
            }
        }
        Ok(())
    }

    /// Read a graph record previously written by [`encode`](Graph::encode).
    ///
    /// # Errors
    ///
    /// [`FileFormatError::UnsupportedVersion`] for any version tag other
    /// than 1; [`FileFormatError::Malformed`] when the adjacency table
    /// does not match the node count, references a missing node, lists
    /// a neighbour twice, or (undirected) is not symmetric;
    /// [`FileFormatError::Io`] on truncated input.
    pub fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_version(r)?;
        let directed = bool::decode(r)?;
        let nodes = Vec::<T>::decode(r)?;

        let list_count = read_len(r)?;
        if list_count != nodes.len() {
            return Err(FileFormatError::malformed(format!(
                "{list_count} adjacency lists for {} nodes",
                nodes.len()
            )));
        }

        let mut edges = Vec::with_capacity(list_count);
        for from in 0..list_count {
            let degree = read_len(r)?;
            let mut list = Adjacency::with_capacity(degree.min(nodes.len()));
            for _ in 0..degree {
                let to = NodeIndex::decode(r)?;
                if to.0 >= nodes.len() {
                    return Err(FileFormatError::malformed(format!(
                        "edge {from}->{to} references a missing node"
                    )));
                }
                if !list.insert(to) {
                    return Err(FileFormatError::malformed(format!(
                        "duplicate edge {from}->{to}"
                    )));
                }
            }
            edges.push(list);
        }

        if !directed {
            for (from, list) in edges.iter().enumerate() {
                for to in list {
                    if !edges[to.0].contains(&NodeIndex(from)) {
                        return Err(FileFormatError::malformed(format!(
                            "undirected edge {from}->{to} has no mirror"
                        )));
                    }
                }
            }
        }

        Ok(Graph::from_parts(directed, nodes, edges))
    }
}
