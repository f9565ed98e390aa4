//! Errors from stepping an automaton.

use std::error::Error;
use std::fmt;

use gyre_core::{GraphError, NodeIndex, RuleError};

/// Errors from [`Automaton::step`](crate::Automaton::step) and the
/// parallel sweep.
///
/// A failed sweep installs nothing: the automaton keeps its previous
/// node array untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The update rule failed for a cell.
    RuleFailed {
        /// The cell whose update failed.
        node: NodeIndex,
        /// The rule's error.
        reason: RuleError,
    },
    /// An index-based access failed.
    Graph(GraphError),
    /// A worker dropped its part of a parallel sweep (the rule panicked
    /// or the pool shut down).
    WorkerLost,
    /// A sweep result was produced against a snapshot that has since
    /// been replaced or edited.
    StaleOutcome {
        /// Revision of the snapshot the sweep started from.
        launched_at: u64,
        /// Current revision of the automaton.
        current: u64,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleFailed { node, reason } => {
                write!(f, "update rule failed at node {node}: {reason}")
            }
            Self::Graph(e) => write!(f, "graph: {e}"),
            Self::WorkerLost => write!(f, "worker lost part of the sweep"),
            Self::StaleOutcome {
                launched_at,
                current,
            } => write!(
                f,
                "sweep launched at revision {launched_at} is stale (now {current})"
            ),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RuleFailed { reason, .. } => Some(reason),
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for StepError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}
