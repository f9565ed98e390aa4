//! Error types for the gyre engine.
//!
//! Two faults are part of the storage contract: [`GraphError`] for
//! index-based access beyond the node count, and [`FileFormatError`]
//! for malformed or unsupported persisted data. [`RuleError`] is the
//! failure type returned by user-supplied update rules.

use std::error::Error;
use std::fmt;
use std::io;

use crate::id::NodeIndex;

/// Errors from index-based graph access.
///
/// Always a usage fault: the engine never retries or recovers from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A node index is not below the current node count.
    IndexOutOfRange {
        /// The offending index.
        index: NodeIndex,
        /// Node count at the time of the access.
        len: usize,
    },
    /// A replacement node array does not match the current node count.
    LengthMismatch {
        /// The current node count.
        expected: usize,
        /// Length of the offered replacement.
        found: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "node index {index} out of range for {len} nodes")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "replacement has {found} nodes, graph has {expected}")
            }
        }
    }
}

impl Error for GraphError {}

/// Errors from decoding (or encoding) persisted graph data.
///
/// A structure whose decode failed must be discarded; decoding never
/// hands back a partially populated value.
#[derive(Debug)]
pub enum FileFormatError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The version tag is not one this build understands.
    UnsupportedVersion {
        /// The version found in the stream.
        found: i32,
    },
    /// The data is truncated, inconsistent, or otherwise corrupt.
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl FileFormatError {
    /// Shorthand for a [`FileFormatError::Malformed`] with the given detail.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FileFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed data: {detail}"),
        }
    }
}

impl Error for FileFormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileFormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors raised by an update rule while computing a cell's next value.
///
/// Returned by `UpdateRule::update()` and wrapped with the failing node's
/// index by the automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// The rule could not compute a value.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The cell's state or neighbourhood violated a rule-specific constraint.
    ConstraintViolation {
        /// Description of the violated constraint.
        constraint: String,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::ConstraintViolation { constraint } => {
                write!(f, "constraint violation: {constraint}")
            }
        }
    }
}

impl Error for RuleError {}
