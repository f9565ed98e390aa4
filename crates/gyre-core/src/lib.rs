//! Core types and traits for the gyre cellular-automaton engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the node identity type, the error taxonomy shared by every other
//! crate, and the little-endian binary codec used for persistence.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod id;

pub use codec::{Codec, FORMAT_VERSION};
pub use error::{FileFormatError, GraphError, RuleError};
pub use id::NodeIndex;
