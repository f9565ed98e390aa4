//! Growth-only pool of reusable scratch objects.
//!
//! Parallel sweeps need a small scratch buffer per cell update (the
//! list of neighbour indices handed to the update rule). Allocating it
//! per update would dominate the cost of cheap rules, so buffers are
//! leased from a [`Pool`] and handed back when the [`Lease`] drops.
//!
//! ```text
//! Pool<T>
//! ├── Mutex<Vec<T>>   free list (bookkeeping only)
//! └── AtomicUsize     instances ever constructed
//!
//! acquire() ──► pop free list, recycle ──► Lease<'_, T> ──drop──► push free list
//!                 └─ empty: T::default()      (exclusive use, no lock)
//! ```
//!
//! The pool never blocks on demand and never fails: an empty free list
//! simply constructs a new instance.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod lease;
pub mod pool;
pub mod recycle;

pub use lease::Lease;
pub use pool::Pool;
pub use recycle::Recycle;
