//! The pool itself: a mutex-guarded free list.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::lease::Lease;
use crate::recycle::Recycle;

/// Thread-safe, growth-only pool of reusable objects.
///
/// The single [`Mutex`] guards free-list bookkeeping only: it is held
/// for one `pop` or `push`, never while a caller uses a leased object.
/// The free list never shrinks; instances live until the pool drops.
pub struct Pool<T: Recycle> {
    free: Mutex<Vec<T>>,
    created: AtomicUsize,
}

// Compile-time assertion: a pool of sendable objects is shareable across
// worker threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Pool<Vec<usize>>>();
};

impl<T: Recycle> Pool<T> {
    /// Create an empty pool. The first `acquire` constructs an instance.
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            created: AtomicUsize::new(0),
        }
    }

    /// Create a pool pre-seeded with `count` default instances.
    pub fn with_capacity(count: usize) -> Self {
        let free: Vec<T> = (0..count).map(|_| T::default()).collect();
        Self {
            free: Mutex::new(free),
            created: AtomicUsize::new(count),
        }
    }

    /// Lease an instance, reusing a free one when available.
    ///
    /// A reclaimed instance is [recycled](Recycle::recycle) before it is
    /// handed out, so the lease always starts from the default state.
    /// Never blocks on demand and never fails.
    pub fn acquire(&self) -> Lease<'_, T> {
        let reclaimed = self.lock_free().pop();
        let value = match reclaimed {
            Some(mut value) => {
                value.recycle();
                value
            }
            None => {
                let total = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(total, "pool grew");
                T::default()
            }
        };
        Lease::new(self, value)
    }

    /// Number of instances currently on the free list.
    pub fn available(&self) -> usize {
        self.lock_free().len()
    }

    /// Number of instances this pool has ever constructed.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub(crate) fn release(&self, value: T) {
        self.lock_free().push(value);
    }

    /// A panic while holding the lock can only interrupt a `push` or
    /// `pop`, which leave the list consistent, so poisoning is ignored.
    fn lock_free(&self) -> MutexGuard<'_, Vec<T>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Recycle> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Recycle> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("available", &self.available())
            .field("created", &self.created())
            .finish()
    }
}
