//! Scope-bound exclusive handle to a pooled object.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::pool::Pool;
use crate::recycle::Recycle;

/// Exclusive access to one pooled instance.
///
/// Derefs to `T`. The instance returns to the pool's free list when the
/// lease drops; using it needs no locking because nobody else can reach
/// it while the lease is alive.
pub struct Lease<'p, T: Recycle> {
    pool: &'p Pool<T>,
    value: T,
}

impl<'p, T: Recycle> Lease<'p, T> {
    pub(crate) fn new(pool: &'p Pool<T>, value: T) -> Self {
        Self { pool, value }
    }
}

impl<T: Recycle> Deref for Lease<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Recycle> DerefMut for Lease<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Recycle> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        // `T::default()` stands in for the instance being handed back;
        // for the collection types pooled here it does not allocate.
        let value = std::mem::take(&mut self.value);
        self.pool.release(value);
    }
}

impl<T: Recycle + fmt::Debug> fmt::Debug for Lease<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lease").field(&self.value).finish()
    }
}
