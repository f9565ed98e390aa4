//! Reset contract for pooled objects.

use std::collections::VecDeque;

/// An object that can be returned to its default state for reuse.
///
/// After [`recycle`](Recycle::recycle) the object must be observationally
/// equal to `Self::default()`: callers of [`Pool::acquire`](crate::Pool::acquire)
/// may not assume any earlier contents survive. Implementations are free
/// to keep internal capacity, which is the whole point of pooling.
pub trait Recycle: Default {
    /// Reset `self` to its default state.
    ///
    /// The provided implementation reconstructs the value outright.
    fn recycle(&mut self) {
        *self = Self::default();
    }
}

impl<T> Recycle for Vec<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl<T> Recycle for VecDeque<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for String {
    fn recycle(&mut self) {
        self.clear();
    }
}
