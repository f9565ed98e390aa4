//! The update-rule seam and the neighbour view handed to it.

use std::fmt;

use gyre_core::{NodeIndex, RuleError};

use crate::state::{AsyncState, Phase};

/// Computes a cell's next value from its previous value and its
/// neighbours' published values.
///
/// Rules are injected at automaton construction and shared across
/// worker threads, hence `Send + Sync`. An implementation must be a
/// pure function of its arguments: it may not touch state outside its
/// return value and may not keep the neighbour view past the call.
pub trait UpdateRule<T>: Send + Sync {
    /// Produce the next value for a cell.
    fn update(&self, previous: &T, neighbors: &Neighbors<'_, T>) -> Result<T, RuleError>;
}

impl<T, R: UpdateRule<T> + ?Sized> UpdateRule<T> for Box<R> {
    fn update(&self, previous: &T, neighbors: &Neighbors<'_, T>) -> Result<T, RuleError> {
        (**self).update(previous, neighbors)
    }
}

/// An [`UpdateRule`] backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FnRule<F>(F);

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnRule")
    }
}

/// Wrap a closure as an [`UpdateRule`].
///
/// ```
/// use gyre_engine::{from_fn, Neighbors};
///
/// let majority = from_fn(|prev: &bool, n: &Neighbors<'_, bool>| {
///     let on = n.iter().filter(|v| **v).count();
///     Ok(if on * 2 == n.len() { *prev } else { on * 2 > n.len() })
/// });
/// # let _ = majority;
/// ```
pub fn from_fn<T, F>(f: F) -> FnRule<F>
where
    F: Fn(&T, &Neighbors<'_, T>) -> Result<T, RuleError> + Send + Sync,
{
    FnRule(f)
}

impl<T, F> UpdateRule<T> for FnRule<F>
where
    F: Fn(&T, &Neighbors<'_, T>) -> Result<T, RuleError> + Send + Sync,
{
    fn update(&self, previous: &T, neighbors: &Neighbors<'_, T>) -> Result<T, RuleError> {
        (self.0)(previous, neighbors)
    }
}

/// Read-only view of a computing cell's neighbours.
///
/// Borrowed from the previous snapshot for the duration of one
/// [`UpdateRule::update`] call. Values appear in adjacency order.
///
/// Each value is the one the neighbour published for the reader's
/// generation. A neighbour already one phase ahead (it computed and sits
/// in [`Phase::Published`]) has moved its new value into `current`, so
/// its previous value is read from `former` instead.
pub struct Neighbors<'a, T> {
    snapshot: &'a [AsyncState<T>],
    indices: &'a [NodeIndex],
}

impl<T> Clone for Neighbors<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbors<'_, T> {}

impl<'a, T> Neighbors<'a, T> {
    pub(crate) fn new(snapshot: &'a [AsyncState<T>], indices: &'a [NodeIndex]) -> Self {
        Self { snapshot, indices }
    }

    /// Number of neighbours.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the cell has no neighbours.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `i`-th neighbour's value.
    pub fn get(&self, i: usize) -> Option<&'a T> {
        let index = self.indices.get(i)?;
        Some(generation_view(&self.snapshot[index.0]))
    }

    /// Node indices of the neighbours, in adjacency order.
    pub fn indices(&self) -> &'a [NodeIndex] {
        self.indices
    }

    /// Iterate over neighbour values in adjacency order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a T> + 'a {
        let snapshot = self.snapshot;
        self.indices
            .iter()
            .map(move |index| generation_view(&snapshot[index.0]))
    }
}

impl<T: fmt::Debug> fmt::Debug for Neighbors<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A computing reader is at [`Phase::Compute`]; a neighbour at
/// [`Phase::Published`] is one step ahead of it.
fn generation_view<T>(cell: &AsyncState<T>) -> &T {
    match cell.phase() {
        Phase::Published => cell.former(),
        Phase::Compute | Phase::Settling => cell.current(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<AsyncState<u32>> {
        vec![
            AsyncState::new(NodeIndex(0), 10),
            AsyncState::new(NodeIndex(1), 20).computed(21),
            AsyncState::new(NodeIndex(2), 30).computed(31).settled(),
        ]
    }

    #[test]
    fn view_follows_adjacency_order() {
        let snap = snapshot();
        let idx = [NodeIndex(2), NodeIndex(0)];
        let n = Neighbors::new(&snap, &idx);
        assert_eq!(n.len(), 2);
        assert_eq!(n.iter().copied().collect::<Vec<_>>(), vec![31, 10]);
        assert_eq!(n.indices(), &idx);
        assert_eq!(n.get(2), None);
    }

    #[test]
    fn neighbour_one_phase_ahead_is_read_through_former() {
        let snap = snapshot();
        let idx = [NodeIndex(1)];
        let n = Neighbors::new(&snap, &idx);
        assert_eq!(n.get(0), Some(&20));
    }

    #[test]
    fn closure_rule_sees_previous_and_neighbours() {
        let rule = from_fn(|prev: &u32, n: &Neighbors<'_, u32>| Ok(*prev + n.iter().sum::<u32>()));
        let snap = snapshot();
        let idx = [NodeIndex(0), NodeIndex(2)];
        let out = rule.update(&1, &Neighbors::new(&snap, &idx)).unwrap();
        assert_eq!(out, 1 + 10 + 31);
    }

    #[test]
    fn boxed_rule_delegates() {
        let rule: Box<dyn UpdateRule<u32>> =
            Box::new(from_fn(|_: &u32, n: &Neighbors<'_, u32>| Ok(n.len() as u32)));
        let snap = snapshot();
        let idx = [NodeIndex(0), NodeIndex(1), NodeIndex(2)];
        assert_eq!(rule.update(&0, &Neighbors::new(&snap, &idx)).unwrap(), 3);
    }
}
