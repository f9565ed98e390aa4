//! Double-buffered cell state with a three-phase rotation counter.
//!
//! ```text
//! phase      Compute(0)    Published(1)    Settling(2)
//! current    q0            q1              q0
//! former     q1            q0              q1
//!
//! 0 → 1   write next value into q1          (roles swap: new value published)
//! 1 → 2   mem::swap(q0, q1)                 (no copy; new value moves to q0)
//! 2 → 0   counter only
//! ```
//!
//! Throughout phases 1 and 2, `former()` still holds the value that was
//! current before the compute, which is what a lagging neighbour reads.

use std::io::{Read, Write};

use gyre_core::codec::{read_i32_le, write_i32_le};
use gyre_core::{Codec, FileFormatError, NodeIndex};

/// Position of a cell in the compute → settle → settle cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Ready to compute the next value (`r = 0`).
    #[default]
    Compute,
    /// Just published a new value (`r = 1`).
    Published,
    /// Waiting for slower neighbours before computing again (`r = 2`).
    Settling,
}

impl Phase {
    /// The phase after this one, modulo 3.
    pub fn next(self) -> Self {
        match self {
            Self::Compute => Self::Published,
            Self::Published => Self::Settling,
            Self::Settling => Self::Compute,
        }
    }

    /// The phase one step behind this one, `(r + 2) mod 3`.
    ///
    /// A cell may not advance while any neighbour sits in this phase.
    pub fn behind(self) -> Self {
        match self {
            Self::Compute => Self::Settling,
            Self::Published => Self::Compute,
            Self::Settling => Self::Published,
        }
    }

    /// The integer `r ∈ {0, 1, 2}`.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Compute => 0,
            Self::Published => 1,
            Self::Settling => 2,
        }
    }

    /// Parse `r`, returning `None` outside `{0, 1, 2}`.
    pub fn from_i32(r: i32) -> Option<Self> {
        match r {
            0 => Some(Self::Compute),
            1 => Some(Self::Published),
            2 => Some(Self::Settling),
            _ => None,
        }
    }
}

/// A cell's state wrapped in two buffers and a phase counter.
///
/// Exactly one buffer is published ([`current`](AsyncState::current));
/// the other ([`former`](AsyncState::former)) belongs to the cell's own
/// update. Only the automaton advances the phase, and only as part of
/// this cell's own update.
#[derive(Clone, Debug, PartialEq)]
pub struct AsyncState<T> {
    q0: T,
    q1: T,
    phase: Phase,
    index: NodeIndex,
}

impl<T: Clone> AsyncState<T> {
    /// A fresh cell with both buffers set to `value`, at phase 0.
    pub fn new(index: NodeIndex, value: T) -> Self {
        Self {
            q0: value.clone(),
            q1: value,
            phase: Phase::Compute,
            index,
        }
    }

    /// Re-initialise the cell: both buffers to `value`, phase 0.
    ///
    /// Drivers use this between sweeps; it is never part of the rotation.
    pub fn reset(&mut self, value: T) {
        self.q0 = value.clone();
        self.q1 = value;
        self.phase = Phase::Compute;
    }

    /// The successor of a phase-0 cell that computed `next`.
    pub(crate) fn computed(&self, next: T) -> Self {
        debug_assert_eq!(self.phase, Phase::Compute);
        Self {
            q0: self.q0.clone(),
            q1: next,
            phase: Phase::Published,
            index: self.index,
        }
    }

    /// The successor of a phase-1 or phase-2 cell that settled.
    pub(crate) fn settled(&self) -> Self {
        debug_assert_ne!(self.phase, Phase::Compute);
        let mut out = self.clone();
        if out.phase == Phase::Published {
            std::mem::swap(&mut out.q0, &mut out.q1);
        }
        out.phase = out.phase.next();
        out
    }
}

impl<T> AsyncState<T> {
    /// The published value neighbours read.
    pub fn current(&self) -> &T {
        match self.phase {
            Phase::Published => &self.q1,
            Phase::Compute | Phase::Settling => &self.q0,
        }
    }

    /// The private buffer of this cell's own update.
    ///
    /// Between a compute and the next one this holds the previously
    /// published value. Drivers should read [`current`](AsyncState::current).
    ///
    /// The one other reader is the neighbour view handed to an update
    /// rule: a neighbour at [`Phase::Published`] is one generation ahead
    /// of the computing cell, so the view reads its `former` buffer,
    /// which still holds the value for the reader's generation. The
    /// settle phases keep that buffer intact until every reader is done.
    pub fn former(&self) -> &T {
        match self.phase {
            Phase::Published => &self.q0,
            Phase::Compute | Phase::Settling => &self.q1,
        }
    }

    /// The rotation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the cell is in one of the two settle phases.
    pub fn is_settling(&self) -> bool {
        self.phase != Phase::Compute
    }

    /// This cell's own node index.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Consume the state, keeping only the published value.
    pub fn into_current(self) -> T {
        match self.phase {
            Phase::Published => self.q1,
            Phase::Compute | Phase::Settling => self.q0,
        }
    }

    pub(crate) fn set_index(&mut self, index: NodeIndex) {
        self.index = index;
    }
}

/// Record layout: `q0`, `q1`, `r: i32`.
///
/// The self-index is positional and is not stored; decoding yields
/// index 0 and the automaton restores it on load.
impl<T: Codec> Codec for AsyncState<T> {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        self.q0.encode(w)?;
        self.q1.encode(w)?;
        write_i32_le(w, self.phase.as_i32())
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        let q0 = T::decode(r)?;
        let q1 = T::decode(r)?;
        let raw = read_i32_le(r)?;
        let phase = Phase::from_i32(raw)
            .ok_or_else(|| FileFormatError::malformed(format!("phase {raw} outside 0..3")))?;
        Ok(Self {
            q0,
            q1,
            phase,
            index: NodeIndex(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(s: &AsyncState<u32>, next: u32) -> AsyncState<u32> {
        s.computed(next).settled().settled()
    }

    #[test]
    fn phase_arithmetic_is_mod_three() {
        for p in [Phase::Compute, Phase::Published, Phase::Settling] {
            assert_eq!(p.next().next().next(), p);
            assert_eq!(p.behind().next(), p);
            assert_eq!((p.as_i32() + 2) % 3, p.behind().as_i32());
            assert_eq!(Phase::from_i32(p.as_i32()), Some(p));
        }
        assert_eq!(Phase::from_i32(3), None);
        assert_eq!(Phase::from_i32(-1), None);
    }

    #[test]
    fn new_cell_publishes_initial_value() {
        let s = AsyncState::new(NodeIndex(3), 7u32);
        assert_eq!(*s.current(), 7);
        assert_eq!(*s.former(), 7);
        assert_eq!(s.phase(), Phase::Compute);
        assert_eq!(s.index(), NodeIndex(3));
    }

    #[test]
    fn compute_publishes_and_keeps_previous_as_former() {
        let s = AsyncState::new(NodeIndex(0), 1u32).computed(2);
        assert_eq!(s.phase(), Phase::Published);
        assert_eq!(*s.current(), 2);
        assert_eq!(*s.former(), 1);

        let s = s.settled();
        assert_eq!(s.phase(), Phase::Settling);
        assert_eq!(*s.current(), 2);
        assert_eq!(*s.former(), 1);

        let s = s.settled();
        assert_eq!(s.phase(), Phase::Compute);
        assert_eq!(*s.current(), 2);
    }

    #[test]
    fn current_and_former_never_alias() {
        let mut s = AsyncState::new(NodeIndex(0), 0u32);
        for g in 1..6 {
            s = s.computed(g);
            assert!(!std::ptr::eq(s.current(), s.former()));
            s = s.settled();
            assert!(!std::ptr::eq(s.current(), s.former()));
            s = s.settled();
            assert!(!std::ptr::eq(s.current(), s.former()));
        }
    }

    #[test]
    fn repeated_cycles_track_generations() {
        let mut s = AsyncState::new(NodeIndex(0), 0u32);
        for g in 1..=10 {
            s = cycle(&s, g);
            assert_eq!(*s.current(), g);
            assert_eq!(*s.former(), g - 1);
        }
    }

    #[test]
    fn reset_clears_both_buffers_and_phase() {
        let mut s = AsyncState::new(NodeIndex(1), 1u32).computed(2);
        s.reset(9);
        assert_eq!(s.phase(), Phase::Compute);
        assert_eq!(*s.current(), 9);
        assert_eq!(*s.former(), 9);
        assert_eq!(s.index(), NodeIndex(1));
    }

    #[test]
    fn settling_covers_both_settle_phases() {
        let s = AsyncState::new(NodeIndex(0), 0u32);
        assert!(!s.is_settling());
        let s = s.computed(1);
        assert!(s.is_settling());
        let s = s.settled();
        assert!(s.is_settling());
        assert!(!s.settled().is_settling());
    }

    #[test]
    fn into_current_takes_published_buffer() {
        let s = AsyncState::new(NodeIndex(0), 1u32).computed(5);
        assert_eq!(s.into_current(), 5);
    }

    #[test]
    fn record_is_q0_q1_r() {
        let s = AsyncState::new(NodeIndex(5), 1u32).computed(2);
        let mut buf = Vec::new();
        s.encode(&mut buf).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&1i32.to_le_bytes());
        assert_eq!(buf, expected);

        let back = AsyncState::<u32>::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(*back.current(), 2);
        assert_eq!(*back.former(), 1);
        assert_eq!(back.phase(), Phase::Published);
        assert_eq!(back.index(), NodeIndex(0));
    }

    #[test]
    fn out_of_range_phase_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&3i32.to_le_bytes());
        assert!(matches!(
            AsyncState::<u32>::decode(&mut buf.as_slice()),
            Err(FileFormatError::Malformed { .. })
        ));
    }
}
