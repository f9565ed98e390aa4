//! Per-sweep counters.

/// Timing and progress counters for a single sweep.
///
/// Returned by every step operation. `computed + settled + stalled +
/// skipped` equals the node count of the sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the sweep, in microseconds. For a parallel
    /// sweep this runs from launch until the last chunk reported.
    pub total_us: u64,
    /// Cells that computed and published a new value (phase 0 → 1).
    pub computed: usize,
    /// Cells that advanced through a settle phase (1 → 2 or 2 → 0).
    pub settled: usize,
    /// Cells that were not ready because a neighbour lagged behind.
    pub stalled: usize,
    /// Cells excluded from the sweep by the caller's selection.
    pub skipped: usize,
    /// Number of worker jobs the sweep was split into (0 when synchronous).
    pub chunks: usize,
}

impl StepMetrics {
    /// Number of cells that changed phase during the sweep.
    pub fn advanced(&self) -> usize {
        self.computed + self.settled
    }

    pub(crate) fn absorb(&mut self, other: &StepMetrics) {
        self.computed += other.computed;
        self.settled += other.settled;
        self.stalled += other.stalled;
        self.skipped += other.skipped;
    }
}
