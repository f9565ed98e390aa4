//! The automaton: a graph of [`AsyncState`] cells driven by an
//! [`UpdateRule`] through the phase rotation.
//!
//! # Ownership model
//!
//! The node array lives behind an `Arc` and is never mutated while a
//! sweep reads it. Every sweep, synchronous or parallel, builds a
//! complete replacement array from the published snapshot and installs
//! it in one swap. A parallel sweep holds its own clone of the `Arc`, so
//! the automaton stays usable (and readable) while the sweep runs.
//!
//! # Revisions
//!
//! Each installed sweep and each structural or reset edit bumps the
//! automaton's revision. A [`SweepOutcome`] remembers the revision it
//! was computed from and [`install`](Automaton::install) refuses it once
//! that revision is gone, so an outdated parallel result can never
//! overwrite newer state.

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Instant;

use indexmap::set::Slice;

use gyre_core::{Codec, FileFormatError, GraphError, NodeIndex};
use gyre_graph::{Graph, Lattice};
use gyre_pool::Pool;

use crate::error::StepError;
use crate::metrics::StepMetrics;
use crate::rule::UpdateRule;
use crate::state::{AsyncState, Phase};
use crate::sweep::{self, PendingStep, SweepOutcome};
use crate::worker::WorkerPool;

// ── Automaton ───────────────────────────────────────────────────

/// A graph cellular automaton with per-cell phase rotation.
///
/// # Example
///
/// ```
/// use gyre_engine::{from_fn, Automaton, Neighbors};
///
/// let copy_left = from_fn(|prev: &u8, n: &Neighbors<'_, u8>| {
///     Ok(n.get(0).copied().unwrap_or(*prev))
/// });
/// let mut ca = Automaton::new(true, copy_left);
/// let a = ca.add_node(1);
/// let b = ca.add_node(2);
/// ca.add_edge(b, a)?;
///
/// for _ in 0..3 {
///     ca.step()?;
/// }
/// assert_eq!(*ca.current(b)?, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Automaton<T, R> {
    graph: Arc<Graph<AsyncState<T>>>,
    rule: Arc<R>,
    scratch: Arc<Pool<Vec<NodeIndex>>>,
    revision: u64,
    sweeps: u64,
}

impl<T: Clone, R: UpdateRule<T>> Automaton<T, R> {
    /// An empty automaton driven by `rule`.
    pub fn new(directed: bool, rule: R) -> Self {
        Self::from_state_graph(Graph::new(directed), rule)
    }

    /// Wrap every payload of an existing graph in a fresh phase-0 cell,
    /// keeping its adjacency.
    pub fn from_graph(graph: Graph<T>, rule: R) -> Self {
        Self::from_state_graph(graph.map(AsyncState::new), rule)
    }

    fn from_state_graph(graph: Graph<AsyncState<T>>, rule: R) -> Self {
        Self {
            graph: Arc::new(graph),
            rule: Arc::new(rule),
            scratch: Arc::new(Pool::new()),
            revision: 0,
            sweeps: 0,
        }
    }

    // ── Construction ────────────────────────────────────────────

    /// Add a cell with both buffers set to `value`, at phase 0.
    ///
    /// Indices are handed out as 0, 1, 2, … in call order.
    pub fn add_node(&mut self, value: T) -> NodeIndex {
        let graph = self.graph_mut();
        let index = NodeIndex(graph.len());
        graph.add_node(AsyncState::new(index, value))
    }

    /// Add the edge `from → to` (and `to → from` when undirected).
    /// Adding an existing edge changes nothing.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<(), GraphError> {
        self.graph.check(from)?;
        self.graph.check(to)?;
        self.graph_mut().add_edge(from, to)
    }

    /// Remove the edge `from → to` (and its mirror when undirected).
    /// Removing a missing edge changes nothing.
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<(), GraphError> {
        self.graph.check(from)?;
        self.graph.check(to)?;
        self.graph_mut().remove_edge(from, to)
    }

    /// Add every edge of `lattice` over nodes `0..lattice.cell_count()`.
    pub fn wire_lattice(&mut self, lattice: &Lattice) -> Result<(), GraphError> {
        if let Some(last) = lattice.cell_count().checked_sub(1) {
            self.graph.check(NodeIndex(last))?;
        }
        lattice.wire(self.graph_mut())
    }

    /// Re-initialise one cell to `value` at phase 0.
    ///
    /// Driver-side only: neighbours may now be up to two phases apart
    /// from this cell, and a cycle of cells at phases 0, 1 and 2 will
    /// never advance again. Reset whole regions together.
    pub fn reset_node(&mut self, index: NodeIndex, value: T) -> Result<(), GraphError> {
        self.graph.check(index)?;
        self.graph_mut().node_mut(index)?.reset(value);
        Ok(())
    }

    /// Re-initialise every cell to `value` at phase 0.
    pub fn reset_all(&mut self, value: T) {
        for cell in self.graph_mut().nodes_mut() {
            cell.reset(value.clone());
        }
    }

    /// Writable graph for a structural or reset edit. Bumps the revision.
    fn graph_mut(&mut self) -> &mut Graph<AsyncState<T>> {
        self.revision += 1;
        Arc::make_mut(&mut self.graph)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Whether the automaton has no cells.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    /// The full cell state at `index`.
    pub fn node(&self, index: NodeIndex) -> Result<&AsyncState<T>, GraphError> {
        self.graph.node(index)
    }

    /// The published value at `index`.
    pub fn current(&self, index: NodeIndex) -> Result<&T, GraphError> {
        self.graph.node(index).map(AsyncState::current)
    }

    /// Published values of every cell, in index order.
    pub fn currents(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.graph.nodes().iter().map(AsyncState::current)
    }

    /// The rotation phase at `index`.
    pub fn phase(&self, index: NodeIndex) -> Result<Phase, GraphError> {
        self.graph.node(index).map(AsyncState::phase)
    }

    /// Neighbours of `index`, in insertion order.
    pub fn neighbors(&self, index: NodeIndex) -> Result<&Slice<NodeIndex>, GraphError> {
        self.graph.neighbors(index)
    }

    /// Whether the cell at `index` would advance in the next sweep: no
    /// adjacent cell sits at phase `(r + 2) mod 3`. On a directed graph
    /// that covers the cells reading this one as well as those it reads.
    pub fn is_ready(&self, index: NodeIndex) -> Result<bool, GraphError> {
        sweep::is_ready(&self.graph, index)
    }

    /// Unwrap the automaton into a graph of published values, keeping
    /// the adjacency.
    pub fn into_graph(self) -> Graph<T> {
        Arc::unwrap_or_clone(self.graph).map(|_, cell| cell.into_current())
    }

    /// The underlying graph of cell states.
    pub fn graph(&self) -> &Graph<AsyncState<T>> {
        &self.graph
    }

    /// The injected update rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Counter bumped by every installed sweep and every edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of sweeps installed so far.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    // ── Stepping ────────────────────────────────────────────────

    /// Run one sweep on the calling thread.
    ///
    /// Every cell is evaluated against the same snapshot; no cell sees
    /// another cell's update from this sweep. Three sweeps from a
    /// uniform phase advance the automaton by one generation.
    ///
    /// # Errors
    ///
    /// [`StepError::RuleFailed`] for the first cell whose rule fails.
    /// Nothing is installed in that case.
    pub fn step(&mut self) -> Result<StepMetrics, StepError> {
        self.step_selected(|_| true)
    }

    /// Run one sweep in which only the cells accepted by `select` try to
    /// advance. The rest carry over unchanged and count as skipped.
    ///
    /// Lets a driver run cells at different rates; the readiness guard
    /// still keeps adjacent cells within one phase of each other, in
    /// either direction of a directed edge.
    pub fn step_selected(
        &mut self,
        mut select: impl FnMut(NodeIndex) -> bool,
    ) -> Result<StepMetrics, StepError> {
        let started = Instant::now();
        let mut metrics = StepMetrics::default();

        let next = {
            let graph = &*self.graph;
            let mut scratch = self.scratch.acquire();
            let mut next = Vec::with_capacity(graph.len());
            for (i, cell) in graph.nodes().iter().enumerate() {
                let index = NodeIndex(i);
                if select(index) {
                    next.push(sweep::advance_cell(
                        graph,
                        &*self.rule,
                        index,
                        &mut scratch,
                        &mut metrics,
                    )?);
                } else {
                    metrics.skipped += 1;
                    next.push(cell.clone());
                }
            }
            next
        };

        Arc::make_mut(&mut self.graph).replace_nodes(next)?;
        metrics.total_us = started.elapsed().as_micros() as u64;
        self.finish_sweep(&metrics);
        Ok(metrics)
    }

    /// Install a completed parallel sweep.
    ///
    /// # Errors
    ///
    /// [`StepError::StaleOutcome`] if the automaton was stepped or
    /// edited after the sweep was launched. The automaton is unchanged.
    pub fn install(&mut self, outcome: SweepOutcome<T>) -> Result<StepMetrics, StepError> {
        if outcome.revision != self.revision {
            return Err(StepError::StaleOutcome {
                launched_at: outcome.revision,
                current: self.revision,
            });
        }
        let SweepOutcome { nodes, metrics, .. } = outcome;
        Arc::make_mut(&mut self.graph).replace_nodes(nodes)?;
        self.finish_sweep(&metrics);
        Ok(metrics)
    }

    /// Wait for `pending` and install its result.
    pub fn post_step_async(&mut self, pending: PendingStep<T>) -> Result<StepMetrics, StepError> {
        let outcome = pending.wait()?;
        self.install(outcome)
    }

    fn finish_sweep(&mut self, metrics: &StepMetrics) {
        self.revision += 1;
        self.sweeps += 1;
        tracing::debug!(
            sweep = self.sweeps,
            computed = metrics.computed,
            settled = metrics.settled,
            stalled = metrics.stalled,
            skipped = metrics.skipped,
            chunks = metrics.chunks,
            total_us = metrics.total_us,
            "sweep installed"
        );
    }
}

impl<T, R> Automaton<T, R>
where
    T: Clone + Send + Sync + 'static,
    R: UpdateRule<T> + 'static,
{
    /// Launch one sweep across `workers`.
    ///
    /// Returns immediately. The sweep reads the snapshot published at
    /// launch; the automaton is not touched until the caller waits on
    /// the returned [`PendingStep`] and passes the outcome to
    /// [`install`](Automaton::install) (or calls
    /// [`post_step_async`](Automaton::post_step_async)).
    pub fn step_async(&self, workers: &WorkerPool) -> PendingStep<T> {
        sweep::launch(
            &self.graph,
            &self.rule,
            &self.scratch,
            workers,
            self.revision,
        )
    }
}

// ── Persistence ─────────────────────────────────────────────────

impl<T: Clone + Codec, R: UpdateRule<T>> Automaton<T, R> {
    /// Write the graph record, with every cell's buffers and phase, to `w`.
    pub fn save(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        self.graph.encode(w)
    }

    /// Read an automaton written by [`save`](Automaton::save), resuming
    /// exactly where it stopped (mid-rotation included).
    pub fn load(r: &mut dyn Read, rule: R) -> Result<Self, FileFormatError> {
        let mut graph = Graph::<AsyncState<T>>::decode(r)?;
        for (i, cell) in graph.nodes_mut().iter_mut().enumerate() {
            cell.set_index(NodeIndex(i));
        }
        Ok(Self::from_state_graph(graph, rule))
    }
}

impl<T, R> std::fmt::Debug for Automaton<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("nodes", &self.graph.len())
            .field("directed", &self.graph.is_directed())
            .field("revision", &self.revision)
            .field("sweeps", &self.sweeps)
            .finish()
    }
}
