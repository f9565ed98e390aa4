//! The per-cell update and the parallel sweep future.
//!
//! Every sweep reads one immutable snapshot of the node array and builds
//! a complete replacement array; nothing is written in place. A
//! parallel sweep splits the index range into contiguous chunks, runs
//! each chunk as a worker job, and reassembles the chunks in order when
//! the caller waits on the [`PendingStep`].

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;

use gyre_core::{GraphError, NodeIndex};
use gyre_graph::Graph;
use gyre_pool::Pool;

use crate::error::StepError;
use crate::metrics::StepMetrics;
use crate::rule::{Neighbors, UpdateRule};
use crate::state::{AsyncState, Phase};
use crate::worker::WorkerPool;

/// Whether the cell at `index` may advance from `phase`: no adjacent
/// cell may sit at `phase.behind()`.
///
/// On a directed graph both the cells it reads and the cells that read
/// it count as adjacent, so a cell nobody is waiting on cannot race
/// ahead of its readers.
pub(crate) fn is_ready<T>(
    graph: &Graph<AsyncState<T>>,
    index: NodeIndex,
) -> Result<bool, GraphError> {
    let lagging = graph.node(index)?.phase().behind();
    let snapshot = graph.nodes();
    let behind = |n: &NodeIndex| snapshot[n.0].phase() == lagging;
    if graph.neighbors(index)?.iter().any(behind) {
        return Ok(false);
    }
    Ok(!(graph.is_directed() && graph.predecessors(index)?.iter().any(behind)))
}

/// Compute the successor of one cell against the snapshot in `graph`.
///
/// `scratch` receives the neighbour list handed to the rule; its prior
/// contents are discarded.
pub(crate) fn advance_cell<T, R>(
    graph: &Graph<AsyncState<T>>,
    rule: &R,
    index: NodeIndex,
    scratch: &mut Vec<NodeIndex>,
    metrics: &mut StepMetrics,
) -> Result<AsyncState<T>, StepError>
where
    T: Clone,
    R: UpdateRule<T> + ?Sized,
{
    let cell = graph.node(index)?;
    if !is_ready(graph, index)? {
        metrics.stalled += 1;
        return Ok(cell.clone());
    }

    match cell.phase() {
        Phase::Compute => {
            scratch.clear();
            scratch.extend(graph.neighbors(index)?.iter().copied());
            let view = Neighbors::new(graph.nodes(), scratch.as_slice());
            let next = rule
                .update(cell.current(), &view)
                .map_err(|reason| StepError::RuleFailed {
                    node: index,
                    reason,
                })?;
            metrics.computed += 1;
            Ok(cell.computed(next))
        }
        Phase::Published | Phase::Settling => {
            metrics.settled += 1;
            Ok(cell.settled())
        }
    }
}

/// Advance every cell in `range`, leasing one scratch list for the chunk.
fn compute_chunk<T, R>(
    graph: &Graph<AsyncState<T>>,
    rule: &R,
    scratch: &Pool<Vec<NodeIndex>>,
    range: Range<usize>,
) -> Result<(Vec<AsyncState<T>>, StepMetrics), StepError>
where
    T: Clone,
    R: UpdateRule<T> + ?Sized,
{
    let mut lease = scratch.acquire();
    let mut metrics = StepMetrics::default();
    let mut out = Vec::with_capacity(range.len());
    for i in range {
        out.push(advance_cell(graph, rule, NodeIndex(i), &mut lease, &mut metrics)?);
    }
    Ok((out, metrics))
}

struct ChunkReply<T> {
    chunk: usize,
    result: Result<(Vec<AsyncState<T>>, StepMetrics), StepError>,
}

/// Dispatch a full sweep of `graph` onto `workers`.
pub(crate) fn launch<T, R>(
    graph: &Arc<Graph<AsyncState<T>>>,
    rule: &Arc<R>,
    scratch: &Arc<Pool<Vec<NodeIndex>>>,
    workers: &WorkerPool,
    revision: u64,
) -> PendingStep<T>
where
    T: Clone + Send + Sync + 'static,
    R: UpdateRule<T> + 'static,
{
    let started = Instant::now();
    let len = graph.len();
    let chunk_size = workers.chunk_size();
    let chunks = len.div_ceil(chunk_size);
    let (reply_tx, reply_rx) = crossbeam_channel::bounded(chunks);

    for chunk in 0..chunks {
        let start = chunk * chunk_size;
        let range = start..(start + chunk_size).min(len);
        let graph = Arc::clone(graph);
        let rule = Arc::clone(rule);
        let scratch = Arc::clone(scratch);
        let reply = reply_tx.clone();
        workers.execute(move || {
            let result = compute_chunk(&graph, &*rule, &scratch, range);
            // Release the snapshot before reporting so the automaton can
            // reclaim it in place once the caller installs the result.
            drop((graph, rule, scratch));
            let _ = reply.send(ChunkReply { chunk, result });
        });
    }

    PendingStep {
        reply_rx,
        chunks,
        len,
        revision,
        started,
    }
}

/// A parallel sweep in flight.
///
/// Produced by [`Automaton::step_async`](crate::Automaton::step_async).
/// Nothing is installed until the caller passes the outcome of
/// [`wait`](PendingStep::wait) to [`Automaton::install`](crate::Automaton::install).
/// Dropping a `PendingStep` abandons the sweep; its workers finish their
/// chunks and the results are discarded.
#[must_use = "a sweep has no effect until its outcome is installed"]
pub struct PendingStep<T> {
    reply_rx: Receiver<ChunkReply<T>>,
    chunks: usize,
    len: usize,
    revision: u64,
    started: Instant,
}

impl<T> PendingStep<T> {
    /// Number of jobs the sweep was split into.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Whether every chunk has reported, so [`wait`](PendingStep::wait)
    /// will not block.
    pub fn is_finished(&self) -> bool {
        self.reply_rx.len() >= self.chunks
    }

    /// Block until every chunk has reported and assemble the new node array.
    ///
    /// # Errors
    ///
    /// The first [`StepError::RuleFailed`] reported by any chunk, or
    /// [`StepError::WorkerLost`] if a chunk never reports.
    pub fn wait(self) -> Result<SweepOutcome<T>, StepError> {
        let mut parts: Vec<Option<Vec<AsyncState<T>>>> = (0..self.chunks).map(|_| None).collect();
        let mut metrics = StepMetrics {
            chunks: self.chunks,
            ..StepMetrics::default()
        };

        for _ in 0..self.chunks {
            let reply = self.reply_rx.recv().map_err(|_| StepError::WorkerLost)?;
            let (nodes, chunk_metrics) = reply.result?;
            metrics.absorb(&chunk_metrics);
            parts[reply.chunk] = Some(nodes);
        }

        let mut nodes = Vec::with_capacity(self.len);
        for part in parts {
            nodes.extend(part.ok_or(StepError::WorkerLost)?);
        }
        metrics.total_us = self.started.elapsed().as_micros() as u64;

        Ok(SweepOutcome {
            nodes,
            metrics,
            revision: self.revision,
        })
    }
}

impl<T> std::fmt::Debug for PendingStep<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingStep")
            .field("chunks", &self.chunks)
            .field("reported", &self.reply_rx.len())
            .field("revision", &self.revision)
            .finish()
    }
}

/// The completed, not-yet-installed result of a parallel sweep.
#[derive(Debug)]
pub struct SweepOutcome<T> {
    pub(crate) nodes: Vec<AsyncState<T>>,
    pub(crate) metrics: StepMetrics,
    pub(crate) revision: u64,
}

impl<T> SweepOutcome<T> {
    /// The computed node array, in index order.
    pub fn nodes(&self) -> &[AsyncState<T>] {
        &self.nodes
    }

    /// Counters for the sweep.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// Revision of the snapshot the sweep was computed from.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
