//! Test utilities for gyre development.
//!
//! Instrumented [`UpdateRule`]s whose behaviour is easy to predict or
//! deliberately broken, plus graph and board fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use gyre_core::RuleError;
use gyre_engine::{Automaton, Neighbors, StepError, StepMetrics, UpdateRule};

/// Counts generations and checks neighbour alignment.
///
/// Each cell holds the number of generations it has computed. On every
/// compute the cell expects every neighbour to report the same count it
/// does and fails with [`RuleError::ConstraintViolation`] otherwise. Any
/// read of a value from the wrong generation therefore surfaces as a
/// step error.
pub struct GenerationRule;

impl UpdateRule<u64> for GenerationRule {
    fn update(&self, previous: &u64, neighbors: &Neighbors<'_, u64>) -> Result<u64, RuleError> {
        if let Some(other) = neighbors.iter().find(|n| **n != *previous) {
            return Err(RuleError::ConstraintViolation {
                constraint: format!("neighbour at generation {other}, reader at {previous}"),
            });
        }
        Ok(previous + 1)
    }
}

/// Next value = own value plus every neighbour's value, wrapping.
///
/// Order-sensitive enough that any mixing of generations changes the
/// result, cheap enough for large graphs.
pub struct SumRule;

impl UpdateRule<u64> for SumRule {
    fn update(&self, previous: &u64, neighbors: &Neighbors<'_, u64>) -> Result<u64, RuleError> {
        Ok(neighbors
            .iter()
            .fold(previous.wrapping_mul(31), |acc, n| acc.wrapping_add(*n)))
    }
}

/// Identity rule that fails once a cell's value reaches `at`.
pub struct FailingRule {
    pub at: u64,
}

impl UpdateRule<u64> for FailingRule {
    fn update(&self, previous: &u64, _neighbors: &Neighbors<'_, u64>) -> Result<u64, RuleError> {
        if *previous >= self.at {
            return Err(RuleError::ExecutionFailed {
                reason: format!("value {previous} reached {}", self.at),
            });
        }
        Ok(*previous)
    }
}

/// Identity rule that panics once a cell's value reaches `at`.
pub struct PanickingRule {
    pub at: u64,
}

impl UpdateRule<u64> for PanickingRule {
    fn update(&self, previous: &u64, _neighbors: &Neighbors<'_, u64>) -> Result<u64, RuleError> {
        assert!(*previous < self.at, "value {previous} reached {}", self.at);
        Ok(*previous)
    }
}

/// Identity rule that counts how often it is invoked.
#[derive(Default)]
pub struct CountingRule {
    calls: AtomicUsize,
}

impl CountingRule {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl UpdateRule<u64> for CountingRule {
    fn update(&self, previous: &u64, _neighbors: &Neighbors<'_, u64>) -> Result<u64, RuleError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(*previous)
    }
}

/// Run `generations` full rotations (three sweeps each), summing the metrics.
pub fn run_generations<T, R>(
    automaton: &mut Automaton<T, R>,
    generations: usize,
) -> Result<StepMetrics, StepError>
where
    T: Clone,
    R: UpdateRule<T>,
{
    let mut total = StepMetrics::default();
    for _ in 0..generations * 3 {
        let m = automaton.step()?;
        total.total_us += m.total_us;
        total.computed += m.computed;
        total.settled += m.settled;
        total.stalled += m.stalled;
        total.skipped += m.skipped;
    }
    Ok(total)
}
