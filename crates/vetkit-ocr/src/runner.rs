//! Ordered parallel fan-out over a bounded worker pool.

use rayon::prelude::*;
use tracing::info;

/// Fans a per-document function out over a bounded rayon pool.
///
/// All tasks are submitted eagerly and [`ExtractionRunner::run`] blocks
/// until every task completes; outputs are returned in input order no
/// matter which worker finishes first. There is deliberately no timeout or
/// cancellation by default - the worker count is the one policy knob, and
/// callers that need bounded execution can wrap the call themselves.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRunner {
    workers: usize,
}

impl ExtractionRunner {
    /// Create a runner sized to the host's available parallelism.
    #[must_use = "creates the runner that will fan out extraction"]
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism().map_or(1, usize::from);
        Self { workers }
    }

    /// Override the worker count. Clamped to at least one.
    #[must_use = "returns the runner with the new worker count"]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Worker count this runner will use.
    #[inline]
    #[must_use = "returns the configured worker count"]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f` to every item on the pool, preserving input order.
    ///
    /// `f` must not panic; extraction functions are expected to encode
    /// their failures in the output value instead.
    pub fn run<I, O, F>(&self, items: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        info!(
            "extracting {} documents with {} workers",
            items.len(),
            self.workers
        );

        // A dedicated pool keeps the worker bound local to this run
        // instead of mutating the global rayon pool.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build();

        match pool {
            Ok(pool) => pool.install(|| items.par_iter().map(&f).collect()),
            // Pool construction only fails in exotic environments; fall
            // back to sequential extraction rather than aborting the run.
            Err(_) => items.iter().map(&f).collect(),
        }
    }
}

impl Default for ExtractionRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[test]
    fn output_length_matches_input() {
        let runner = ExtractionRunner::new().with_workers(4);
        let items: Vec<u32> = (0..17).collect();
        let out = runner.run(&items, |i| i * 2);
        assert_eq!(out.len(), items.len());
    }

    #[test]
    fn empty_input_is_a_noop() {
        let runner = ExtractionRunner::new();
        let out: Vec<u32> = runner.run(&[] as &[u32], |i| *i);
        assert!(out.is_empty());
    }

    #[test]
    fn worker_count_is_clamped() {
        assert_eq!(ExtractionRunner::new().with_workers(0).workers(), 1);
    }

    proptest! {
        // Each task sleeps a randomized amount so completion order differs
        // from submission order; output order must still match input order.
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn preserves_input_order_under_random_delays(
            delays in prop::collection::vec(0_u64..5, 1..40),
            workers in 1_usize..8,
        ) {
            let runner = ExtractionRunner::new().with_workers(workers);
            let items: Vec<(usize, u64)> =
                delays.iter().copied().enumerate().collect();

            let out = runner.run(&items, |(index, delay)| {
                std::thread::sleep(Duration::from_millis(*delay));
                *index
            });

            let expected: Vec<usize> = (0..items.len()).collect();
            prop_assert_eq!(out, expected);
        }
    }
}
