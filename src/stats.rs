//! Operation counters carried by every tree.
//!
//! Each tree owns exactly one [`Stats`], and every structural primitive of the tree
//! (a key comparison, a link mutation, a rotation, a splay) bumps the matching counter.
//! The counters are the measured output of the benchmark, so they are exact and never
//! sampled.

use serde::{Deserialize, Serialize};

/// The mutable counters of a single tree.
///
/// Counters only grow between two calls to [`Stats::reset`]. Reading the counters
/// before and after a single operation gives the cost of that operation,
/// see [`Stats::delta_since`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub comparisons: u64,
    pub pointer_updates: u64,
    pub rotations: u64,
    pub splays: u64,
    /// The height as computed by the last call to `height()` on the owning tree.
    /// Not a counter: it is overwritten, never accumulated.
    pub height: usize,
}

impl Stats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Zeroes all the counters. The tree itself is left as is.
    pub fn reset(&mut self) {
        *self = Stats::new();
    }

    #[inline]
    pub(crate) fn compare(&mut self) {
        self.comparisons += 1;
    }

    #[inline]
    pub(crate) fn compare_n(&mut self, n: u64) {
        self.comparisons += n;
    }

    #[inline]
    pub(crate) fn update(&mut self) {
        self.pointer_updates += 1;
    }

    #[inline]
    pub(crate) fn update_n(&mut self, n: u64) {
        self.pointer_updates += n;
    }

    #[inline]
    pub(crate) fn rotate(&mut self) {
        self.rotations += 1;
    }

    #[inline]
    pub(crate) fn splay(&mut self) {
        self.splays += 1;
    }

    /// Returns the cost of everything that happened since `earlier` was read,
    /// together with the given height.
    ///
    /// `earlier` must be a snapshot of the same counters taken after the last reset.
    pub fn delta_since(&self, earlier: &Stats, height: usize) -> OperationStats {
        debug_assert!(self.comparisons >= earlier.comparisons);
        debug_assert!(self.pointer_updates >= earlier.pointer_updates);
        OperationStats {
            comparisons: self.comparisons - earlier.comparisons,
            pointer_updates: self.pointer_updates - earlier.pointer_updates,
            height,
        }
    }
}

/// The measured cost of a single insert or delete, and the tree height right after it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct OperationStats {
    pub comparisons: u64,
    pub pointer_updates: u64,
    pub height: usize,
}

/// Average and maximum over a sequence of [`OperationStats`].
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub avg_comparisons: f64,
    pub max_comparisons: u64,
    pub avg_pointers: f64,
    pub max_pointers: u64,
    pub avg_height: f64,
    pub max_height: usize,
}

impl PhaseSummary {
    /// Summarizes a phase. An empty phase summarizes to all zeroes.
    pub fn of(ops: &[OperationStats]) -> Self {
        if ops.is_empty() {
            return Default::default();
        }
        let mut total_comp = 0u64;
        let mut total_ptr = 0u64;
        let mut total_height = 0u64;
        let mut res = PhaseSummary::default();
        for op in ops {
            total_comp += op.comparisons;
            total_ptr += op.pointer_updates;
            total_height += op.height as u64;
            res.max_comparisons = res.max_comparisons.max(op.comparisons);
            res.max_pointers = res.max_pointers.max(op.pointer_updates);
            res.max_height = res.max_height.max(op.height);
        }
        let count = ops.len() as f64;
        res.avg_comparisons = total_comp as f64 / count;
        res.avg_pointers = total_ptr as f64 / count;
        res.avg_height = total_height as f64 / count;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_everything() {
        let mut stats = Stats::new();
        stats.compare_n(4);
        stats.update();
        stats.rotate();
        stats.splay();
        stats.height = 7;
        stats.reset();
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn delta_is_difference_of_snapshots() {
        let mut stats = Stats::new();
        stats.compare_n(3);
        let before = stats;
        stats.compare_n(5);
        stats.update_n(2);
        let delta = stats.delta_since(&before, 4);
        assert_eq!(
            delta,
            OperationStats {
                comparisons: 5,
                pointer_updates: 2,
                height: 4
            }
        );
    }

    #[test]
    fn phase_summary_averages_and_maxima() {
        let ops = [
            OperationStats {
                comparisons: 2,
                pointer_updates: 1,
                height: 1,
            },
            OperationStats {
                comparisons: 6,
                pointer_updates: 3,
                height: 2,
            },
        ];
        let s = PhaseSummary::of(&ops);
        assert_eq!(s.avg_comparisons, 4.0);
        assert_eq!(s.max_comparisons, 6);
        assert_eq!(s.avg_pointers, 2.0);
        assert_eq!(s.max_pointers, 3);
        assert_eq!(s.avg_height, 1.5);
        assert_eq!(s.max_height, 2);
        assert_eq!(PhaseSummary::of(&[]), PhaseSummary::default());
    }
}
