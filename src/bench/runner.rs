//! Running a single task on a fresh tree.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::task::*;
use crate::stats::{OperationStats, PhaseSummary};
use crate::trees::{basic_tree::UnbalancedTree, red_black::RedBlackTree, splay::SplayTree};
use crate::trees::{InstrumentedTree, Key};

/// The measurements of a single task.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub n: usize,
    pub test_number: usize,
    pub scenario: Scenario,
    pub insert_operations: Vec<OperationStats>,
    pub delete_operations: Vec<OperationStats>,
    pub insert_avg_comparisons: f64,
    pub insert_max_comparisons: u64,
    pub insert_avg_pointers: f64,
    pub insert_max_pointers: u64,
    pub insert_avg_height: f64,
    pub insert_max_height: usize,
    pub delete_avg_comparisons: f64,
    pub delete_max_comparisons: u64,
    pub delete_avg_pointers: f64,
    pub delete_max_pointers: u64,
    pub delete_avg_height: f64,
    pub delete_max_height: usize,
    /// Wall clock time of the whole task, in milliseconds.
    pub total_time_ms: f64,
}

impl TestResult {
    fn new(
        task: &TestTask,
        insert_operations: Vec<OperationStats>,
        delete_operations: Vec<OperationStats>,
    ) -> Self {
        let ins = PhaseSummary::of(&insert_operations);
        let del = PhaseSummary::of(&delete_operations);
        TestResult {
            n: task.n,
            test_number: task.test_number,
            scenario: task.scenario,
            insert_operations,
            delete_operations,
            insert_avg_comparisons: ins.avg_comparisons,
            insert_max_comparisons: ins.max_comparisons,
            insert_avg_pointers: ins.avg_pointers,
            insert_max_pointers: ins.max_pointers,
            insert_avg_height: ins.avg_height,
            insert_max_height: ins.max_height,
            delete_avg_comparisons: del.avg_comparisons,
            delete_max_comparisons: del.max_comparisons,
            delete_avg_pointers: del.avg_pointers,
            delete_max_pointers: del.max_pointers,
            delete_avg_height: del.avg_height,
            delete_max_height: del.max_height,
            total_time_ms: 0.0,
        }
    }
}

/// Applies `op` to every key in turn, recording the cost of each call and the height
/// right after it.
fn measure_phase<T: InstrumentedTree>(
    tree: &mut T,
    keys: &[Key],
    op: impl Fn(&mut T, Key),
) -> Vec<OperationStats> {
    let mut res = Vec::with_capacity(keys.len());
    for &key in keys {
        let before = *tree.stats();
        op(tree, key);
        let height = tree.height();
        res.push(tree.stats().delta_since(&before, height));
    }
    res
}

/// Runs the task on a fresh tree of type `T`: inserts every key, resets the counters,
/// then deletes every key in an independent random order.
pub fn run_single_test<T: InstrumentedTree>(task: &TestTask) -> TestResult {
    let start = Instant::now();
    let mut tree = T::default();

    let inserts = measure_phase(&mut tree, &task.insert_sequence(), |tree, key| tree.insert(key));
    tree.reset_stats();
    let deletes = measure_phase(&mut tree, &task.delete_sequence(), |tree, key| tree.delete(key));
    debug_assert!(tree.is_empty());

    let mut result = TestResult::new(task, inserts, deletes);
    result.total_time_ms = start.elapsed().as_secs_f64() * 1e3;
    result
}

/// Runs the task on the tree of the given kind.
pub fn run_task(kind: TreeKind, task: &TestTask) -> TestResult {
    match kind {
        TreeKind::Unbalanced => run_single_test::<UnbalancedTree>(task),
        TreeKind::RedBlack => run_single_test::<RedBlackTree>(task),
        TreeKind::Splay => run_single_test::<SplayTree>(task),
    }
}
