//! The benchmark harness.
//!
//! A benchmark runs, for every size and repetition, one task inserting the keys in
//! ascending order and one task inserting them in a seeded random order. Each task then
//! deletes all of its keys in another seeded random order. The cost of every single
//! operation is recorded, and the results are averaged per size.
//!
//! ```
//! use instrumented_trees::bench::*;
//!
//! let results = run_benchmark(TreeKind::RedBlack, &[100], 1, 2).unwrap();
//! assert_eq!(results.ordered_results.len(), 1);
//! assert_eq!(results.random_results.len(), 1);
//! ```

pub mod config;
pub mod pool;
pub mod report;
pub mod runner;
pub mod summary;
pub mod task;

pub use config::BenchConfig;
pub use runner::{run_single_test, run_task, TestResult};
pub use summary::{create_averaged_results, AllResults, AveragedResult, AveragedResults};
pub use task::{make_tasks, Scenario, TestTask, TreeKind};

use log::{info, warn};

use crate::error::{BenchError, BenchResult};
use pool::WorkerPool;

/// Runs the benchmark on trees of the given kind, with `workers` threads.
///
/// Fails if a size is listed twice.
///
/// The measurements only depend on the sizes and the repetition count: the number of
/// workers changes nothing but the running times.
pub fn run_benchmark(
    kind: TreeKind,
    sizes: &[usize],
    repetitions: usize,
    workers: usize,
) -> BenchResult<AllResults> {
    config::check_distinct_sizes(sizes)?;
    let tasks = make_tasks(sizes, repetitions);
    if tasks.is_empty() {
        return Err(BenchError::EmptyTaskSet);
    }

    let pool = WorkerPool::new(kind, workers);
    info!(
        "benchmarking {:?} trees: sizes {:?}, {} repetitions, {} tasks on {} workers",
        kind,
        sizes,
        repetitions,
        tasks.len(),
        pool.worker_count()
    );

    let mut submitted = 0;
    for &task in &tasks {
        if pool.submit(task).is_err() {
            warn!("the workers stopped taking tasks after {} of {}", submitted, tasks.len());
            break;
        }
        submitted += 1;
    }

    let results = pool.finish(submitted);
    info!("all {} tasks finished", results.len());
    Ok(AllResults::new(results, sizes))
}
