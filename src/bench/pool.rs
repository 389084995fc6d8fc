//! A fixed size pool of worker threads running benchmark tasks.
//!
//! Tasks go in through a bounded queue shared by all the workers, and results come out
//! through a single result queue. Every task builds its own tree, so nothing else is shared
//! between workers.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SendError, Sender, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use super::runner::*;
use super::task::*;

/// How many submitted tasks may wait for a worker before `submit` blocks.
pub const TASK_QUEUE_BOUND: usize = 100;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// The number of workers actually used for a requested count:
/// at least one, and at most the available hardware parallelism.
pub fn worker_count(requested: usize) -> usize {
    let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    requested.clamp(1, available)
}

/// What a worker reports back for a task: its result, or the task itself if running it
/// panicked.
type Outcome = Result<TestResult, TestTask>;

/// What a worker does with a task.
pub type Runner = Arc<dyn Fn(&TestTask) -> TestResult + Send + Sync>;

#[derive(destructure)]
pub struct WorkerPool {
    /// `None` once the pool stops taking tasks.
    tasks: Option<SyncSender<TestTask>>,
    results: Receiver<Outcome>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `worker_count(workers)` workers, running their tasks on trees of the given kind.
    pub fn new(kind: TreeKind, workers: usize) -> Self {
        WorkerPool::with_runner(workers, move |task: &TestTask| run_task(kind, task))
    }

    /// Starts `worker_count(workers)` workers, running every task through `runner`.
    pub fn with_runner<F>(workers: usize, runner: F) -> Self
    where
        F: Fn(&TestTask) -> TestResult + Send + Sync + 'static,
    {
        let runner: Runner = Arc::new(runner);
        let count = worker_count(workers);
        if count != workers {
            warn!("using {} workers instead of the requested {}", count, workers);
        }

        let (task_sender, task_receiver) = mpsc::sync_channel(TASK_QUEUE_BOUND);
        let task_receiver = Arc::new(Mutex::new(task_receiver));
        let (result_sender, results) = mpsc::channel();

        let workers = (0..count)
            .map(|id| {
                let tasks = Arc::clone(&task_receiver);
                let results = result_sender.clone();
                let runner = Arc::clone(&runner);
                thread::spawn(move || worker_loop(id, runner, tasks, results))
            })
            .collect();

        WorkerPool {
            tasks: Some(task_sender),
            results,
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queues a task, blocking while the queue is full.
    /// Fails, giving the task back, only if every worker is gone.
    pub fn submit(&self, task: TestTask) -> Result<(), SendError<TestTask>> {
        match &self.tasks {
            Some(sender) => sender.send(task),
            None => Err(SendError(task)),
        }
    }

    /// Stops taking tasks, and waits for the queued ones to finish.
    /// Returns the results in completion order. Tasks that panicked are logged and left out.
    pub fn finish(self, expected: usize) -> Vec<TestResult> {
        let (tasks, results, workers) = self.destructure();
        // closing the queue lets the workers run out of tasks and exit
        drop(tasks);

        let mut progress = Progress::new(expected);
        let mut collected = Vec::with_capacity(expected);
        // ends once every worker has exited and dropped its sender
        for outcome in results.iter() {
            match outcome {
                Ok(result) => {
                    progress.record(result.n, result.scenario);
                    collected.push(result);
                }
                Err(task) => progress.record(task.n, task.scenario),
            }
        }
        join_all(workers);

        if collected.len() != expected {
            warn!(
                "{} of {} tasks produced no result",
                expected.saturating_sub(collected.len()),
                expected
            );
        }
        collected
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.tasks = None;
        join_all(std::mem::take(&mut self.workers));
    }
}

fn join_all(workers: Vec<JoinHandle<()>>) {
    for worker in workers {
        if worker.join().is_err() {
            error!("a benchmark worker thread panicked outside of a task");
        }
    }
}

fn worker_loop(
    id: usize,
    runner: Runner,
    tasks: Arc<Mutex<Receiver<TestTask>>>,
    results: Sender<Outcome>,
) {
    debug!("worker {} started", id);
    loop {
        // the lock is only held while waiting for the next task
        let next = match tasks.lock() {
            Ok(receiver) => receiver.recv(),
            Err(poisoned) => poisoned.into_inner().recv(),
        };
        let task = match next {
            Ok(task) => task,
            Err(_) => break, // queue closed and drained
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| runner(&task)));
        let outcome = outcome.map_err(|payload| {
            error!(
                "worker {}: task n={} #{} ({}) panicked: {}",
                id,
                task.n,
                task.test_number,
                task.scenario,
                panic_message(payload.as_ref())
            );
            task
        });
        if results.send(outcome).is_err() {
            break; // nobody is collecting anymore
        }
    }
    debug!("worker {} finished", id);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

/// Rate limited progress logging.
struct Progress {
    total: usize,
    completed: usize,
    start: Instant,
    last_report: Instant,
}

impl Progress {
    fn new(total: usize) -> Self {
        let now = Instant::now();
        Progress {
            total,
            completed: 0,
            start: now,
            last_report: now,
        }
    }

    fn record(&mut self, n: usize, scenario: Scenario) {
        self.completed += 1;
        let now = Instant::now();
        let recent = now.duration_since(self.last_report) < PROGRESS_INTERVAL;
        if self.completed < self.total && recent {
            return;
        }
        self.last_report = now;

        let elapsed = now.duration_since(self.start);
        let left = self.total.saturating_sub(self.completed);
        let remaining = elapsed.mul_f64(left as f64 / self.completed as f64);
        info!(
            "progress: {}/{} ({:.1}%) | elapsed {:.0?} | remaining ~{:.0?} | last: n={} ({})",
            self.completed,
            self.total,
            100.0 * self.completed as f64 / self.total.max(1) as f64,
            elapsed,
            remaining,
            n,
            scenario
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_clamped() {
        assert_eq!(worker_count(0), 1);
        assert_eq!(worker_count(1), 1);
        let max = worker_count(usize::MAX);
        assert!(max >= 1);
        assert_eq!(worker_count(max), max);
    }

    #[test]
    fn every_task_comes_back() {
        let tasks = make_tasks(&[20, 40], 3);
        let pool = WorkerPool::new(TreeKind::RedBlack, 4);
        for &task in &tasks {
            pool.submit(task).unwrap();
        }
        let mut results = pool.finish(tasks.len());
        assert_eq!(results.len(), tasks.len());
        results.sort_by_key(|r| (r.n, r.test_number, r.scenario));
        let keys: Vec<_> = results
            .iter()
            .map(|r| (r.n, r.test_number, r.scenario))
            .collect();
        let mut expected: Vec<_> = tasks
            .iter()
            .map(|t| (t.n, t.test_number, t.scenario))
            .collect();
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn dropping_an_unfinished_pool_joins_the_workers() {
        let pool = WorkerPool::new(TreeKind::Splay, 2);
        for task in make_tasks(&[10], 2) {
            pool.submit(task).unwrap();
        }
        drop(pool);
    }

    #[test]
    fn a_panicking_task_is_dropped() {
        let tasks = make_tasks(&[13, 20], 2);
        let pool = WorkerPool::with_runner(2, |task: &TestTask| {
            if task.n == 13 && task.test_number == 2 && task.scenario == Scenario::Random {
                panic!("failing on purpose");
            }
            run_task(TreeKind::RedBlack, task)
        });
        for &task in &tasks {
            pool.submit(task).unwrap();
        }
        let mut results = pool.finish(tasks.len());
        assert_eq!(results.len(), tasks.len() - 1);

        results.sort_by_key(|r| (r.n, r.test_number, r.scenario));
        let failed = (13, 2, Scenario::Random);
        assert!(results
            .iter()
            .all(|r| (r.n, r.test_number, r.scenario) != failed));
        // the surviving results are the same as running the tasks alone
        for result in &results {
            let id = (result.n, result.test_number, result.scenario);
            let task = tasks
                .iter()
                .find(|t| (t.n, t.test_number, t.scenario) == id)
                .unwrap();
            let mut alone = run_task(TreeKind::RedBlack, task);
            alone.total_time_ms = result.total_time_ms;
            assert_eq!(&alone, result);
        }
    }
}
