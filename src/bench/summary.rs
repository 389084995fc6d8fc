//! Aggregation of task results into per-size averages.
//!
//! Every aggregate is a mean over tasks of the per-task averages, so it doesn't depend on
//! the order the tasks finished in.

use serde::{Deserialize, Serialize};

use super::runner::TestResult;
use super::task::Scenario;

/// The mean of the per-task averages of one size, for one scenario.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct SizeSummary {
    pub n: usize,
    /// The number of results averaged. Zero when every task of this size failed.
    pub tasks: usize,
    pub avg_insert_comparisons: f64,
    pub avg_insert_pointers: f64,
    pub avg_insert_height: f64,
    pub avg_delete_comparisons: f64,
    pub avg_delete_pointers: f64,
    pub avg_delete_height: f64,
    pub avg_total_time_ms: f64,
}

impl SizeSummary {
    /// Averages the results of size `n`. Results of other sizes are ignored.
    /// No results summarize to a row with no tasks and zero averages.
    pub fn of<'a>(n: usize, results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut res = SizeSummary {
            n,
            ..Default::default()
        };
        for result in results.into_iter().filter(|result| result.n == n) {
            res.tasks += 1;
            res.avg_insert_comparisons += result.insert_avg_comparisons;
            res.avg_insert_pointers += result.insert_avg_pointers;
            res.avg_insert_height += result.insert_avg_height;
            res.avg_delete_comparisons += result.delete_avg_comparisons;
            res.avg_delete_pointers += result.delete_avg_pointers;
            res.avg_delete_height += result.delete_avg_height;
            res.avg_total_time_ms += result.total_time_ms;
        }
        if res.tasks > 0 {
            let count = res.tasks as f64;
            res.avg_insert_comparisons /= count;
            res.avg_insert_pointers /= count;
            res.avg_insert_height /= count;
            res.avg_delete_comparisons /= count;
            res.avg_delete_pointers /= count;
            res.avg_delete_height /= count;
            res.avg_total_time_ms /= count;
        }
        res
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub avg_results: Vec<SizeSummary>,
}

/// Per-size averages of both scenarios.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Summary {
    pub ordered_scenario: ScenarioSummary,
    pub random_scenario: ScenarioSummary,
}

/// Every result of a benchmark, and their summary.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AllResults {
    pub ordered_results: Vec<TestResult>,
    pub random_results: Vec<TestResult>,
    pub summary: Summary,
}

impl AllResults {
    /// Splits the results by scenario, sorts each part by size and test number,
    /// and summarizes them for the given sizes.
    pub fn new(results: Vec<TestResult>, sizes: &[usize]) -> Self {
        let (mut ordered_results, mut random_results): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|result| result.scenario == Scenario::Ordered);
        ordered_results.sort_by_key(|result| (result.n, result.test_number));
        random_results.sort_by_key(|result| (result.n, result.test_number));

        let mut res = AllResults {
            ordered_results,
            random_results,
            summary: Summary::default(),
        };
        res.summary = calculate_summary(&res, sizes);
        res
    }

    pub fn len(&self) -> usize {
        self.ordered_results.len() + self.random_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn results(&self, scenario: Scenario) -> &[TestResult] {
        match scenario {
            Scenario::Ordered => &self.ordered_results,
            Scenario::Random => &self.random_results,
        }
    }
}

/// One row per size for each scenario, in the order of `sizes`.
/// A size without results gets a row with `tasks == 0`.
pub fn calculate_summary(results: &AllResults, sizes: &[usize]) -> Summary {
    let per_size = |scenario| ScenarioSummary {
        avg_results: sizes
            .iter()
            .map(|&n| SizeSummary::of(n, results.results(scenario)))
            .collect(),
    };
    Summary {
        ordered_scenario: per_size(Scenario::Ordered),
        random_scenario: per_size(Scenario::Random),
    }
}

/// A row of the condensed results.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct AveragedResult {
    pub n: usize,
    pub scenario: Scenario,
    pub tasks: usize,
    pub avg_insert_comparisons: f64,
    pub avg_insert_pointers: f64,
    pub avg_insert_height: f64,
    pub avg_delete_comparisons: f64,
    pub avg_delete_pointers: f64,
    pub avg_delete_height: f64,
    pub avg_total_time_ms: f64,
}

impl AveragedResult {
    fn new(scenario: Scenario, summary: SizeSummary) -> Self {
        AveragedResult {
            n: summary.n,
            scenario,
            tasks: summary.tasks,
            avg_insert_comparisons: summary.avg_insert_comparisons,
            avg_insert_pointers: summary.avg_insert_pointers,
            avg_insert_height: summary.avg_insert_height,
            avg_delete_comparisons: summary.avg_delete_comparisons,
            avg_delete_pointers: summary.avg_delete_pointers,
            avg_delete_height: summary.avg_delete_height,
            avg_total_time_ms: summary.avg_total_time_ms,
        }
    }
}

/// The condensed results: one row per size and scenario.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AveragedResults {
    pub averaged_results: Vec<AveragedResult>,
}

/// Condenses the results, in the order of `sizes`, ordered before random.
/// Unlike the summary, sizes and scenarios without results are skipped.
pub fn create_averaged_results(results: &AllResults, sizes: &[usize]) -> AveragedResults {
    let mut averaged_results = vec![];
    for &n in sizes {
        for &scenario in &[Scenario::Ordered, Scenario::Random] {
            let summary = SizeSummary::of(n, results.results(scenario));
            if summary.tasks > 0 {
                averaged_results.push(AveragedResult::new(scenario, summary));
            }
        }
    }
    AveragedResults { averaged_results }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(
        n: usize,
        test_number: usize,
        scenario: Scenario,
        avg_comparisons: f64,
        time: f64,
    ) -> TestResult {
        TestResult {
            n,
            test_number,
            scenario,
            insert_operations: vec![],
            delete_operations: vec![],
            insert_avg_comparisons: avg_comparisons,
            insert_max_comparisons: 0,
            insert_avg_pointers: 1.0,
            insert_max_pointers: 0,
            insert_avg_height: 2.0,
            insert_max_height: 0,
            delete_avg_comparisons: 2.0 * avg_comparisons,
            delete_max_comparisons: 0,
            delete_avg_pointers: 0.0,
            delete_max_pointers: 0,
            delete_avg_height: 0.0,
            delete_max_height: 0,
            total_time_ms: time,
        }
    }

    fn sample() -> AllResults {
        AllResults::new(
            vec![
                result(20, 2, Scenario::Random, 9.0, 3.0),
                result(10, 1, Scenario::Ordered, 4.0, 1.0),
                result(20, 1, Scenario::Random, 5.0, 1.0),
                result(10, 2, Scenario::Ordered, 6.0, 2.0),
            ],
            &[10, 20],
        )
    }

    #[test]
    fn results_are_split_and_sorted() {
        let all = sample();
        assert_eq!(all.len(), 4);
        let order: Vec<_> = all.random_results.iter().map(|r| (r.n, r.test_number)).collect();
        assert_eq!(order, vec![(20, 1), (20, 2)]);
        assert!(all.ordered_results.iter().all(|r| r.scenario == Scenario::Ordered));
    }

    #[test]
    fn summary_is_a_mean_of_means() {
        let summary = sample().summary;
        let ordered = &summary.ordered_scenario.avg_results;
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].n, 10);
        assert_eq!(ordered[0].tasks, 2);
        assert_eq!(ordered[0].avg_insert_comparisons, 5.0);
        assert_eq!(ordered[0].avg_delete_comparisons, 10.0);
        assert_eq!(ordered[0].avg_total_time_ms, 1.5);
        // no ordered results of size 20
        assert_eq!(ordered[1], SizeSummary { n: 20, tasks: 0, ..Default::default() });
        assert_eq!(summary.random_scenario.avg_results[1].avg_insert_comparisons, 7.0);
        assert_eq!(summary.random_scenario.avg_results[1].avg_insert_height, 2.0);
    }

    #[test]
    fn averaged_results_skip_missing_rows() {
        let averaged = create_averaged_results(&sample(), &[10, 20, 30]);
        let rows: Vec<_> = averaged.averaged_results.iter().map(|r| (r.n, r.scenario)).collect();
        assert_eq!(rows, vec![(10, Scenario::Ordered), (20, Scenario::Random)]);
        assert_eq!(averaged.averaged_results[1].avg_total_time_ms, 2.0);
        assert_eq!(averaged.averaged_results[1].tasks, 2);
    }

    #[test]
    fn a_size_whose_tasks_all_failed_has_no_tasks() {
        // the random task of size 20 is missing, as if it had panicked
        let all = AllResults::new(
            vec![
                result(10, 1, Scenario::Random, 4.0, 1.0),
                result(20, 1, Scenario::Ordered, 0.0, 0.0),
            ],
            &[10, 20],
        );
        let random = &all.summary.random_scenario.avg_results;
        assert_eq!((random[0].n, random[0].tasks), (10, 1));
        assert_eq!((random[1].n, random[1].tasks), (20, 0));
        assert_eq!(random[1].avg_insert_comparisons, 0.0);

        // a measured zero is told apart from a missing row
        let ordered = &all.summary.ordered_scenario.avg_results;
        assert_eq!((ordered[1].tasks, ordered[1].avg_insert_comparisons), (1, 0.0));
        assert_eq!(ordered[0].tasks, 0);
    }
}
