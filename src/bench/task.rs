//! The task model: which tree, how many keys, in which order, from which seed.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::trees::Key;

/// The seed offset between a task's insertion permutation and its deletion permutation.
pub const DELETE_SEED_OFFSET: u64 = 1000;

const ORDERED_SEED_FACTOR: u64 = 12345;
const RANDOM_SEED_FACTOR: u64 = 54321;

/// The order keys are inserted in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Keys `1..=n` in ascending order.
    Ordered,
    /// A seeded permutation of `1..=n`.
    Random,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Ordered => "ordered",
            Scenario::Random => "random",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which tree a benchmark measures.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    Unbalanced,
    RedBlack,
    Splay,
}

impl TreeKind {
    /// The prefix of the result files of this tree.
    pub fn file_prefix(self) -> &'static str {
        match self {
            TreeKind::Unbalanced => "bst",
            TreeKind::RedBlack => "rbbst",
            TreeKind::Splay => "splay",
        }
    }
}

impl std::str::FromStr for TreeKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bst" | "unbalanced" => Ok(TreeKind::Unbalanced),
            "rb" | "rbbst" | "red_black" | "redblack" => Ok(TreeKind::RedBlack),
            "splay" => Ok(TreeKind::Splay),
            other => Err(BenchError::Config(format!("unknown tree kind `{}`", other))),
        }
    }
}

/// A single measurement: build a tree from `n` keys, then delete all of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TestTask {
    pub n: usize,
    /// The repetition number, starting from 1.
    pub test_number: usize,
    pub scenario: Scenario,
    pub seed: u64,
}

impl TestTask {
    /// The keys in the order they are inserted.
    pub fn insert_sequence(&self) -> Vec<Key> {
        match self.scenario {
            Scenario::Ordered => (1..=self.n as Key).collect(),
            Scenario::Random => permutation(self.n, self.seed),
        }
    }

    /// The keys in the order they are deleted. Always a permutation.
    pub fn delete_sequence(&self) -> Vec<Key> {
        permutation(self.n, self.seed.wrapping_add(DELETE_SEED_OFFSET))
    }
}

/// A permutation of `1..=n`, fully determined by the seed.
/// Uses its own generator, so concurrent callers never share random state.
pub fn permutation(n: usize, seed: u64) -> Vec<Key> {
    let mut keys: Vec<Key> = (1..=n as Key).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    keys.shuffle(&mut rng);
    keys
}

/// All the tasks of a benchmark, sizes first, then repetitions, each repetition
/// running the ordered scenario and then the random one.
///
/// Seeds come from the global position of the task in this list, so they are the same
/// no matter how the tasks are scheduled.
pub fn make_tasks(sizes: &[usize], repetitions: usize) -> Vec<TestTask> {
    let mut tasks = Vec::with_capacity(sizes.len() * repetitions * 2);
    for &n in sizes {
        for test_number in 1..=repetitions {
            for &(scenario, factor) in &[
                (Scenario::Ordered, ORDERED_SEED_FACTOR),
                (Scenario::Random, RANDOM_SEED_FACTOR),
            ] {
                let seed = tasks.len() as u64 * factor;
                tasks.push(TestTask {
                    n,
                    test_number,
                    scenario,
                    seed,
                });
            }
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_are_seeded() {
        let a = permutation(100, 7);
        assert_eq!(a, permutation(100, 7));
        assert_ne!(a, permutation(100, 8));
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=100).collect::<Vec<Key>>());
        assert!(permutation(0, 7).is_empty());
    }

    #[test]
    fn tasks_are_numbered_globally() {
        let tasks = make_tasks(&[10, 20], 2);
        assert_eq!(tasks.len(), 8);
        let seeds: Vec<u64> = tasks.iter().map(|t| t.seed).collect();
        assert_eq!(
            seeds,
            vec![0, 54321, 2 * 12345, 3 * 54321, 4 * 12345, 5 * 54321, 6 * 12345, 7 * 54321]
        );
        assert_eq!(tasks[5].n, 20);
        assert_eq!(tasks[5].test_number, 1);
        assert_eq!(tasks[5].scenario, Scenario::Random);
    }

    #[test]
    fn ordered_tasks_insert_ascending_and_delete_randomly() {
        let task = make_tasks(&[50], 1)[0];
        assert_eq!(task.insert_sequence(), (1..=50).collect::<Vec<Key>>());
        assert_eq!(task.delete_sequence(), permutation(50, 1000));
    }

    #[test]
    fn tree_kinds_parse() {
        assert_eq!("BST".parse::<TreeKind>().unwrap(), TreeKind::Unbalanced);
        assert_eq!("rbbst".parse::<TreeKind>().unwrap(), TreeKind::RedBlack);
        assert_eq!("splay".parse::<TreeKind>().unwrap(), TreeKind::Splay);
        assert!("avl".parse::<TreeKind>().is_err());
    }
}
