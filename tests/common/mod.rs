use instrumented_trees::*;
use itertools::Itertools;
use rand::{self, Rng};
use std::collections::BTreeSet;

/// Something to perform in one round of tests
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RoundAction {
    Insert(Key),
    Delete(Key),
    Search(Key),
}

// keys are drawn from a small range, so that rounds hit present keys often
const MAX_KEY: Key = 300;

fn random_round_action(rng: &mut rand::prelude::ThreadRng) -> RoundAction {
    use RoundAction::*;
    let key = rng.gen_range(-MAX_KEY..=MAX_KEY);
    match rng.gen_range(0..3) {
        0 => Insert(key),
        1 => Delete(key),
        _ => Search(key),
    }
}

/// Runs the action on the tree and on the reference set.
/// Returns whether the key was present before the action, according to the tree.
pub fn run_round<T: InstrumentedTree>(
    action: RoundAction,
    tree: &mut T,
    model: &mut BTreeSet<Key>,
) -> bool {
    use RoundAction::*;
    let was_empty = tree.is_empty();
    let before = *tree.stats();
    let res = match action {
        Insert(key) => {
            let was_present = !model.insert(key);
            let len = tree.len();
            tree.insert(key);
            assert_eq!(tree.len(), if was_present { len } else { len + 1 });
            was_present
        }
        Delete(key) => {
            let was_present = model.remove(&key);
            let len = tree.len();
            tree.delete(key);
            assert_eq!(tree.len(), if was_present { len - 1 } else { len });
            was_present
        }
        Search(key) => {
            let found = tree.search(key);
            assert_eq!(found, model.contains(&key));
            found
        }
    };
    // even no-ops compare against the keys they pass
    if !was_empty {
        assert!(tree.stats().comparisons > before.comparisons, "{:?} compared nothing", action);
    }
    res
}

/// Checks that the tree holds exactly the keys of the model, in order.
pub fn assert_same_keys<T: InstrumentedTree>(tree: &T, model: &BTreeSet<Key>) {
    let keys = tree.in_order_keys();
    assert!(keys.iter().tuple_windows().all(|(a, b)| a < b), "{:?} isn't ascending", keys);
    assert_eq!(keys, model.iter().cloned().collect_vec());
    assert_eq!(tree.len(), model.len());
    assert_eq!(tree.root_key().is_none(), model.is_empty());
}

/// Runs the same random rounds on two trees, comparing them to each other and to a
/// reference set after every round.
pub fn check_consistency<T1: InstrumentedTree, T2: InstrumentedTree>(num_rounds: usize) {
    let mut rng = rand::thread_rng();
    let mut tree1 = T1::default();
    let mut tree2 = T2::default();
    let mut model1 = BTreeSet::new();
    let mut model2 = BTreeSet::new();

    for _ in 0..num_rounds {
        let action = random_round_action(&mut rng);
        let res1 = run_round(action, &mut tree1, &mut model1);
        let res2 = run_round(action, &mut tree2, &mut model2);
        assert_eq!(res1, res2, "trees disagree on {:?}", action);
        // This check takes `O(n)` time, but the trees stay around a few hundred keys.
        tree1.assert_correctness();
        tree2.assert_correctness();
        assert_same_keys(&tree1, &model1);
        assert_same_keys(&tree2, &model2);
    }
}

/// Inserts the keys, then deletes them in another order, checking the tree after every
/// operation. The tree must end up empty.
pub fn check_round_trip<T: InstrumentedTree>(inserts: &[Key], deletes: &[Key]) {
    let mut tree = T::default();
    let mut model = BTreeSet::new();
    for &key in inserts {
        run_round(RoundAction::Insert(key), &mut tree, &mut model);
        tree.assert_correctness();
    }
    assert_same_keys(&tree, &model);
    for &key in deletes {
        run_round(RoundAction::Delete(key), &mut tree, &mut model);
        tree.assert_correctness();
    }
    assert!(tree.is_empty(), "{} is left with {}", T::NAME, tree.representation());
    assert_eq!(tree.root_key(), None);
    assert_eq!(tree.height(), 0);
}

/// A version of `check_consistency` over a given sequence of rounds, for proptest.
pub fn check_consistency_proptest<T: InstrumentedTree>(
    actions: &[RoundAction],
) -> Result<(), proptest::test_runner::TestCaseError> {
    let mut tree = T::default();
    let mut model = BTreeSet::new();
    for &action in actions {
        run_round(action, &mut tree, &mut model);
        tree.assert_correctness();
        proptest::prop_assert_eq!(tree.in_order_keys(), model.iter().cloned().collect_vec());
    }
    Ok(())
}
