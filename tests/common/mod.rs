use mergeable_treap::example_data::*;
use mergeable_treap::{Error, KeyTree, SeqTree};
use proptest::prelude::*;
use rand::{self, Rng};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

pub type Seq = SeqTree<SeqNum<i32>>;
pub type Set = KeyTree<KeyedNum<i32, i64>>;

/// Something to perform in one round of tests on a sequence.
/// Positions are 1-based and ranges inclusive, and they aren't necessarily valid.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoundAction {
    Act {
        start: usize,
        end: usize,
        action: RevAdd<i32>,
    },
    Query {
        start: usize,
        end: usize,
    },
    Insert {
        index: usize,
        value: i32,
    },
    Delete {
        index: usize,
    },
    Select {
        index: usize,
    },
}

/// The result after one round on a sequence
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoundResult {
    Done,
    Summary(SizedSum<i32>),
    Value(i32),
    Failed(Error),
}

/// Performs the round on a plain vector.
pub fn run_model(round_action: &RoundAction, model: &mut Vec<i32>) -> RoundResult {
    use RoundAction::*;
    use RoundResult::*;

    let len = model.len();
    let valid_range = |start: usize, end: usize| 1 <= start && start <= end && end <= len;
    match *round_action {
        Act { start, end, action } => {
            if !valid_range(start, end) {
                return Failed(Error::InvalidRange);
            }
            let segment = &mut model[start - 1..end];
            if action.to_reverse {
                segment.reverse();
            }
            for value in segment.iter_mut() {
                *value += action.add;
            }
            Done
        }
        Query { start, end } => {
            if !valid_range(start, end) {
                return Failed(Error::InvalidRange);
            }
            Summary(SizedSum {
                size: end + 1 - start,
                sum: model[start - 1..end].iter().sum(),
            })
        }
        Insert { index, value } => {
            if index == 0 || index > len + 1 {
                return Failed(Error::IndexOutOfRange { index, len });
            }
            model.insert(index - 1, value);
            Done
        }
        Delete { index } | Select { index } if index == 0 || index > len => {
            Failed(Error::IndexOutOfRange { index, len })
        }
        Delete { index } => Value(model.remove(index - 1)),
        Select { index } => Value(model[index - 1]),
    }
}

/// Performs the round on the tree.
pub fn run_round(round_action: &RoundAction, tree: &mut Seq) -> RoundResult {
    use RoundAction::*;
    use RoundResult::*;

    let res = match *round_action {
        Act { start, end, action } => tree.act_range(start, end, action).map(|()| Done),
        Query { start, end } => tree.range_summary(start, end).map(Summary),
        Insert { index, value } => tree.insert(index, value).map(|()| Done),
        Delete { index } => tree.delete(index).map(Value),
        Select { index } => tree.select(index).map(|value| Value(*value)),
    };
    res.unwrap_or_else(Failed)
}

const MAX_ADD: i32 = 200;
fn random_action(rng: &mut rand::prelude::ThreadRng) -> RevAdd<i32> {
    RevAdd {
        to_reverse: rng.gen(),
        add: rng.gen_range(-MAX_ADD..=MAX_ADD),
    }
}

/// A range that is usually valid, and sometimes sticks out of the sequence.
fn random_range(rng: &mut rand::prelude::ThreadRng, len: usize) -> (usize, usize) {
    let res = (rng.gen_range(0..len + 2), rng.gen_range(0..len + 2));
    if res.0 <= res.1 {
        res
    } else {
        (res.1, res.0)
    }
}

fn random_round_action(rng: &mut rand::prelude::ThreadRng, len: usize) -> RoundAction {
    use RoundAction::*;
    match rng.gen_range(0..5) {
        0 => {
            let (start, end) = random_range(rng, len);
            let action = random_action(rng);
            Act { start, end, action }
        }
        1 => {
            let (start, end) = random_range(rng, len);
            Query { start, end }
        }
        2 => Insert {
            index: rng.gen_range(0..len + 3),
            value: rng.gen_range(-MAX_ADD..=MAX_ADD),
        },
        3 => Delete {
            index: rng.gen_range(0..len + 2),
        },
        _ => Select {
            index: rng.gen_range(0..len + 2),
        },
    }
}

const INITIAL_SIZE: i32 = 200;
pub fn check_consistency(num_rounds: u32) {
    let mut rng = rand::thread_rng();
    let mut model: Vec<i32> = (0..INITIAL_SIZE).collect();
    let mut tree: Seq = model.iter().cloned().collect();

    for _ in 0..num_rounds {
        let round_action = random_round_action(&mut rng, model.len());
        let expected = run_model(&round_action, &mut model);
        let res = run_round(&round_action, &mut tree);
        assert_eq!(res, expected, "after {:?}", round_action);

        let summary = tree.summary();
        assert_eq!(summary.size, model.len());
        assert_eq!(summary.sum, model.iter().sum::<i32>());
        // This check takes `O(n)` time, but the tree stays small in this test.
        tree.assert_correctness();
    }
    assert_eq!(tree.to_sequence(), model);
}

pub fn check_consistency_proptest(
    initial: &[i32],
    round_actions: &[RoundAction],
) -> Result<(), TestCaseError> {
    let mut model = initial.to_vec();
    let mut tree: Seq = initial.iter().cloned().collect();

    for round_action in round_actions {
        let expected = run_model(round_action, &mut model);
        let res = run_round(round_action, &mut tree);
        prop_assert_eq!(res, expected);
        prop_assert_eq!(tree.len(), model.len());
        tree.assert_correctness();
    }
    prop_assert_eq!(tree.to_sequence(), model);
    Ok(())
}

/// Something to perform in one round of tests on a key ordered multiset.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum KeyRoundAction {
    Insert { key: i32, payload: i64 },
    Delete { key: i32 },
    Rank { key: i32 },
    Select { index: usize },
    Predecessor { key: i32 },
    Successor { key: i32 },
    Add { start: i32, end: i32, delta: i64 },
}

/// The result after one round on a key ordered multiset
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum KeyRoundResult {
    Done,
    Ranked(usize),
    Found(Entry<i32, i64>),
    Failed(Error),
}

/// The multiset model: every key maps to its payload and its count.
pub type KeyModel = BTreeMap<i32, (i64, usize)>;

fn model_entry((&key, &(payload, count)): (&i32, &(i64, usize))) -> Entry<i32, i64> {
    Entry {
        key,
        payload,
        count,
    }
}

pub fn model_entries(model: &KeyModel) -> Vec<Entry<i32, i64>> {
    model.iter().map(model_entry).collect()
}

/// Performs the round on a `BTreeMap`.
pub fn run_key_model(round_action: &KeyRoundAction, model: &mut KeyModel) -> KeyRoundResult {
    use KeyRoundAction::*;
    use KeyRoundResult::*;

    let found = |entry: Option<(&i32, &(i64, usize))>| match entry {
        Some(entry) => Found(model_entry(entry)),
        None => Failed(Error::NotFound),
    };
    match *round_action {
        Insert { key, payload } => {
            model.entry(key).or_insert((payload, 0)).1 += 1;
            Done
        }
        Delete { key } => match model.get_mut(&key) {
            None => Failed(Error::NotFound),
            Some((_, count)) if *count > 1 => {
                *count -= 1;
                Done
            }
            Some(_) => {
                model.remove(&key);
                Done
            }
        },
        Rank { key } => Ranked(model.range(..key).map(|(_, &(_, count))| count).sum()),
        Select { index } => {
            let len: usize = model.values().map(|&(_, count)| count).sum();
            if index == 0 || index > len {
                return Failed(Error::IndexOutOfRange { index, len });
            }
            let mut before = 0;
            for entry in model.iter() {
                before += (entry.1).1;
                if before >= index {
                    return Found(model_entry(entry));
                }
            }
            unreachable!()
        }
        Predecessor { key } => found(model.range(..key).next_back()),
        Successor { key } => found(model.range((Excluded(key), Unbounded)).next()),
        Add { start, end, delta } => {
            if start > end {
                return Failed(Error::InvalidRange);
            }
            for (_, (payload, _)) in model.range_mut(start..=end) {
                *payload += delta;
            }
            Done
        }
    }
}

/// Performs the round on the tree.
pub fn run_key_round(round_action: &KeyRoundAction, tree: &mut Set) -> KeyRoundResult {
    use KeyRoundAction::*;
    use KeyRoundResult::*;

    let res = match *round_action {
        Insert { key, payload } => {
            tree.insert(Entry::new(key, payload));
            Ok(Done)
        }
        Delete { key } => tree.delete(&key).map(|()| Done),
        Rank { key } => Ok(Ranked(tree.rank(&key))),
        Select { index } => tree.select(index).map(|entry| Found(*entry)),
        Predecessor { key } => tree.predecessor(&key).map(|entry| Found(*entry)),
        Successor { key } => tree.successor(&key).map(|entry| Found(*entry)),
        Add { start, end, delta } => tree.range_add(&start, &end, delta).map(|()| Done),
    };
    res.unwrap_or_else(Failed)
}

pub fn check_key_consistency_proptest(
    initial: &[(i32, i64)],
    round_actions: &[KeyRoundAction],
) -> Result<(), TestCaseError> {
    let mut model = KeyModel::new();
    let mut tree = Set::new();
    for &(key, payload) in initial {
        run_key_model(&KeyRoundAction::Insert { key, payload }, &mut model);
        tree.insert(Entry::new(key, payload));
    }

    for round_action in round_actions {
        let expected = run_key_model(round_action, &mut model);
        let res = run_key_round(round_action, &mut tree);
        prop_assert_eq!(res, expected);
        tree.assert_correctness();
    }
    prop_assert_eq!(tree.len(), model.values().map(|&(_, count)| count).sum::<usize>());
    prop_assert_eq!(tree.to_sequence(), model_entries(&model));
    Ok(())
}
