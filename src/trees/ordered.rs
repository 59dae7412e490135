//! Key ordered trees.
//!
//! A [`KeyTree`] is a multiset: values are ordered by their keys, and inserting an
//! existing key increments the duplicate counter of its node instead of adding a node.
//! Ranks count duplicates, so a key inserted three times occupies three consecutive ranks.

use super::basic_tree::Iter;
use super::treap::Treap;
use super::Mode;
use crate::config::Config;
use crate::data::*;
use crate::error::{Error, Result};
use crate::locators::*;

type KeyOf<D> = <<D as Data>::Value as Keyed>::Key;

/// An ordered multiset supporting order statistics and lazy actions on key ranges,
/// all in `O(log n)` expected time.
///
///```
/// use mergeable_treap::*;
/// use mergeable_treap::example_data::{Entry, KeyedNum};
///
/// let mut set: KeyTree<KeyedNum<i32, i64>> = KeyTree::new();
/// for &key in [5, 3, 8, 1].iter() {
///     set.insert(Entry::new(key, 0));
/// }
/// assert_eq!(set.keys(), vec![1, 3, 5, 8]);
/// assert_eq!(set.select(3).unwrap().key, 5);
/// assert_eq!(set.rank(&5), 2);
///
/// set.delete(&5).unwrap();
/// assert_eq!(set.keys(), vec![1, 3, 8]);
/// assert_eq!(set.delete(&5), Err(Error::NotFound));
///```
pub struct KeyTree<D: Data> {
    treap: Treap<D>,
}

impl<D: Data> Default for KeyTree<D> {
    fn default() -> Self {
        KeyTree::new()
    }
}

impl<D: Data> KeyTree<D> {
    pub fn new() -> Self {
        KeyTree::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        KeyTree {
            treap: Treap::with_config(config),
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::Key
    }

    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    /// The summary of the whole tree.
    pub fn summary(&self) -> D::Summary {
        self.treap.subtree_summary()
    }

    /// Pushes every pending action down, and iterates over the values in key order.
    pub fn iter(&mut self) -> Iter<'_, D> {
        self.treap.iter()
    }

    /// Returns all of the values, in key order. Duplicates appear once, with their count.
    pub fn to_sequence(&mut self) -> Vec<D::Value>
    where
        D::Value: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<D: Data> KeyTree<D>
where
    D::Value: Counted,
    D::Summary: SizedSummary,
{
    /// The number of elements, counting duplicates.
    pub fn len(&self) -> usize {
        self.treap.len()
    }

    /// Returns the keys in order, repeating duplicated keys.
    pub fn keys(&mut self) -> Vec<KeyOf<D>>
    where
        KeyOf<D>: Clone,
    {
        let mut res = vec![];
        for value in self.iter() {
            for _ in 0..value.count() {
                res.push(value.key().clone());
            }
        }
        res
    }

    /// Inserts a value. If its key is already present, the existing value absorbs it.
    /// Otherwise the tree is split at the key, and glued back around a new node.
    pub fn insert(&mut self, value: D::Value) {
        let mut position = self.treap.search(&ByKey(value.key()));
        if let Some(node) = position.rec_ref.node_mut() {
            node.node_value_mut().absorb(value);
            node.rebuild();
            position.rebuild_ancestors();
            return;
        }
        drop(position);

        let mut right = self.treap.split(&LeftEdgeOf(ByKey(value.key())));
        self.treap.push_back(value);
        self.treap.append(&mut right);
    }

    /// Removes one occurrence of the key.
    /// If it was the last one, the node is spliced out by merging its sons.
    pub fn delete(&mut self, key: &KeyOf<D>) -> Result<()> {
        let mut position = self.treap.search(&ByKey(key));
        let node = match position.rec_ref.node_mut() {
            Some(node) => node,
            None => {
                log::debug!("deletion of a missing key rejected");
                return Err(Error::NotFound);
            }
        };
        if node.node_value_mut().release_one() {
            node.rebuild();
            position.rebuild_ancestors();
        } else {
            position.remove();
        }
        Ok(())
    }

    /// Returns the value with the given key.
    pub fn get(&mut self, key: &KeyOf<D>) -> Option<&D::Value> {
        self.treap.search(&ByKey(key)).into_value()
    }

    pub fn contains(&mut self, key: &KeyOf<D>) -> bool {
        self.get(key).is_some()
    }

    /// The number of times the key is present.
    pub fn count(&mut self, key: &KeyOf<D>) -> usize {
        self.get(key).map_or(0, |value| value.count())
    }

    /// The number of elements with keys strictly smaller than `key`.
    pub fn rank(&mut self, key: &KeyOf<D>) -> usize {
        self.treap.search(&LeftEdgeOf(ByKey(key))).left.size()
    }

    /// The number of elements with keys smaller than or equal to `key`.
    fn rank_inclusive(&mut self, key: &KeyOf<D>) -> usize {
        self.treap.search(&RightEdgeOf(ByKey(key))).left.size()
    }

    /// Returns the element of rank `index`, with `1 <= index <= len`.
    /// Duplicates occupy consecutive ranks, and all of them return the same value.
    pub fn select(&mut self, index: usize) -> Result<&D::Value> {
        let len = self.len();
        if index == 0 || index > len {
            log::debug!("rank {} rejected, valid ranks are 1..={}", index, len);
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.treap
            .search(&(index - 1..index))
            .into_value()
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Returns the value with the largest key strictly smaller than `key`.
    pub fn predecessor(&mut self, key: &KeyOf<D>) -> Result<&D::Value> {
        match self.rank(key) {
            0 => Err(Error::NotFound),
            rank => self.select(rank),
        }
    }

    /// Returns the value with the smallest key strictly larger than `key`.
    pub fn successor(&mut self, key: &KeyOf<D>) -> Result<&D::Value> {
        let rank = self.rank_inclusive(key);
        if rank == self.len() {
            return Err(Error::NotFound);
        }
        self.select(rank + 1)
    }

    /// Returns the value with the smallest key.
    pub fn first(&mut self) -> Option<&D::Value> {
        self.select(1).ok()
    }

    /// Returns the value with the largest key.
    pub fn last(&mut self) -> Option<&D::Value> {
        let len = self.len();
        self.select(len).ok()
    }

    /// Adds `delta` to the payloads of the values with keys in `start..=end`.
    /// The keys themselves don't change.
    pub fn range_add(
        &mut self,
        start: &KeyOf<D>,
        end: &KeyOf<D>,
        delta: <D::Action as Additive>::Delta,
    ) -> Result<()>
    where
        D::Action: Additive,
    {
        if start > end {
            log::debug!("key range rejected: the start key is after the end key");
            return Err(Error::InvalidRange);
        }
        let action = <D::Action as Additive>::adding(delta);
        debug_assert!(!action.to_reverse());
        self.treap.act_segment(action, ByKeyRange { start, end });
        Ok(())
    }

    /// Returns the summary of the values with keys in `start..=end`.
    pub fn range_summary(&mut self, start: &KeyOf<D>, end: &KeyOf<D>) -> Result<D::Summary> {
        if start > end {
            log::debug!("key range rejected: the start key is after the end key");
            return Err(Error::InvalidRange);
        }
        Ok(self.treap.segment_summary(ByKeyRange { start, end }))
    }

    /// Splits the tree in two: the values with keys up to `key` stay,
    /// and the values with larger keys are returned as a new tree.
    pub fn split_off(&mut self, key: &KeyOf<D>) -> KeyTree<D> {
        KeyTree {
            treap: self.treap.split(&RightEdgeOf(ByKey(key))),
        }
    }

    /// Moves all the values of `other` into this tree, leaving `other` empty.
    /// Every key of `self` must be smaller than every key of `other`;
    /// otherwise both trees are left as they were and [`Error::Unordered`] is returned.
    pub fn append(&mut self, other: &mut KeyTree<D>) -> Result<()> {
        let ordered = match (self.last(), other.first()) {
            (Some(a), Some(b)) => a.key() < b.key(),
            _ => true,
        };
        if !ordered {
            log::debug!("concatenation of overlapping key trees rejected");
            return Err(Error::Unordered);
        }
        self.treap.append(&mut other.treap);
        Ok(())
    }

    /// Checks the heap order of the priorities, the summaries of all nodes,
    /// and that the keys are strictly increasing. Panics if they are violated.
    pub fn assert_correctness(&mut self)
    where
        D::Summary: PartialEq + std::fmt::Debug,
    {
        self.treap.assert_correctness();
        let mut previous: Option<&D::Value> = None;
        for value in self.treap.iter() {
            assert!(value.count() >= 1, "a value with no elements was left in the tree");
            if let Some(previous) = previous {
                assert!(previous.key() < value.key(), "keys out of order");
            }
            previous = Some(value);
        }
    }
}

impl<D: Data> std::iter::FromIterator<D::Value> for KeyTree<D>
where
    D::Value: Counted,
    D::Summary: SizedSummary,
{
    fn from_iter<I: IntoIterator<Item = D::Value>>(iter: I) -> Self {
        let mut res = KeyTree::new();
        res.extend(iter);
        res
    }
}

impl<D: Data> Extend<D::Value> for KeyTree<D>
where
    D::Value: Counted,
    D::Summary: SizedSummary,
{
    /// Inserts the values one by one.
    fn extend<I: IntoIterator<Item = D::Value>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<D: Data> IntoIterator for KeyTree<D> {
    type Item = D::Value;
    type IntoIter = super::basic_tree::IntoIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.treap.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::example_data::*;

    type Set = KeyTree<KeyedNum<i32, i64>>;

    fn set(keys: &[i32]) -> Set {
        let mut res = Set::with_config(Config::default().seed(3));
        for &key in keys {
            res.insert(Entry::new(key, key as i64 * 10));
        }
        res
    }

    #[test]
    fn inserted_keys_come_out_sorted() {
        let mut tree = set(&[5, 3, 8, 1]);
        assert_eq!(tree.keys(), vec![1, 3, 5, 8]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.mode(), Mode::Key);
        tree.assert_correctness();
    }

    #[test]
    fn rank_and_select() {
        let mut tree = set(&[1, 3, 5, 8]);
        assert_eq!(tree.select(3).map(|e| e.key), Ok(5));
        assert_eq!(tree.rank(&5), 2);
        assert_eq!(tree.rank(&4), 2);
        assert_eq!(tree.rank(&0), 0);
        assert_eq!(tree.rank(&100), 4);
        for k in 1..=4 {
            let key = tree.select(k).unwrap().key;
            assert_eq!(tree.rank(&key), k - 1);
        }
        assert_eq!(tree.select(0), Err(Error::IndexOutOfRange { index: 0, len: 4 }));
        assert_eq!(tree.select(5), Err(Error::IndexOutOfRange { index: 5, len: 4 }));
    }

    #[test]
    fn duplicates_are_counted() {
        let mut tree = set(&[4, 2, 4, 4, 7]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.count(&4), 3);
        assert_eq!(tree.keys(), vec![2, 4, 4, 4, 7]);
        assert_eq!(tree.to_sequence().len(), 3);
        assert_eq!(tree.select(2).map(|e| e.key), Ok(4));
        assert_eq!(tree.select(4).map(|e| e.key), Ok(4));
        assert_eq!(tree.select(5).map(|e| e.key), Ok(7));
        assert_eq!(tree.rank(&7), 4);
        // the payloads of all three are summed
        assert_eq!(tree.summary(), SizedSum { size: 5, sum: 20 + 3 * 40 + 70 });

        tree.delete(&4).unwrap();
        assert_eq!(tree.count(&4), 2);
        tree.delete(&4).unwrap();
        tree.delete(&4).unwrap();
        assert!(!tree.contains(&4));
        assert_eq!(tree.delete(&4), Err(Error::NotFound));
        assert_eq!(tree.keys(), vec![2, 7]);
        tree.assert_correctness();
    }

    #[test]
    fn delete_scenario() {
        let mut tree = set(&[1, 3, 5, 8]);
        assert_eq!(tree.delete(&5), Ok(()));
        assert_eq!(tree.keys(), vec![1, 3, 8]);
        assert_eq!(tree.delete(&5), Err(Error::NotFound));
        assert_eq!(tree.keys(), vec![1, 3, 8]);
        tree.assert_correctness();
    }

    #[test]
    fn neighbours() {
        let mut tree = set(&[10, 20, 30]);
        assert_eq!(tree.predecessor(&20).map(|e| e.key), Ok(10));
        assert_eq!(tree.predecessor(&25).map(|e| e.key), Ok(20));
        assert_eq!(tree.predecessor(&10).map(|e| e.key), Err(Error::NotFound));
        assert_eq!(tree.successor(&20).map(|e| e.key), Ok(30));
        assert_eq!(tree.successor(&5).map(|e| e.key), Ok(10));
        assert_eq!(tree.successor(&30).map(|e| e.key), Err(Error::NotFound));
        assert_eq!(tree.first().map(|e| e.key), Some(10));
        assert_eq!(tree.last().map(|e| e.key), Some(30));

        let mut empty = set(&[]);
        assert_eq!(empty.predecessor(&1).map(|e| e.key), Err(Error::NotFound));
        assert_eq!(empty.successor(&1).map(|e| e.key), Err(Error::NotFound));
        assert!(empty.first().is_none());
    }

    #[test]
    fn add_to_key_ranges() {
        let mut tree = set(&[1, 2, 3, 4, 5]);
        tree.range_add(&2, &4, 1).unwrap();
        let payloads: Vec<_> = tree.iter().map(|e| e.payload).collect();
        assert_eq!(payloads, vec![10, 21, 31, 41, 50]);
        assert_eq!(tree.range_summary(&2, &3), Ok(SizedSum { size: 2, sum: 52 }));
        tree.range_add(&2, &4, -1).unwrap();
        let payloads: Vec<_> = tree.iter().map(|e| e.payload).collect();
        assert_eq!(payloads, vec![10, 20, 30, 40, 50]);
        assert_eq!(tree.range_add(&4, &2, 1), Err(Error::InvalidRange));
        tree.assert_correctness();
    }

    #[test]
    fn split_off_and_append() {
        let mut tree = set(&[1, 2, 3, 4, 5, 6]);
        let mut right = tree.split_off(&3);
        assert_eq!(tree.keys(), vec![1, 2, 3]);
        assert_eq!(right.keys(), vec![4, 5, 6]);

        assert_eq!(right.append(&mut tree), Err(Error::Unordered));
        assert_eq!(tree.keys(), vec![1, 2, 3]);
        assert_eq!(right.keys(), vec![4, 5, 6]);

        assert_eq!(tree.append(&mut right), Ok(()));
        assert!(right.is_empty());
        assert_eq!(tree.keys(), vec![1, 2, 3, 4, 5, 6]);
        tree.assert_correctness();
    }
}
