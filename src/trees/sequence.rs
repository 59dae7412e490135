//! Position ordered trees.
//!
//! A [`SeqTree`] is a sequence: values have no keys, and are ordered by their position.
//! Positions are 1-based, and ranges are inclusive on both ends.

use super::basic_tree::Iter;
use super::treap::Treap;
use super::Mode;
use crate::config::Config;
use crate::data::*;
use crate::error::{Error, Result};

/// A sequence supporting positional insertions and deletions, order statistics,
/// and lazy range actions, all in `O(log n)` expected time.
///
///```
/// use mergeable_treap::*;
/// use mergeable_treap::example_data::SeqNum;
///
/// let mut seq: SeqTree<SeqNum<i32>> = (1..=5).collect();
/// seq.range_reverse(2, 4).unwrap();
/// assert_eq!(seq.to_sequence(), vec![1, 4, 3, 2, 5]);
///
/// seq.range_add(1, 3, 10).unwrap();
/// assert_eq!(seq.to_sequence(), vec![11, 14, 13, 2, 5]);
/// assert_eq!(*seq.select(2).unwrap(), 14);
///```
pub struct SeqTree<D: Data> {
    treap: Treap<D>,
}

impl<D: Data> Default for SeqTree<D> {
    fn default() -> Self {
        SeqTree::new()
    }
}

impl<D: Data> SeqTree<D> {
    pub fn new() -> Self {
        SeqTree::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        SeqTree {
            treap: Treap::with_config(config),
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::Position
    }

    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    /// The summary of the whole sequence.
    pub fn summary(&self) -> D::Summary {
        self.treap.subtree_summary()
    }

    /// Adds a value at the end of the sequence.
    pub fn push_back(&mut self, value: D::Value) {
        self.treap.push_back(value);
    }

    /// Moves all the values of `other` to the end of this sequence, leaving `other` empty.
    pub fn append(&mut self, other: &mut SeqTree<D>) {
        self.treap.append(&mut other.treap);
    }

    /// Pushes every pending action down, and iterates over the values in order.
    pub fn iter(&mut self) -> Iter<'_, D> {
        self.treap.iter()
    }

    /// Returns all of the values, in order.
    pub fn to_sequence(&mut self) -> Vec<D::Value>
    where
        D::Value: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Checks the heap order of the priorities and the summaries of all nodes.
    /// Panics if they are violated.
    pub fn assert_correctness(&self)
    where
        D::Summary: PartialEq + std::fmt::Debug,
    {
        self.treap.assert_correctness();
    }
}

impl<D: Data> SeqTree<D>
where
    D::Summary: SizedSummary,
{
    /// The number of values in the sequence.
    pub fn len(&self) -> usize {
        self.treap.len()
    }

    fn check_index(index: usize, len: usize) -> Result<()> {
        if index == 0 || index > len {
            log::debug!("position {} rejected, valid positions are 1..={}", index, len);
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Converts the 1-based inclusive range `start..=end` into 0-based indices.
    fn check_range(&self, start: usize, end: usize) -> Result<std::ops::Range<usize>> {
        let len = self.len();
        if start == 0 || start > end || end > len {
            log::debug!("range {}..={} rejected for a sequence of {} values", start, end, len);
            return Err(Error::InvalidRange);
        }
        Ok(start - 1..end)
    }

    /// Inserts a value so that it ends up at position `index`,
    /// with `1 <= index <= len + 1`.
    /// The sequence is split before the position, and glued back around the new node.
    pub fn insert(&mut self, index: usize, value: D::Value) -> Result<()> {
        let len = self.len();
        if index == 0 || index > len + 1 {
            log::debug!("insertion at {} rejected, valid positions are 1..={}", index, len + 1);
            return Err(Error::IndexOutOfRange { index, len });
        }
        let mut right = self.treap.split(&(index - 1..index - 1));
        self.treap.push_back(value);
        self.treap.append(&mut right);
        Ok(())
    }

    /// Removes the value at position `index`, and returns it.
    pub fn delete(&mut self, index: usize) -> Result<D::Value> {
        Self::check_index(index, self.len())?;
        self.treap
            .delete(&(index - 1..index))
            .ok_or(Error::IndexOutOfRange { index, len: self.len() })
    }

    /// Returns the value at position `index`.
    pub fn select(&mut self, index: usize) -> Result<&D::Value> {
        let len = self.len();
        Self::check_index(index, len)?;
        self.treap
            .search(&(index - 1..index))
            .into_value()
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Applies an action to the values at positions `start..=end`.
    pub fn act_range(&mut self, start: usize, end: usize, action: D::Action) -> Result<()> {
        let range = self.check_range(start, end)?;
        self.treap.act_segment(action, range);
        Ok(())
    }

    /// Returns the summary of the values at positions `start..=end`.
    pub fn range_summary(&mut self, start: usize, end: usize) -> Result<D::Summary> {
        let range = self.check_range(start, end)?;
        Ok(self.treap.segment_summary(range))
    }

    /// Reverses the values at positions `start..=end`.
    pub fn range_reverse(&mut self, start: usize, end: usize) -> Result<()>
    where
        D::Action: Reversible,
    {
        self.act_range(start, end, <D::Action as Reversible>::reversal())
    }

    /// Adds `delta` to the values at positions `start..=end`.
    pub fn range_add(
        &mut self,
        start: usize,
        end: usize,
        delta: <D::Action as Additive>::Delta,
    ) -> Result<()>
    where
        D::Action: Additive,
    {
        self.act_range(start, end, <D::Action as Additive>::adding(delta))
    }

    /// Splits the sequence in two: the first `at` values stay,
    /// and the rest are returned as a new sequence.
    pub fn split_off(&mut self, at: usize) -> Result<SeqTree<D>> {
        let len = self.len();
        if at > len {
            log::debug!("split position {} rejected for a sequence of {} values", at, len);
            return Err(Error::IndexOutOfRange { index: at, len });
        }
        Ok(SeqTree {
            treap: self.treap.split(&(at..at)),
        })
    }
}

impl<D: Data> std::iter::FromIterator<D::Value> for SeqTree<D> {
    fn from_iter<I: IntoIterator<Item = D::Value>>(iter: I) -> Self {
        SeqTree {
            treap: iter.into_iter().collect(),
        }
    }
}

impl<D: Data> Extend<D::Value> for SeqTree<D> {
    fn extend<I: IntoIterator<Item = D::Value>>(&mut self, iter: I) {
        self.treap.extend(iter);
    }
}

impl<D: Data> IntoIterator for SeqTree<D> {
    type Item = D::Value;
    type IntoIter = super::basic_tree::IntoIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.treap.into_iter()
    }
}
