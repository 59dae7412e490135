//! Examples of ready-made data instances.
//!
//! [`SeqNum`] is meant for position ordered trees of numbers, supporting
//! range reversals and range additions. [`KeyedNum`] is meant for key ordered
//! multisets whose entries carry a numeric payload.

use super::*;
use std::marker::PhantomData;
use std::ops::Mul;

/// Numbers that can be summed up and scaled by an element count.
///
/// Integer arithmetic wraps around on overflow: the sums kept in summaries may
/// leave the range of the type even when every value is in range.
pub trait Num: Copy + Default + std::fmt::Debug {
    fn plus(self, other: Self) -> Self;

    /// Adds `self` to itself `n` times.
    fn times(self, n: usize) -> Self;
}

macro_rules! impl_num {
    ($plus:ident, $mul:ident; $($t:ident)*) => {
        $(
            impl Num for $t {
                fn plus(self, other: Self) -> Self {
                    self.$plus(other)
                }

                fn times(self, n: usize) -> Self {
                    self.$mul(n as $t)
                }
            }

            impl Acts<$t> for RevAdd<$t> {
                fn act_inplace(&self, object: &mut $t) {
                    *object = object.plus(self.add);
                }
            }
        )*
    }
}

impl_num!(wrapping_add, wrapping_mul; i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);
impl_num!(add, mul; f32 f64);

/// The size of a segment, together with the sum of its values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct SizedSum<T> {
    pub size: usize,
    pub sum: T,
}

impl<T: Num> Add for SizedSum<T> {
    type Output = SizedSum<T>;
    fn add(self, other: SizedSum<T>) -> SizedSum<T> {
        SizedSum {
            size: self.size + other.size,
            sum: self.sum.plus(other.sum),
        }
    }
}

impl<T> SizedSummary for SizedSum<T> {
    fn size(&self) -> usize {
        self.size
    }
}

/// Actions that can reverse a segment and add a constant to all of its values.
///
/// The addition and the reversal commute, so the action is just a pending
/// delta and a reversal bit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct RevAdd<T> {
    pub to_reverse: bool,
    pub add: T,
}

impl<T: Num> Add for RevAdd<T> {
    type Output = RevAdd<T>;
    fn add(self, other: RevAdd<T>) -> RevAdd<T> {
        RevAdd {
            // two pending reversals cancel out
            to_reverse: self.to_reverse != other.to_reverse,
            add: self.add.plus(other.add),
        }
    }
}

impl<T: Num + PartialEq> Action for RevAdd<T> {
    fn is_identity(self) -> bool {
        !self.to_reverse && self.add == T::default()
    }

    fn to_reverse(&self) -> bool {
        self.to_reverse
    }
}

impl<T: Num + PartialEq> Reversible for RevAdd<T> {
    fn reversal() -> Self {
        RevAdd {
            to_reverse: true,
            add: T::default(),
        }
    }
}

impl<T: Num + PartialEq> Additive for RevAdd<T> {
    type Delta = T;
    fn adding(delta: T) -> Self {
        RevAdd {
            to_reverse: false,
            add: delta,
        }
    }
}

impl<T: Num> Acts<SizedSum<T>> for RevAdd<T> {
    fn act_inplace(&self, object: &mut SizedSum<T>) {
        object.sum = object.sum.plus(self.add.times(object.size));
    }
}

/// An entry of a key ordered multiset: a key, a payload and the number of
/// times the key was inserted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Entry<K, V> {
    pub key: K,
    pub payload: V,
    pub count: usize,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, payload: V) -> Self {
        Entry {
            key,
            payload,
            count: 1,
        }
    }
}

impl<K: Ord, V> Keyed for Entry<K, V> {
    type Key = K;
    fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Ord, V> Counted for Entry<K, V> {
    fn count(&self) -> usize {
        self.count
    }

    /// The payload of the existing entry is kept.
    fn absorb(&mut self, other: Self) {
        self.count += other.count;
    }

    fn release_one(&mut self) -> bool {
        if self.count > 1 {
            self.count -= 1;
            true
        } else {
            false
        }
    }
}

impl<K, V: Num> Acts<Entry<K, V>> for RevAdd<V> {
    fn act_inplace(&self, object: &mut Entry<K, V>) {
        object.payload = object.payload.plus(self.add);
    }
}

/// Position ordered numbers, summarized by size and sum,
/// acted upon by [`RevAdd`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SeqNum<T> {
    phantom: PhantomData<T>,
}

impl<T: Num + PartialEq> Data for SeqNum<T>
where
    RevAdd<T>: Acts<T>,
{
    type Value = T;
    type Summary = SizedSum<T>;
    type Action = RevAdd<T>;

    fn to_summary(val: &T) -> SizedSum<T> {
        SizedSum { size: 1, sum: *val }
    }
}

/// Key ordered entries with a numeric payload.
/// The summary counts duplicates, and sums the payloads of all of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyedNum<K, V> {
    phantom: PhantomData<(K, V)>,
}

impl<K: Ord, V: Num + PartialEq> Data for KeyedNum<K, V> {
    type Value = Entry<K, V>;
    type Summary = SizedSum<V>;
    type Action = RevAdd<V>;

    fn to_summary(val: &Entry<K, V>) -> SizedSum<V> {
        SizedSum {
            size: val.count,
            sum: val.payload.times(val.count),
        }
    }
}

#[test]
fn rev_add_composition() {
    let a = RevAdd::<i32>::adding(3) + RevAdd::reversal();
    let b = a + RevAdd::reversal() + RevAdd::adding(-3);
    assert!(a.to_reverse());
    assert_eq!(a.add, 3);
    assert!(b.is_identity());

    let summary = SizedSum { size: 4, sum: 10i32 };
    assert_eq!(a.act(summary), SizedSum { size: 4, sum: 22 });
    assert_eq!(a.act(7i32), 10);
}

#[test]
fn entry_duplicates() {
    let mut entry = Entry::new(5, 2i64);
    entry.absorb(Entry::new(5, 100));
    assert_eq!(entry.count(), 2);
    assert_eq!(entry.payload, 2);
    assert_eq!(KeyedNum::<i32, i64>::to_summary(&entry), SizedSum { size: 2, sum: 4 });
    assert!(entry.release_one());
    assert!(!entry.release_one());
    assert_eq!(entry.count(), 1);
}

#[test]
fn sums_wrap_around() {
    let mut seq: crate::SeqTree<SeqNum<i32>> = crate::SeqTree::new();
    seq.push_back(i32::MAX);
    seq.push_back(1);
    seq.push_back(i32::MAX);
    let sum = i32::MAX.wrapping_add(1).wrapping_add(i32::MAX);
    assert_eq!(seq.summary(), SizedSum { size: 3, sum });
    seq.range_add(1, 3, 1).unwrap();
    assert_eq!(seq.to_sequence(), vec![i32::MIN, 2, i32::MIN]);
    assert_eq!(seq.range_summary(2, 2), Ok(SizedSum { size: 1, sum: 2 }));
    seq.assert_correctness();

    let entry = Entry { key: 0, payload: i64::MAX, count: 3 };
    assert_eq!(KeyedNum::<i32, i64>::to_summary(&entry).sum, i64::MAX.wrapping_mul(3));
}
