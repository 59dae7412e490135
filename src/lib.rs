//! A mergeable order-statistics tree.
//!
//! The trees in this crate are treaps: binary search trees whose nodes carry random
//! priorities kept in heap order. Every operation is built from two primitives,
//! splitting a tree at a point and concatenating two trees, and runs in `O(log n)`
//! expected time. Nodes keep summaries of their subtrees, such as sizes and sums,
//! and actions on whole segments are applied lazily.
//!
//! [`SeqTree`] orders its values by position, and supports segment reversals.
//! [`KeyTree`] orders its values by key, and counts duplicate keys.

#[macro_use]
extern crate derive_destructure;

pub mod config;
pub mod data;
pub mod error;
pub mod locators;
pub mod trees;

pub use config::Config;
pub use data::*;
pub use error::{Error, Result};
pub use trees::*;
