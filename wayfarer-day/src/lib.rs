//! Day engine: choose the most valuable set of places for a whole day.
//!
//! Each open place costs whole hours (by category, see [`StayHours`]) and
//! whole money units (its price rounded up) and is worth ten times its
//! rating. [`DayKnapsackSelector`] filters a pool by opening hours and solves
//! the two-constraint 0/1 knapsack under a [`Budget`]. An empty selection is
//! a valid answer when nothing fits.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod item;
pub mod knapsack;
pub mod selector;

pub use item::{KnapsackItem, StayHours};
pub use knapsack::{Budget, KnapsackSelection, knapsack, knapsack_reference};
pub use selector::{DayError, DayKnapsackSelector};
