//! Bounded best-K selection over a stream of scored items.
//!
//! A min-heap of at most `window` `(score, handle)` pairs tracks the best
//! items seen so far; the items themselves live in a slot arena addressed by
//! handle, so evictions recycle storage and heap sifts only move pairs.
//! Once the stream ends the heap is shrunk to `display` by extracting
//! minima, which never discards a score higher than one retained.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Number of candidates retained while streaming.
pub const WINDOW_LIMIT: usize = 20;

/// Number of candidates returned to the caller.
pub const DISPLAY_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy)]
struct Ranked {
    score: f64,
    handle: usize,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.handle.cmp(&other.handle))
    }
}

/// Keep the highest-scoring items of a stream.
///
/// # Examples
/// ```
/// use wayfarer_slots::TopKSelector;
///
/// let mut selector = TopKSelector::with_limits(3, 2);
/// for score in [5.0, 1.0, 9.0, 3.0, 7.0] {
///     selector.offer(score, score);
/// }
/// let scores: Vec<f64> = selector.into_ascending().into_iter().map(|(s, _)| s).collect();
/// assert_eq!(scores, [7.0, 9.0]);
/// ```
#[derive(Debug, Clone)]
pub struct TopKSelector<T> {
    heap: BinaryHeap<Reverse<Ranked>>,
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    window: usize,
    display: usize,
}

impl<T> Default for TopKSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TopKSelector<T> {
    /// Selector using [`WINDOW_LIMIT`] and [`DISPLAY_LIMIT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(WINDOW_LIMIT, DISPLAY_LIMIT)
    }

    /// Selector retaining `window` items while streaming and returning at
    /// most `display`. `display` is clamped to `window`.
    #[must_use]
    pub fn with_limits(window: usize, display: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(window),
            slots: Vec::with_capacity(window),
            free: Vec::new(),
            window,
            display: display.min(window),
        }
    }

    /// Number of items currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Streaming capacity.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Result size bound.
    #[must_use]
    pub const fn display(&self) -> usize {
        self.display
    }

    /// The lowest retained score, if any.
    #[must_use]
    pub fn min_score(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(root)| root.score)
    }

    /// Offer an item; returns whether it was retained.
    ///
    /// Items are inserted while there is spare capacity. Once full, an item
    /// replaces the current minimum only when its score is strictly
    /// greater. NaN scores are never retained.
    pub fn offer(&mut self, score: f64, item: T) -> bool {
        if score.is_nan() || self.window == 0 {
            return false;
        }
        if self.heap.len() >= self.window {
            match self.heap.peek() {
                Some(Reverse(root)) if score > root.score => {
                    self.pop_min();
                }
                _ => return false,
            }
        }
        let handle = self.store(item);
        self.heap.push(Reverse(Ranked { score, handle }));
        true
    }

    /// Fold every item retained by `other` into `self`.
    ///
    /// Used to merge per-worker selections; the retained scores afterwards
    /// equal those of a single selector fed both streams.
    pub fn merge(&mut self, other: Self) {
        for (score, item) in other.drain_unordered() {
            self.offer(score, item);
        }
    }

    /// Shrink to the display limit and return survivors, lowest score first.
    #[must_use]
    pub fn into_ascending(mut self) -> Vec<(f64, T)> {
        while self.heap.len() > self.display {
            self.pop_min();
        }
        let mut ascending = Vec::with_capacity(self.heap.len());
        while let Some(entry) = self.pop_min() {
            ascending.push(entry);
        }
        ascending
    }

    /// Shrink to the display limit and return survivors, best first.
    #[must_use]
    pub fn into_best_first(self) -> Vec<(f64, T)> {
        let mut best_first = self.into_ascending();
        best_first.reverse();
        best_first
    }

    fn store(&mut self, item: T) -> usize {
        if let Some(handle) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(handle) {
                *slot = Some(item);
                return handle;
            }
        }
        self.slots.push(Some(item));
        self.slots.len() - 1
    }

    fn pop_min(&mut self) -> Option<(f64, T)> {
        let Reverse(Ranked { score, handle }) = self.heap.pop()?;
        let item = self.slots.get_mut(handle)?.take()?;
        self.free.push(handle);
        Some((score, item))
    }

    fn drain_unordered(self) -> impl Iterator<Item = (f64, T)> {
        let mut slots = self.slots;
        self.heap
            .into_iter()
            .filter_map(move |Reverse(Ranked { score, handle })| {
                slots
                    .get_mut(handle)
                    .and_then(Option::take)
                    .map(|item| (score, item))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scores<T>(entries: &[(f64, T)]) -> Vec<f64> {
        entries.iter().map(|(score, _)| *score).collect()
    }

    #[rstest]
    fn keeps_best_of_stream_in_ascending_order() {
        let mut selector = TopKSelector::with_limits(3, 2);
        for (index, score) in [5.0, 1.0, 9.0, 3.0, 7.0].into_iter().enumerate() {
            selector.offer(score, index);
        }
        let result = selector.into_ascending();
        assert_eq!(scores(&result), [7.0, 9.0]);
        assert_eq!(result.iter().map(|(_, i)| *i).collect::<Vec<_>>(), [4, 2]);
    }

    #[rstest]
    fn best_first_reverses_drain_order() {
        let mut selector = TopKSelector::with_limits(3, 2);
        for score in [5.0, 1.0, 9.0, 3.0, 7.0] {
            selector.offer(score, ());
        }
        assert_eq!(scores(&selector.into_best_first()), [9.0, 7.0]);
    }

    #[rstest]
    fn equal_score_does_not_evict() {
        let mut selector = TopKSelector::with_limits(2, 2);
        assert!(selector.offer(1.0, "a"));
        assert!(selector.offer(2.0, "b"));
        assert!(!selector.offer(1.0, "c"));
        assert!(selector.offer(1.5, "d"));
        assert_eq!(selector.min_score(), Some(1.5));
    }

    #[rstest]
    fn short_streams_return_everything() {
        let mut selector = TopKSelector::new();
        for score in [3.0, 1.0, 2.0] {
            selector.offer(score, ());
        }
        assert_eq!(scores(&selector.into_ascending()), [1.0, 2.0, 3.0]);
    }

    #[rstest]
    fn default_limits_cap_results_at_display() {
        let mut selector = TopKSelector::new();
        for score in 0..50 {
            selector.offer(f64::from(score), score);
        }
        assert_eq!(selector.len(), WINDOW_LIMIT);
        let result = selector.into_best_first();
        assert_eq!(result.len(), DISPLAY_LIMIT);
        assert_eq!(result.first().map(|(s, _)| *s), Some(49.0));
        assert_eq!(result.last().map(|(s, _)| *s), Some(35.0));
    }

    #[rstest]
    fn arena_is_bounded_by_window() {
        let mut selector = TopKSelector::with_limits(4, 4);
        for score in 0..100 {
            selector.offer(f64::from(score), score);
        }
        assert!(selector.slots.len() <= 4);
    }

    #[rstest]
    fn rejects_nan_and_zero_window() {
        let mut selector = TopKSelector::with_limits(3, 3);
        assert!(!selector.offer(f64::NAN, ()));
        let mut closed = TopKSelector::with_limits(0, 5);
        assert!(!closed.offer(1.0, ()));
        assert_eq!(closed.display(), 0);
    }

    #[rstest]
    fn merge_matches_single_stream() {
        let stream: Vec<f64> = (0..40).map(|i| f64::from((i * 37) % 41)).collect();
        let (left, right) = stream.split_at(17);

        let mut whole = TopKSelector::new();
        for &score in &stream {
            whole.offer(score, ());
        }
        let mut merged = TopKSelector::new();
        let mut other = TopKSelector::new();
        for &score in left {
            merged.offer(score, ());
        }
        for &score in right {
            other.offer(score, ());
        }
        merged.merge(other);

        assert_eq!(
            scores(&merged.into_ascending()),
            scores(&whole.into_ascending())
        );
    }
}
