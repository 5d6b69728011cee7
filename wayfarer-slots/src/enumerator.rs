//! Mixed-radix enumeration of candidate index tuples.
//!
//! Each tag position ranges over the cluster of its category. The
//! enumerator behaves like an odometer: the last position turns fastest and
//! carries into the one before it on overflow. Tuples are produced lazily;
//! the full tuple space is never materialised.

use std::iter::FusedIterator;
use std::ops::Range;

use wayfarer_core::{CategorizedPlaces, SlotTag};

/// Odometer over `[0, bound_0) × [0, bound_1) × …`.
///
/// The most-significant position may be restricted to a sub-range, which is
/// how [`CombinationEnumerator::partition`] hands disjoint slices of the
/// tuple space to parallel workers.
///
/// # Examples
/// ```
/// use wayfarer_slots::CombinationEnumerator;
///
/// let tuples: Vec<_> = CombinationEnumerator::new(vec![2, 2]).collect();
/// assert_eq!(tuples, [vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationEnumerator {
    bounds: Vec<usize>,
    positions: Vec<usize>,
    leading: Range<usize>,
    exhausted: bool,
}

impl CombinationEnumerator {
    /// Enumerate every tuple below `bounds`.
    ///
    /// No bounds, or any zero bound, yields an empty enumeration.
    #[must_use]
    pub fn new(bounds: Vec<usize>) -> Self {
        let leading = 0..bounds.first().copied().unwrap_or(0);
        Self::with_leading_range(bounds, leading)
    }

    /// Enumerate tuples for `tag`, bounding each position by the size of the
    /// cluster matching its category.
    #[must_use]
    pub fn for_tag(tag: &SlotTag, clusters: &CategorizedPlaces) -> Self {
        let bounds = tag
            .categories()
            .iter()
            .map(|&category| clusters.cluster(category).len())
            .collect();
        Self::new(bounds)
    }

    fn with_leading_range(bounds: Vec<usize>, leading: Range<usize>) -> Self {
        let exhausted = bounds.is_empty() || bounds.contains(&0) || leading.is_empty();
        let positions = bounds
            .iter()
            .enumerate()
            .map(|(index, _)| if index == 0 { leading.start } else { 0 })
            .collect();
        Self {
            bounds,
            positions,
            leading,
            exhausted,
        }
    }

    /// Per-position bounds.
    #[must_use]
    pub fn bounds(&self) -> &[usize] {
        &self.bounds
    }

    /// Whether a tuple remains to be read.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        !self.exhausted
    }

    /// The tuple under the odometer, or `None` once exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&[usize]> {
        if self.exhausted {
            None
        } else {
            Some(self.positions.as_slice())
        }
    }

    /// Step to the next tuple.
    ///
    /// Increments the last position, carrying into earlier positions on
    /// overflow. Once the most-significant position leaves its range the
    /// enumerator is exhausted; further calls do nothing.
    pub fn advance(&mut self) {
        if self.exhausted {
            return;
        }
        let lower_bounds = self.bounds.iter().skip(1);
        let mut carry = true;
        for (position, &bound) in self.positions.iter_mut().skip(1).zip(lower_bounds).rev() {
            *position += 1;
            if *position < bound {
                carry = false;
                break;
            }
            *position = 0;
        }
        if !carry {
            return;
        }
        match self.positions.first_mut() {
            Some(leading) => {
                *leading += 1;
                if *leading >= self.leading.end {
                    self.exhausted = true;
                }
            }
            None => self.exhausted = true,
        }
    }

    /// Number of tuples in this enumerator's range, saturating at
    /// `usize::MAX`. Progress already made is not subtracted.
    #[must_use]
    pub fn total(&self) -> usize {
        if self.bounds.is_empty() {
            return 0;
        }
        self.bounds
            .iter()
            .skip(1)
            .try_fold(self.leading.len(), |acc, &bound| acc.checked_mul(bound))
            .unwrap_or(usize::MAX)
    }

    /// Split the range into at most `parts` fresh enumerators over
    /// contiguous slices of the most-significant position.
    ///
    /// Concatenating their output reproduces this enumerator's full
    /// sequence. `parts == 0` is treated as one part.
    #[must_use]
    pub fn partition(&self, parts: usize) -> Vec<Self> {
        let Range { start, end } = self.leading.clone();
        let len = end.saturating_sub(start);
        if self.bounds.contains(&0) || len == 0 {
            return vec![Self::with_leading_range(self.bounds.clone(), start..start)];
        }
        let chunk = len.div_ceil(parts.max(1));
        (start..end)
            .step_by(chunk)
            .map(|lo| Self::with_leading_range(self.bounds.clone(), lo..end.min(lo + chunk)))
            .collect()
    }
}

impl Iterator for CombinationEnumerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let tuple = self.current()?.to_vec();
        self.advance();
        Some(tuple)
    }
}

impl FusedIterator for CombinationEnumerator {}
