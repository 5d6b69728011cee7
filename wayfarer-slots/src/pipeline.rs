//! Enumerate, build, filter and select slot candidates.
//!
//! The pipeline is pure and performs no I/O. [`SlotPipeline::solve`] runs
//! it on the calling thread; [`SlotPipeline::solve_partitioned`] splits the
//! tuple space across scoped worker threads and merges their local top-K
//! selections.

use std::thread;

use wayfarer_core::{CategorizedPlaces, SlotScorer, SlotSolution, SlotTag, TravelTimeEstimator};

use crate::{
    CandidateBuilder, CombinationEnumerator, DISPLAY_LIMIT, FeasibilityFilter, SlotCandidate,
    TopKSelector, WINDOW_LIMIT,
};

/// Counters gathered while streaming candidates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Index tuples enumerated.
    pub tuples: usize,
    /// Tuples yielding distinct places.
    pub valid: usize,
    /// Valid candidates whose travel time fits the slot.
    pub feasible: usize,
}

impl SearchStats {
    const fn absorb(&mut self, other: Self) {
        self.tuples += other.tuples;
        self.valid += other.valid;
        self.feasible += other.feasible;
    }
}

/// One slot search over fixed clusters.
///
/// # Examples
/// ```
/// use wayfarer_core::test_support::{ZeroTravelTime, place};
/// use wayfarer_core::{CategorizedPlaces, PlaceCategory, RatingScorer, SlotTag};
/// use wayfarer_slots::SlotPipeline;
///
/// let clusters = CategorizedPlaces::new(
///     vec![place("A", PlaceCategory::Eatery, 1.0), place("B", PlaceCategory::Eatery, 2.0)],
///     vec![place("C", PlaceCategory::Visit, 3.0), place("D", PlaceCategory::Visit, 4.0)],
/// );
/// let tag = SlotTag::parse("EV")?;
/// let best = SlotPipeline::new(&tag, &clusters, &RatingScorer, &ZeroTravelTime, 120.0).solve();
/// assert_eq!(best.len(), 4);
/// let ids: Vec<_> = best[0].places().iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, ["B", "D"]);
/// # Ok::<(), wayfarer_core::TagError>(())
/// ```
pub struct SlotPipeline<'a> {
    tag: &'a SlotTag,
    clusters: &'a CategorizedPlaces,
    scorer: &'a dyn SlotScorer,
    estimator: &'a dyn TravelTimeEstimator,
    available_minutes: f64,
    window_limit: usize,
    display_limit: usize,
}

impl<'a> SlotPipeline<'a> {
    /// Search `clusters` for `tag` with `available_minutes` of travel time.
    pub fn new(
        tag: &'a SlotTag,
        clusters: &'a CategorizedPlaces,
        scorer: &'a dyn SlotScorer,
        estimator: &'a dyn TravelTimeEstimator,
        available_minutes: f64,
    ) -> Self {
        Self {
            tag,
            clusters,
            scorer,
            estimator,
            available_minutes,
            window_limit: WINDOW_LIMIT,
            display_limit: DISPLAY_LIMIT,
        }
    }

    /// Override the top-K window and display limits.
    #[must_use]
    pub const fn with_limits(mut self, window_limit: usize, display_limit: usize) -> Self {
        self.window_limit = window_limit;
        self.display_limit = display_limit;
        self
    }

    /// Run the search on the calling thread; candidates are best first.
    #[must_use]
    pub fn solve(&self) -> Vec<SlotCandidate<'a>> {
        let enumerator = CombinationEnumerator::for_tag(self.tag, self.clusters);
        let (selector, stats) = self.search(enumerator);
        self.log_stats(stats);
        Self::unwrap_selection(selector)
    }

    /// Run the search across up to `workers` scoped threads.
    ///
    /// Each worker streams a contiguous slice of the tuple space into its
    /// own selector; the selectors are merged afterwards. The retained
    /// scores equal those of [`SlotPipeline::solve`]; candidates with tied
    /// scores may differ.
    #[must_use]
    pub fn solve_partitioned(&self, workers: usize) -> Vec<SlotCandidate<'a>> {
        let partitions = CombinationEnumerator::partition(&CombinationEnumerator::for_tag(self.tag, self.clusters), workers);
        if partitions.len() <= 1 {
            return self.solve();
        }
        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = partitions
                .into_iter()
                .map(|partition| scope.spawn(move || self.search(partition)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        let mut selector = self.selector();
        let mut stats = SearchStats::default();
        for (local, local_stats) in results {
            selector.merge(local);
            stats.absorb(local_stats);
        }
        self.log_stats(stats);
        Self::unwrap_selection(selector)
    }

    /// Solve and copy the result into an owned [`SlotSolution`].
    #[must_use]
    pub fn solution(&self, workers: usize) -> SlotSolution {
        let candidates = if workers > 1 {
            self.solve_partitioned(workers)
        } else {
            self.solve()
        };
        SlotSolution {
            tag: self.tag.clone(),
            candidates: candidates
                .iter()
                .map(SlotCandidate::to_solution_candidate)
                .collect(),
        }
    }

    fn selector(&self) -> TopKSelector<SlotCandidate<'a>> {
        TopKSelector::with_limits(self.window_limit, self.display_limit)
    }

    fn search(
        &self,
        enumerator: CombinationEnumerator,
    ) -> (TopKSelector<SlotCandidate<'a>>, SearchStats) {
        let builder = CandidateBuilder::new(self.tag, self.clusters, self.scorer);
        let filter = FeasibilityFilter::new(self.estimator, self.available_minutes);
        let mut selector = self.selector();
        let mut stats = SearchStats::default();
        for tuple in enumerator {
            stats.tuples += 1;
            let candidate = builder.build(&tuple);
            if !candidate.is_valid() {
                continue;
            }
            stats.valid += 1;
            if !filter.accepts(&candidate) {
                continue;
            }
            stats.feasible += 1;
            selector.offer(candidate.score(), candidate);
        }
        (selector, stats)
    }

    fn unwrap_selection(selector: TopKSelector<SlotCandidate<'a>>) -> Vec<SlotCandidate<'a>> {
        selector
            .into_best_first()
            .into_iter()
            .map(|(_, candidate)| candidate)
            .collect()
    }

    fn log_stats(&self, stats: SearchStats) {
        log::debug!(
            "slot {}: {} tuples, {} valid, {} feasible within {} min",
            self.tag,
            stats.tuples,
            stats.valid,
            stats.feasible,
            self.available_minutes
        );
    }
}
