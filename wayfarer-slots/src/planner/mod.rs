//! Request-level slot planning.
//!
//! [`SlotPlanner`] validates a [`SlotRequest`], consults the solution cache,
//! fetches clusters from the place source and runs the [`SlotPipeline`]. An
//! empty shortlist is a valid answer, not an error.

use thiserror::Error;
use wayfarer_core::{
    Location, LocationError, PlaceQuery, PlaceSource, PlaceSourceError, SlotRequest,
    SlotScorer, SlotSolution, SlotTag, SolutionCache, SolutionCacheKey, TagError, TimeError,
    TimeInterval, TravelTimeEstimator,
};

use crate::{DISPLAY_LIMIT, SlotPipeline, WINDOW_LIMIT};

/// Search radius used when a request leaves it at zero, in metres.
pub const DEFAULT_RADIUS_M: u32 = 2000;

/// Configuration for [`SlotPlanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPlannerConfig {
    /// Radius substituted for a zero request radius, in metres.
    pub default_radius: u32,
    /// Candidates retained while streaming.
    pub window_limit: usize,
    /// Candidates returned per solution.
    pub display_limit: usize,
    /// Worker threads used for the search; `1` searches on the caller.
    pub workers: usize,
}

impl Default for SlotPlannerConfig {
    fn default() -> Self {
        Self {
            default_radius: DEFAULT_RADIUS_M,
            window_limit: WINDOW_LIMIT,
            display_limit: DISPLAY_LIMIT,
            workers: 1,
        }
    }
}

/// Errors from [`SlotPlanner::plan`].
#[derive(Debug, Error)]
pub enum SlotError {
    /// The slot tag failed validation.
    #[error("invalid slot tag: {0}")]
    InvalidTag(#[from] TagError),
    /// The number of stay times differs from the tag length.
    #[error("tag has {tag_len} positions but {stay_times} stay times were given")]
    StayTimeMismatch {
        /// Positions in the tag.
        tag_len: usize,
        /// Stay intervals supplied.
        stay_times: usize,
    },
    /// A stay interval is empty, out of range or overlaps its predecessor.
    #[error("stay time {position} is invalid: {source}")]
    InvalidInterval {
        /// Zero-based index of the offending interval.
        position: usize,
        /// Underlying interval error.
        source: TimeError,
    },
    /// The location is not of the form `city,country`.
    #[error(transparent)]
    InvalidLocation(#[from] LocationError),
    /// The place source failed.
    #[error("place source failed: {0}")]
    PlaceSource(#[from] PlaceSourceError),
}

/// Plans single slots against a place source and a solution cache.
///
/// Generic over the engine boundaries: where places come from, how
/// candidates are scored, how travel time is estimated and where solutions
/// are cached.
pub struct SlotPlanner<P, S, T, C>
where
    P: PlaceSource,
    S: SlotScorer,
    T: TravelTimeEstimator,
    C: SolutionCache,
{
    source: P,
    scorer: S,
    estimator: T,
    cache: C,
    config: SlotPlannerConfig,
}

impl<P, S, T, C> SlotPlanner<P, S, T, C>
where
    P: PlaceSource,
    S: SlotScorer,
    T: TravelTimeEstimator,
    C: SolutionCache,
{
    /// Construct a planner using default configuration.
    pub fn new(source: P, scorer: S, estimator: T, cache: C) -> Self {
        Self::with_config(source, scorer, estimator, cache, SlotPlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    pub const fn with_config(
        source: P,
        scorer: S,
        estimator: T,
        cache: C,
        config: SlotPlannerConfig,
    ) -> Self {
        Self {
            source,
            scorer,
            estimator,
            cache,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SlotPlannerConfig {
        &self.config
    }

    /// Plan the slot described by `request`.
    ///
    /// The request is fully validated before the cache or the place source
    /// is touched. A cached solution is returned as is. Cache failures are
    /// logged and otherwise ignored.
    ///
    /// # Errors
    /// Returns [`SlotError`] for an invalid request or a failing place
    /// source.
    pub fn plan(&self, request: &SlotRequest) -> Result<SlotSolution, SlotError> {
        let tag = SlotTag::parse(&request.tag)?;
        let location = Location::parse(&request.location)?;
        let span = validate_stay_times(&tag, &request.stay_times)?;
        let radius = if request.radius == 0 {
            self.config.default_radius
        } else {
            request.radius
        };

        let key = SolutionCacheKey::new(
            &location,
            radius,
            &tag,
            &request.stay_times,
            request.weekday,
        );
        match self.cache.get(&key) {
            Ok(Some(solution)) => {
                log::info!("cache hit for {}", key.storage_key());
                return Ok(solution);
            }
            Ok(None) => log::debug!("cache miss for {}", key.storage_key()),
            Err(err) => log::warn!("cache read failed, treating as miss: {err}"),
        }

        let query = PlaceQuery {
            location,
            radius,
            weekday: request.weekday,
            interval: span,
        };
        let clusters = self.source.categorized_places(&query)?;
        let solution = SlotPipeline::new(
            &tag,
            &clusters,
            &self.scorer,
            &self.estimator,
            f64::from(span.minutes()),
        )
        .with_limits(self.config.window_limit, self.config.display_limit)
        .solution(self.config.workers);

        if let Err(err) = self.cache.put(&key, &solution) {
            log::warn!("failed to cache {}: {err}", key.storage_key());
        }
        Ok(solution)
    }
}

/// Check stay times against `tag` and return the span they cover.
fn validate_stay_times(
    tag: &SlotTag,
    stay_times: &[TimeInterval],
) -> Result<TimeInterval, SlotError> {
    let mismatch = || SlotError::StayTimeMismatch {
        tag_len: tag.len(),
        stay_times: stay_times.len(),
    };
    if stay_times.len() != tag.len() {
        return Err(mismatch());
    }
    let mut previous: Option<&TimeInterval> = None;
    for (position, interval) in stay_times.iter().enumerate() {
        let checked = match previous {
            Some(prior) => interval.check().and_then(|()| interval.check_follows(prior)),
            None => interval.check(),
        };
        checked.map_err(|source| SlotError::InvalidInterval { position, source })?;
        previous = Some(interval);
    }
    match (stay_times.first(), stay_times.last()) {
        (Some(first), Some(last)) => Ok(TimeInterval {
            start: first.start,
            end: last.end,
        }),
        _ => Err(mismatch()),
    }
}
