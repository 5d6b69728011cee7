//! Test-only collaborators used by unit and behaviour tests across the
//! workspace.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{
    CacheError, CategorizedPlaces, Place, PlaceCategory, PlaceQuery, PlaceSource,
    PlaceSourceError, SlotSolution, SolutionCache, SolutionCacheKey, StaticPlaceSource,
    TravelTimeEstimator,
};

/// Build a place at the origin with the given rating.
#[must_use]
pub fn place(id: &str, category: PlaceCategory, rating: f32) -> Place {
    Place::new(id, id, Coord { x: 0.0, y: 0.0 }, category).with_rating(rating)
}

/// `TravelTimeEstimator` that reports no travel at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroTravelTime;

impl TravelTimeEstimator for ZeroTravelTime {
    fn travel_minutes(&self, _places: &[&Place]) -> f64 {
        0.0
    }
}

/// `TravelTimeEstimator` charging a fixed number of minutes per leg.
#[derive(Debug, Clone, Copy)]
pub struct FixedLegTravelTime {
    /// Minutes charged for every consecutive pair.
    pub minutes_per_leg: f64,
}

impl TravelTimeEstimator for FixedLegTravelTime {
    #[expect(
        clippy::float_arithmetic,
        reason = "multiplying leg count by leg minutes"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "leg counts in tests are tiny"
    )]
    fn travel_minutes(&self, places: &[&Place]) -> f64 {
        places.len().saturating_sub(1) as f64 * self.minutes_per_leg
    }
}

/// `PlaceSource` that counts its calls and remembers the last query.
#[derive(Debug, Default)]
pub struct RecordingPlaceSource {
    inner: StaticPlaceSource,
    calls: AtomicUsize,
    last_query: Mutex<Option<PlaceQuery>>,
}

impl RecordingPlaceSource {
    /// Serve `places` through a [`StaticPlaceSource`].
    #[must_use]
    pub fn new(places: Vec<Place>) -> Self {
        Self {
            inner: StaticPlaceSource::new(places),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Number of times the source was queried.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query, if any.
    #[must_use]
    pub fn last_query(&self) -> Option<PlaceQuery> {
        self.last_query.lock().ok().and_then(|query| query.clone())
    }
}

impl PlaceSource for RecordingPlaceSource {
    fn categorized_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.clone());
        }
        self.inner.categorized_places(query)
    }
}

/// `PlaceSource` that always fails with a service error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPlaceSource;

impl PlaceSource for FailingPlaceSource {
    fn categorized_places(
        &self,
        _query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        Err(PlaceSourceError::Service {
            code: "UNAVAILABLE".to_owned(),
            message: "stub source always fails".to_owned(),
        })
    }
}

/// `SolutionCache` whose reads and writes always fail.
#[derive(Debug, Default)]
pub struct FailingCache {
    puts: AtomicUsize,
}

impl FailingCache {
    /// Number of attempted writes.
    #[must_use]
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl SolutionCache for FailingCache {
    fn get(&self, _key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError> {
        Err(CacheError::Backend {
            message: "stub cache read failure".to_owned(),
        })
    }

    fn put(&self, _key: &SolutionCacheKey, _solution: &SlotSolution) -> Result<(), CacheError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend {
            message: "stub cache write failure".to_owned(),
        })
    }
}
