//! Core domain types for the Wayfarer engine.
//!
//! This crate holds the vocabulary shared by the slot and day engines:
//! places and their clusters, validated slot tags, hour intervals and the
//! collaborator traits the engines call out to ([`PlaceSource`],
//! [`SlotScorer`], [`TravelTimeEstimator`], [`OpeningHoursPredicate`],
//! [`SolutionCache`] and [`PlaceCache`]). Default implementations of each
//! trait live alongside it. Nothing here performs network I/O.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod clusters;
pub mod location;
pub mod opening_hours;
pub mod place;
pub mod place_cache;
pub mod request;
pub mod scorer;
pub mod solution;
pub mod source;
pub mod tag;
pub mod time;
pub mod travel_time;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use cache::{
    CacheError, MemorySolutionCache, STORAGE_KEY_PREFIX, SolutionCache, SolutionCacheKey,
};
pub use clusters::CategorizedPlaces;
pub use location::{Location, LocationError};
pub use opening_hours::{AlwaysOpen, OpeningHoursPredicate, WeeklyHours};
pub use place::{OpeningHours, Place, PlaceCategory};
pub use place_cache::{
    GEOCODE_KEY_PREFIX, MemoryPlaceCache, PLACES_KEY_PREFIX, PlaceCache, PlaceCacheKey,
    geocode_storage_key,
};
pub use request::{DayRequest, SlotRequest};
pub use scorer::{RatingScorer, SlotScorer};
pub use solution::{SlotSolution, SlotSolutionCandidate};
pub use source::{PlaceQuery, PlaceSource, PlaceSourceError, StaticPlaceSource};
pub use tag::{MAX_TAG_LEN, SlotTag, TagError, is_valid_tag};
pub use time::{HOURS_PER_DAY, TimeError, TimeInterval, Weekday};
pub use travel_time::{DEFAULT_SPEED_KMH, DistanceTravelTime, TravelTimeEstimator, haversine_km};
