//! Facade crate for the Wayfarer trip-planning engine.
//!
//! This crate re-exports the core domain types and exposes the slot engine,
//! the day engine and the data adapters behind feature flags.

#![forbid(unsafe_code)]

pub use wayfarer_core::{
    CategorizedPlaces, DayRequest, Location, OpeningHoursPredicate, Place, PlaceCache,
    PlaceCategory, PlaceSource, PlaceSourceError, SlotRequest, SlotScorer, SlotSolution,
    SlotSolutionCandidate, SlotTag, SolutionCache, TimeInterval, TravelTimeEstimator, Weekday,
};

#[cfg(feature = "slots")]
pub use wayfarer_slots::{SlotError, SlotPlanner, SlotPlannerConfig};

#[cfg(feature = "day")]
pub use wayfarer_day::{DayError, DayKnapsackSelector, KnapsackSelection};

#[cfg(feature = "data")]
pub use wayfarer_data::{
    HttpPlaceSource, HttpPlaceSourceConfig, SqlitePlaceCache, SqliteSolutionCache,
};
