//! Supply clustered places for a slot query.
//!
//! A [`PlaceSource`] turns a [`PlaceQuery`] into [`CategorizedPlaces`]
//! already deduplicated by place id, enriched with opening hours and
//! filtered to the query window.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CategorizedPlaces, Location, OpeningHoursPredicate, Place, TimeInterval, Weekday, WeeklyHours,
};

/// Parameters for one place lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceQuery {
    /// City and country to search in.
    pub location: Location,
    /// Search radius in metres.
    pub radius: u32,
    /// Day of the visit.
    pub weekday: Weekday,
    /// Span covering every event in the slot.
    pub interval: TimeInterval,
}

/// Errors raised while fetching places.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceSourceError {
    /// The transport failed before a response arrived.
    #[error("network error: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The request did not complete in time.
    #[error("request timed out: {message}")]
    Timeout {
        /// Timeout description.
        message: String,
    },
    /// The service reported an application-level failure.
    #[error("service error {code}: {message}")]
    Service {
        /// Provider status code, e.g. `REQUEST_DENIED`.
        code: String,
        /// Provider error message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
    /// The location could not be resolved to coordinates.
    #[error("could not geocode {location}")]
    Geocode {
        /// Location that failed to resolve.
        location: String,
    },
}

/// Fetch eatery and visit clusters for a query.
///
/// Implementations must return clusters that are deduplicated by place id;
/// the engine treats a repeated id inside a candidate as invalid but does
/// not otherwise re-check its input.
pub trait PlaceSource: Send + Sync {
    /// Return clustered places matching `query`.
    fn categorized_places(&self, query: &PlaceQuery)
    -> Result<CategorizedPlaces, PlaceSourceError>;
}

impl<P: PlaceSource + ?Sized> PlaceSource for &P {
    fn categorized_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        (**self).categorized_places(query)
    }
}

impl<P: PlaceSource + ?Sized> PlaceSource for Box<P> {
    fn categorized_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        (**self).categorized_places(query)
    }
}

/// In-memory place source over a fixed pool.
///
/// Radius and location are ignored; the pool is assumed to already belong
/// to the queried area. Places are kept when [`WeeklyHours`] reports them
/// open during the query interval.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{
///     Location, Place, PlaceCategory, PlaceQuery, PlaceSource, StaticPlaceSource,
///     TimeInterval, Weekday,
/// };
///
/// let source = StaticPlaceSource::new(vec![
///     Place::new("a", "Cafe", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Eatery),
/// ]);
/// let query = PlaceQuery {
///     location: Location::parse("Paris,France")?,
///     radius: 2000,
///     weekday: Weekday::Monday,
///     interval: TimeInterval::new(8, 10)?,
/// };
/// let clusters = source.categorized_places(&query)?;
/// assert_eq!(clusters.eatery.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceSource {
    places: Vec<Place>,
}

impl StaticPlaceSource {
    /// Create a source serving `places`.
    #[must_use]
    pub const fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Places in the pool.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }
}

impl PlaceSource for StaticPlaceSource {
    fn categorized_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<CategorizedPlaces, PlaceSourceError> {
        let predicate: &dyn OpeningHoursPredicate = &WeeklyHours;
        Ok(CategorizedPlaces::from_open_places(
            self.places.iter().cloned(),
            predicate,
            query.weekday,
            query.interval,
        ))
    }
}
