//! Response types for the Google-Places-compatible JSON API.
//!
//! Only the fields the place source reads are modelled; everything else in
//! the payload is ignored. Every endpoint reports an application-level
//! `status` alongside the HTTP status code.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service>

use geo::Coord;
use serde::Deserialize;
use wayfarer_core::{OpeningHours, Place, PlaceCategory};

/// Status for a successful request.
pub const STATUS_OK: &str = "OK";

/// Status for a valid request that matched nothing.
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Convert to a `geo` coordinate (`x = lng`, `y = lat`).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Build from a `geo` coordinate (`x = lng`, `y = lat`).
    #[must_use]
    pub const fn from_coord(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }

    /// Render as the `lat,lng` pair the search endpoint expects.
    #[must_use]
    pub fn query_value(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Geometry block carried by geocoding and search results.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    /// Representative point.
    pub location: LatLng,
}

/// One geocoding match.
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    /// Where the match lies.
    pub geometry: Geometry,
}

/// `/geocode/json` response.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// Application status, e.g. `"OK"` or `"REQUEST_DENIED"`.
    pub status: String,
    /// Explanation attached to failing statuses.
    pub error_message: Option<String>,
    /// Matches, best first.
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    /// Coordinates of the first match, if any.
    #[must_use]
    pub fn first_location(&self) -> Option<LatLng> {
        self.results.first().map(|result| result.geometry.location)
    }
}

/// Opening-hours block of a search or details result.
#[derive(Debug, Default, Deserialize)]
pub struct OpeningHoursResult {
    /// One line per weekday, e.g. `"Monday: 9:00 AM – 5:00 PM"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// One nearby-search match.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    /// Provider identifier.
    pub place_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Where the place lies.
    pub geometry: Geometry,
    /// Average user rating.
    pub rating: Option<f32>,
    /// Price level, `0..=4`.
    pub price_level: Option<u8>,
    /// Opening hours, often without weekday text.
    pub opening_hours: Option<OpeningHoursResult>,
}

impl PlaceResult {
    /// Whether the result already carries weekday opening-hours text.
    #[must_use]
    pub fn has_weekday_text(&self) -> bool {
        self.opening_hours
            .as_ref()
            .is_some_and(|hours| !hours.weekday_text.is_empty())
    }

    /// Convert into a domain place of `category`.
    ///
    /// The service reports no spend, so `price` stays zero; only
    /// `price_level` is carried over.
    #[must_use]
    pub fn into_place(self, category: PlaceCategory) -> Place {
        let hours: OpeningHours = self
            .opening_hours
            .map(|hours| hours.weekday_text)
            .unwrap_or_default()
            .into_iter()
            .collect();
        Place::new(
            self.place_id,
            self.name,
            self.geometry.location.to_coord(),
            category,
        )
        .with_rating(self.rating.unwrap_or_default())
        .with_price_level(self.price_level.unwrap_or_default())
        .with_opening_hours(hours)
    }
}

/// `/place/nearbysearch/json` response.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    /// Application status.
    pub status: String,
    /// Explanation attached to failing statuses.
    pub error_message: Option<String>,
    /// Matches in prominence order.
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// Fields returned by a details lookup.
#[derive(Debug, Deserialize)]
pub struct DetailsResult {
    /// Opening hours, when the place publishes them.
    pub opening_hours: Option<OpeningHoursResult>,
}

/// `/place/details/json` response.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    /// Application status.
    pub status: String,
    /// Explanation attached to failing statuses.
    pub error_message: Option<String>,
    /// The looked-up place.
    pub result: Option<DetailsResult>,
}

impl DetailsResponse {
    /// Weekday text from the result, empty when absent.
    #[must_use]
    pub fn into_weekday_text(self) -> Vec<String> {
        self.result
            .and_then(|result| result.opening_hours)
            .map(|hours| hours.weekday_text)
            .unwrap_or_default()
    }
}

/// Whether `status` means the request succeeded, possibly with no matches.
#[must_use]
pub fn status_is_ok(status: &str) -> bool {
    status == STATUS_OK || status == STATUS_ZERO_RESULTS
}
