//! Estimate travel time along an ordered sequence of places.
//!
//! The slot engine only needs one number per candidate: the total minutes
//! spent moving between consecutive places. [`DistanceTravelTime`] derives
//! it from great-circle distances at a constant speed.

use geo::Coord;

use crate::Place;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default walking speed in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 5.0;

/// Aggregate travel minutes over consecutive legs of `places`.
///
/// Implementations must be deterministic and thread-safe. A sequence with
/// fewer than two places has no legs and should report `0.0`.
pub trait TravelTimeEstimator: Send + Sync {
    /// Return the total travel time in minutes.
    fn travel_minutes(&self, places: &[&Place]) -> f64;
}

/// Great-circle travel time at a constant speed.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use wayfarer_core::{DistanceTravelTime, Place, PlaceCategory, TravelTimeEstimator};
///
/// let a = Place::new("a", "A", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit);
/// let b = Place::new("b", "B", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Eatery);
/// assert_eq!(DistanceTravelTime::default().travel_minutes(&[&a, &b]), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceTravelTime {
    /// Assumed average speed in km/h.
    pub speed_kmh: f64,
}

impl Default for DistanceTravelTime {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl DistanceTravelTime {
    /// Construct an estimator travelling at `speed_kmh`.
    #[must_use]
    pub const fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }
}

/// Great-circle distance between two WGS84 coordinates in kilometres.
#[expect(
    clippy::float_arithmetic,
    reason = "haversine formula requires floating-point math"
)]
#[must_use]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat_from = from.y.to_radians();
    let lat_to = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

impl TravelTimeEstimator for DistanceTravelTime {
    #[expect(
        clippy::float_arithmetic,
        reason = "converting distance to minutes requires floating-point math"
    )]
    fn travel_minutes(&self, places: &[&Place]) -> f64 {
        if self.speed_kmh <= 0.0 {
            return if places.len() < 2 { 0.0 } else { f64::INFINITY };
        }
        let km: f64 = places
            .windows(2)
            .filter_map(|leg| match leg {
                [from, to] => Some(haversine_km(from.location, to.location)),
                _ => None,
            })
            .sum();
        km / self.speed_kmh * 60.0
    }
}
