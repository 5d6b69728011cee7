//! Score an ordered sequence of places.
//!
//! The `SlotScorer` trait assigns a quality score to a slot candidate. The
//! slot engine only compares scores, so any deterministic scale will do.

use crate::Place;

/// Calculate a quality score for an ordered sequence of places.
///
/// Higher scores rank better. Implementations must be deterministic for
/// identical input and thread-safe (`Send` + `Sync`) so partitioned solves
/// can share one scorer.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use wayfarer_core::{Place, PlaceCategory, SlotScorer};
///
/// struct CountScorer;
///
/// impl SlotScorer for CountScorer {
///     fn score(&self, places: &[&Place]) -> f64 {
///         places.len() as f64
///     }
/// }
///
/// let park = Place::new("p", "Park", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit);
/// assert_eq!(CountScorer.score(&[&park, &park]), 2.0);
/// ```
pub trait SlotScorer: Send + Sync {
    /// Return a score for `places`, in slot order.
    fn score(&self, places: &[&Place]) -> f64;
}

/// Scores a candidate by the mean rating of its places.
///
/// Returns `0.0` for an empty sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatingScorer;

impl SlotScorer for RatingScorer {
    #[expect(
        clippy::float_arithmetic,
        reason = "mean rating requires floating-point division"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "slot lengths are tiny; usize to f64 is exact"
    )]
    fn score(&self, places: &[&Place]) -> f64 {
        if places.is_empty() {
            return 0.0;
        }
        let total: f64 = places.iter().map(|place| f64::from(place.rating)).sum();
        total / places.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaceCategory;
    use geo::Coord;
    use rstest::rstest;

    fn rated(rating: f32) -> Place {
        Place::new("p", "P", Coord { x: 0.0, y: 0.0 }, PlaceCategory::Visit).with_rating(rating)
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[4.0], 4.0)]
    #[case(&[3.0, 5.0], 4.0)]
    #[case(&[1.0, 2.0, 4.5], 2.5)]
    fn averages_ratings(#[case] ratings: &[f32], #[case] expected: f64) {
        let places: Vec<Place> = ratings.iter().copied().map(rated).collect();
        let refs: Vec<&Place> = places.iter().collect();
        assert!((RatingScorer.score(&refs) - expected).abs() < 1e-9);
    }
}
