//! Drop candidates that cannot be travelled within the slot.

use wayfarer_core::TravelTimeEstimator;

use crate::SlotCandidate;

/// Accepts valid candidates whose travel time fits the slot.
pub struct FeasibilityFilter<'a, T: TravelTimeEstimator + ?Sized> {
    estimator: &'a T,
    available_minutes: f64,
}

impl<'a, T: TravelTimeEstimator + ?Sized> FeasibilityFilter<'a, T> {
    /// Filter against `available_minutes` of slot time.
    pub const fn new(estimator: &'a T, available_minutes: f64) -> Self {
        Self {
            estimator,
            available_minutes,
        }
    }

    /// Minutes available for travel.
    #[must_use]
    pub const fn available_minutes(&self) -> f64 {
        self.available_minutes
    }

    /// Whether `candidate` is valid and its aggregate travel time is at most
    /// the available duration.
    #[must_use]
    pub fn accepts(&self, candidate: &SlotCandidate<'_>) -> bool {
        candidate.is_valid()
            && self.estimator.travel_minutes(candidate.places()) <= self.available_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CandidateBuilder;
    use rstest::rstest;
    use wayfarer_core::test_support::{FixedLegTravelTime, ZeroTravelTime, place};
    use wayfarer_core::{CategorizedPlaces, PlaceCategory, RatingScorer, SlotTag};

    fn clusters() -> CategorizedPlaces {
        CategorizedPlaces::new(
            vec![place("e", PlaceCategory::Eatery, 4.0)],
            vec![
                place("v1", PlaceCategory::Visit, 4.0),
                place("v2", PlaceCategory::Visit, 4.0),
            ],
        )
    }

    #[rstest]
    #[case(30.0, 60.0, true)]
    #[case(60.0, 120.0, true)]
    #[case(61.0, 120.0, false)]
    fn compares_travel_with_available_time(
        #[case] minutes_per_leg: f64,
        #[case] available: f64,
        #[case] expected: bool,
    ) {
        let places = clusters();
        let tag = SlotTag::parse("EVV").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &places, &RatingScorer).build(&[0, 0, 1]);
        let estimator = FixedLegTravelTime { minutes_per_leg };
        assert_eq!(
            FeasibilityFilter::new(&estimator, available).accepts(&candidate),
            expected
        );
    }

    #[rstest]
    fn rejects_invalid_candidates() {
        let places = clusters();
        let tag = SlotTag::parse("VV").expect("valid tag");
        let candidate = CandidateBuilder::new(&tag, &places, &RatingScorer).build(&[1, 1]);
        assert!(!FeasibilityFilter::new(&ZeroTravelTime, 600.0).accepts(&candidate));
    }
}
